use config::Config;
use secrecy::Secret;
use validator::Validate;

use crate::client::moneris::Server;

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Settings {
    pub db: DbConfig,
    pub moneris: MonerisConfig,
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct DbConfig {
    pub dsn: String,
}

/// Gateway preferences. `login` is the Moneris store id, `password` the API token.
#[derive(serde::Deserialize, Clone, Debug, Validate)]
pub struct MonerisConfig {
    #[validate(length(min = 1, message = "login must not be empty"))]
    pub login: String,
    pub password: Secret<String>,
    #[serde(default)]
    pub server: Server,
    /// Overrides the endpoint picked from `server`.
    #[validate(url)]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 120))]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        let cfg = Config::builder()
            .add_source(config::File::with_name("config/base").required(false))
            .add_source(config::Environment::default().separator("__"))
            .build()?;
        let settings = cfg.try_deserialize::<Settings>()?;
        settings
            .moneris
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(settings)
    }
}
