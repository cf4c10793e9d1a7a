pub mod client;
pub mod error;
pub mod request;
pub mod response;

pub use client::MonerisClient;
pub use error::ProviderError;
pub use response::Response;

pub const TEST_URL: &str = "https://esqa.moneris.com/gateway2/servlet/MpgRequest";
pub const LIVE_URL: &str = "https://www3.moneris.com/gateway2/servlet/MpgRequest";

#[derive(serde::Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Server {
    #[default]
    Test,
    Live,
}

impl Server {
    pub fn url(&self) -> &'static str {
        match self {
            Server::Test => TEST_URL,
            Server::Live => LIVE_URL,
        }
    }
}
