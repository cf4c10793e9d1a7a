use snafu::Snafu;

use crate::service::gateway::error::{GatewayError, StoreError};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CmdError {
    #[snafu(display("cannot load configuration: {source}"))]
    Config { source: config::ConfigError },
    #[snafu(display("database error: {source}"))]
    Database { source: sqlx::Error },
    #[snafu(display("cannot run migrations: {source}"))]
    Migrate { source: sqlx::migrate::MigrateError },
    #[snafu(display("{source}"))]
    Gateway { source: GatewayError },
    #[snafu(display("{source}"))]
    Store { source: StoreError },
    #[snafu(display("invalid card: {source}"))]
    InvalidCard { source: validator::ValidationErrors },
    #[snafu(display("missing argument --{name}"))]
    MissingArgument { name: String },
    #[snafu(display("cannot render output: {source}"))]
    Output { source: serde_json::Error },
    #[snafu(display("unknown command {name}"))]
    UnknownCommand { name: String },
}
