use snafu::Snafu;

use crate::client::moneris::ProviderError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum GatewayError {
    #[snafu(display("provider call failed: {source}"))]
    Provider { source: ProviderError },
    #[snafu(display("cannot persist payment source: {source}"))]
    Store { source: StoreError },
}

#[derive(Debug, Snafu)]
pub enum StoreError {
    #[snafu(display("credit card with id {id} not found"))]
    NotFound { id: i64 },
    #[snafu(display("credit card with id {id} has invalid expiry month {month}"))]
    InvalidMonth { id: i64, month: i32 },
    #[snafu(display("{message}"))]
    Unexpected {
        message: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
