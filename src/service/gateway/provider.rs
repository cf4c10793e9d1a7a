use std::fmt::Display;

use async_trait::async_trait;

use crate::client::moneris::{MonerisClient, ProviderError, Response};
use crate::config::MonerisConfig;

use super::source::CreditCard;

pub const PROVIDER_CLASS_MONERIS: &str = "MONERIS";

/// What gets sent to the processor: the raw card, or a token the processor stored earlier.
#[derive(Debug, Clone)]
pub enum Instrument {
    Card(CreditCard),
    Token(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionOptions {
    pub order_id: Option<String>,
    pub customer: Option<String>,
    /// Void with a purchase correction instead of a zero-amount completion.
    /// Moneris only accepts corrections on same-day purchases and completions.
    pub purchase_correction: bool,
}

/// The billing client class a gateway instantiates from its preferences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderClass {
    Moneris,
}

impl Display for ProviderClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderClass::Moneris => write!(f, "{}", PROVIDER_CLASS_MONERIS),
        }
    }
}

impl ProviderClass {
    pub fn instantiate(&self, preferences: &MonerisConfig) -> Result<MonerisClient, ProviderError> {
        match self {
            ProviderClass::Moneris => MonerisClient::new(preferences),
        }
    }
}

/// Outbound contract: every financial operation is one call on the billing client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BillingProvider: Send + Sync {
    async fn authorize(
        &self,
        money: u64,
        instrument: &Instrument,
        options: &TransactionOptions,
    ) -> Result<Response, ProviderError>;

    async fn purchase(
        &self,
        money: u64,
        instrument: &Instrument,
        options: &TransactionOptions,
    ) -> Result<Response, ProviderError>;

    async fn capture(
        &self,
        money: u64,
        authorization: &str,
        options: &TransactionOptions,
    ) -> Result<Response, ProviderError>;

    async fn void(
        &self,
        authorization: &str,
        options: &TransactionOptions,
    ) -> Result<Response, ProviderError>;

    async fn refund(
        &self,
        money: u64,
        authorization: &str,
        options: &TransactionOptions,
    ) -> Result<Response, ProviderError>;

    async fn store(
        &self,
        card: &CreditCard,
        options: &TransactionOptions,
    ) -> Result<Response, ProviderError>;

    async fn unstore(
        &self,
        data_key: &str,
        options: &TransactionOptions,
    ) -> Result<Response, ProviderError>;
}
