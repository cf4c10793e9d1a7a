pub mod error;
pub mod moneris;
pub mod provider;
pub mod reporter;
pub mod source;

use async_trait::async_trait;

use crate::client::moneris::Response;

use self::error::GatewayError;
use self::provider::{ProviderClass, TransactionOptions};
use self::source::{CreditCard, Payment};

/// Contract the platform's payment flow expects from a payment method.
///
/// Declined transactions come back as `Ok` with an unsuccessful [`Response`];
/// `Err` is reserved for failures that produced no response at all.
#[async_trait]
pub trait Gateway: Send + Sync {
    fn provider_class(&self) -> ProviderClass;

    fn payment_profiles_supported(&self) -> bool;

    async fn authorize(
        &self,
        money: u64,
        source: &CreditCard,
        options: &TransactionOptions,
    ) -> Result<Response, GatewayError>;

    async fn purchase(
        &self,
        money: u64,
        source: &CreditCard,
        options: &TransactionOptions,
    ) -> Result<Response, GatewayError>;

    async fn capture(
        &self,
        money: u64,
        response_code: &str,
        options: &TransactionOptions,
    ) -> Result<Response, GatewayError>;

    async fn void(
        &self,
        response_code: &str,
        source: Option<&CreditCard>,
        options: &TransactionOptions,
    ) -> Result<Response, GatewayError>;

    async fn cancel(&self, response_code: &str) -> Result<Response, GatewayError>;

    async fn credit(
        &self,
        money: u64,
        source: Option<&CreditCard>,
        response_code: &str,
        options: &TransactionOptions,
    ) -> Result<Response, GatewayError>;

    /// `None` when nothing had to be stored.
    async fn create_profile(&self, payment: &mut Payment)
        -> Result<Option<Response>, GatewayError>;

    /// `None` when the source had no token and was destroyed right away.
    async fn disable_customer_profile(
        &self,
        source: &mut CreditCard,
    ) -> Result<Option<Response>, GatewayError>;
}
