use async_trait::async_trait;
use snafu::ResultExt;

use crate::client::moneris::{MonerisClient, Response};
use crate::config::MonerisConfig;

use super::{
    error::{GatewayError, ProviderSnafu, StoreSnafu},
    provider::{BillingProvider, Instrument, ProviderClass, TransactionOptions},
    reporter::ErrorReporter,
    source::{CreditCard, Payment, SourceStore},
    Gateway,
};

/// Moneris payment method: forwards every operation to its billing client and
/// hands unsuccessful responses to the error reporter.
pub struct MonerisGateway<P, S, R> {
    preferences: MonerisConfig,
    provider: P,
    store: S,
    reporter: R,
    payment_profiles: bool,
}

impl<S, R> MonerisGateway<MonerisClient, S, R>
where
    S: SourceStore,
    R: ErrorReporter,
{
    pub fn new(preferences: MonerisConfig, store: S, reporter: R) -> Result<Self, GatewayError> {
        let provider = ProviderClass::Moneris
            .instantiate(&preferences)
            .context(ProviderSnafu)?;
        Ok(Self::with_provider(preferences, provider, store, reporter))
    }
}

impl<P, S, R> MonerisGateway<P, S, R>
where
    P: BillingProvider,
    S: SourceStore,
    R: ErrorReporter,
{
    pub fn with_provider(preferences: MonerisConfig, provider: P, store: S, reporter: R) -> Self {
        MonerisGateway {
            preferences,
            provider,
            store,
            reporter,
            payment_profiles: true,
        }
    }

    /// Turns payment profiles off, making `create_profile` a no-op.
    pub fn without_payment_profiles(mut self) -> Self {
        self.payment_profiles = false;
        self
    }

    pub fn preferences(&self) -> &MonerisConfig {
        &self.preferences
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn instrument(source: &CreditCard) -> Instrument {
        match source.payment_profile_id() {
            Some(token) => Instrument::Token(token.to_string()),
            None => Instrument::Card(source.clone()),
        }
    }

    async fn report_failure(&self, operation: &str, response: &Response) {
        if !response.success() {
            self.reporter.gateway_error(operation, response).await;
        }
    }
}

#[async_trait]
impl<P, S, R> Gateway for MonerisGateway<P, S, R>
where
    P: BillingProvider,
    S: SourceStore,
    R: ErrorReporter,
{
    fn provider_class(&self) -> ProviderClass {
        ProviderClass::Moneris
    }

    fn payment_profiles_supported(&self) -> bool {
        self.payment_profiles
    }

    #[tracing::instrument(name = "gateway authorize", skip(self, source, options), fields(source_id = source.id))]
    async fn authorize(
        &self,
        money: u64,
        source: &CreditCard,
        options: &TransactionOptions,
    ) -> Result<Response, GatewayError> {
        self.provider
            .authorize(money, &Self::instrument(source), options)
            .await
            .context(ProviderSnafu)
    }

    #[tracing::instrument(name = "gateway purchase", skip(self, source, options), fields(source_id = source.id))]
    async fn purchase(
        &self,
        money: u64,
        source: &CreditCard,
        options: &TransactionOptions,
    ) -> Result<Response, GatewayError> {
        self.provider
            .purchase(money, &Self::instrument(source), options)
            .await
            .context(ProviderSnafu)
    }

    #[tracing::instrument(name = "gateway capture", skip(self, options))]
    async fn capture(
        &self,
        money: u64,
        response_code: &str,
        options: &TransactionOptions,
    ) -> Result<Response, GatewayError> {
        self.provider
            .capture(money, response_code, options)
            .await
            .context(ProviderSnafu)
    }

    #[tracing::instrument(name = "gateway void", skip(self, _source, options))]
    async fn void(
        &self,
        response_code: &str,
        _source: Option<&CreditCard>,
        options: &TransactionOptions,
    ) -> Result<Response, GatewayError> {
        let response = self
            .provider
            .void(response_code, options)
            .await
            .context(ProviderSnafu)?;
        self.report_failure("void", &response).await;
        Ok(response)
    }

    #[tracing::instrument(name = "gateway cancel", skip(self))]
    async fn cancel(&self, response_code: &str) -> Result<Response, GatewayError> {
        let response = self
            .provider
            .void(response_code, &TransactionOptions::default())
            .await
            .context(ProviderSnafu)?;
        self.report_failure("cancel", &response).await;
        Ok(response)
    }

    #[tracing::instrument(name = "gateway credit", skip(self, _source, options))]
    async fn credit(
        &self,
        money: u64,
        _source: Option<&CreditCard>,
        response_code: &str,
        options: &TransactionOptions,
    ) -> Result<Response, GatewayError> {
        let response = self
            .provider
            .refund(money, response_code, options)
            .await
            .context(ProviderSnafu)?;
        self.report_failure("credit", &response).await;
        Ok(response)
    }

    #[tracing::instrument(name = "gateway create_profile", skip(self, payment), fields(payment = %payment.number))]
    async fn create_profile(
        &self,
        payment: &mut Payment,
    ) -> Result<Option<Response>, GatewayError> {
        if !self.payment_profiles || payment.source.profile_token().is_some() {
            return Ok(None);
        }

        let response = self
            .provider
            .store(&payment.source, &TransactionOptions::default())
            .await
            .context(ProviderSnafu)?;
        if !response.success() {
            self.reporter.gateway_error("create_profile", &response).await;
            return Ok(Some(response));
        }

        match response.param("data_key") {
            Some(data_key) => {
                payment.source.set_profile_token(data_key);
                self.store
                    .save_profile_ids(&payment.source)
                    .await
                    .context(StoreSnafu)?;
            }
            None => {
                tracing::warn!("moneris stored the card but returned no data_key");
                self.reporter.gateway_error("create_profile", &response).await;
            }
        }
        Ok(Some(response))
    }

    #[tracing::instrument(name = "gateway disable_customer_profile", skip(self, source), fields(source_id = source.id))]
    async fn disable_customer_profile(
        &self,
        source: &mut CreditCard,
    ) -> Result<Option<Response>, GatewayError> {
        let token = source.profile_token().map(str::to_string);
        let Some(token) = token else {
            self.store.destroy(source.id).await.context(StoreSnafu)?;
            return Ok(None);
        };

        let response = self
            .provider
            .unstore(&token, &TransactionOptions::default())
            .await
            .context(ProviderSnafu)?;
        if !response.success() {
            self.reporter
                .gateway_error("disable_customer_profile", &response)
                .await;
            return Ok(Some(response));
        }

        source.clear_profile_token();
        self.store
            .save_profile_ids(source)
            .await
            .context(StoreSnafu)?;
        self.store.destroy(source.id).await.context(StoreSnafu)?;
        Ok(Some(response))
    }
}
