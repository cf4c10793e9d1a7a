use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, Secret};
use snafu::ResultExt;

use crate::config::MonerisConfig;
use crate::service::gateway::provider::{BillingProvider, Instrument, TransactionOptions};
use crate::service::gateway::source::CreditCard;

use super::{
    error::{HttpSnafu, ProviderError, StatusSnafu},
    request::{
        format_amount, format_expdate, split_authorization, AddCard, CardTransaction, Completion,
        Correction, DeleteCard, MpgRequest, Refund, Transaction, VaultTransaction,
        DEFAULT_CRYPT_TYPE,
    },
    response::Response,
    Server,
};

/// Client for the Moneris XML gateway, one POST per transaction.
#[derive(Clone, Debug)]
pub struct MonerisClient {
    http: reqwest::Client,
    url: String,
    store_id: String,
    api_token: Secret<String>,
    test: bool,
}

impl MonerisClient {
    pub fn new(cfg: &MonerisConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context(HttpSnafu)?;
        let url = cfg
            .url
            .clone()
            .unwrap_or_else(|| cfg.server.url().to_string());
        Ok(MonerisClient {
            http,
            url,
            store_id: cfg.login.clone(),
            api_token: cfg.password.clone(),
            test: cfg.server == Server::Test,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    #[tracing::instrument(name = "moneris commit", skip(self, transaction), fields(txn = transaction.name()))]
    async fn commit(&self, transaction: Transaction) -> Result<Response, ProviderError> {
        let request = MpgRequest {
            store_id: self.store_id.clone(),
            api_token: self.api_token.expose_secret().clone(),
            transaction,
        };
        let body = request.to_xml()?;

        let res = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/xml")
            .body(body)
            .send()
            .await
            .context(HttpSnafu)?;
        let status = res.status();
        if !status.is_success() {
            tracing::error!("moneris answered with status {}", status);
            return StatusSnafu {
                status: status.as_u16(),
            }
            .fail();
        }
        let text = res.text().await.context(HttpSnafu)?;
        let response = Response::parse(&text, self.test)?;
        tracing::info!(
            success = response.success(),
            response_code = response.param("response_code").unwrap_or_default(),
            "moneris transaction finished"
        );
        Ok(response)
    }

    fn card_transaction(
        money: u64,
        card: &CreditCard,
        options: &TransactionOptions,
    ) -> CardTransaction {
        CardTransaction {
            order_id: order_id(options),
            cust_id: options.customer.clone(),
            amount: format_amount(money),
            pan: card.number.expose_secret().clone(),
            expdate: format_expdate(card.year, card.month),
            crypt_type: DEFAULT_CRYPT_TYPE,
        }
    }

    fn vault_transaction(
        money: u64,
        data_key: &str,
        options: &TransactionOptions,
    ) -> VaultTransaction {
        VaultTransaction {
            data_key: data_key.to_string(),
            order_id: order_id(options),
            cust_id: options.customer.clone(),
            amount: format_amount(money),
            crypt_type: DEFAULT_CRYPT_TYPE,
        }
    }
}

fn order_id(options: &TransactionOptions) -> String {
    options
        .order_id
        .clone()
        .unwrap_or_else(|| format!("ord_{}", uuid::Uuid::new_v4().simple()))
}

#[async_trait]
impl BillingProvider for MonerisClient {
    async fn authorize(
        &self,
        money: u64,
        instrument: &Instrument,
        options: &TransactionOptions,
    ) -> Result<Response, ProviderError> {
        let transaction = match instrument {
            Instrument::Card(card) => {
                Transaction::Preauth(Self::card_transaction(money, card, options))
            }
            Instrument::Token(data_key) => {
                Transaction::ResPreauthCc(Self::vault_transaction(money, data_key, options))
            }
        };
        self.commit(transaction).await
    }

    async fn purchase(
        &self,
        money: u64,
        instrument: &Instrument,
        options: &TransactionOptions,
    ) -> Result<Response, ProviderError> {
        let transaction = match instrument {
            Instrument::Card(card) => {
                Transaction::Purchase(Self::card_transaction(money, card, options))
            }
            Instrument::Token(data_key) => {
                Transaction::ResPurchaseCc(Self::vault_transaction(money, data_key, options))
            }
        };
        self.commit(transaction).await
    }

    async fn capture(
        &self,
        money: u64,
        authorization: &str,
        _options: &TransactionOptions,
    ) -> Result<Response, ProviderError> {
        let (txn_number, order_id) = split_authorization(authorization)?;
        self.commit(Transaction::Completion(Completion {
            order_id: order_id.to_string(),
            comp_amount: format_amount(money),
            txn_number: txn_number.to_string(),
            crypt_type: DEFAULT_CRYPT_TYPE,
        }))
        .await
    }

    /// A pending preauth is released by completing it for zero.
    async fn void(
        &self,
        authorization: &str,
        options: &TransactionOptions,
    ) -> Result<Response, ProviderError> {
        if !options.purchase_correction {
            return self.capture(0, authorization, options).await;
        }
        let (txn_number, order_id) = split_authorization(authorization)?;
        self.commit(Transaction::PurchaseCorrection(Correction {
            order_id: order_id.to_string(),
            txn_number: txn_number.to_string(),
            crypt_type: DEFAULT_CRYPT_TYPE,
        }))
        .await
    }

    async fn refund(
        &self,
        money: u64,
        authorization: &str,
        _options: &TransactionOptions,
    ) -> Result<Response, ProviderError> {
        let (txn_number, order_id) = split_authorization(authorization)?;
        self.commit(Transaction::Refund(Refund {
            order_id: order_id.to_string(),
            amount: format_amount(money),
            txn_number: txn_number.to_string(),
            crypt_type: DEFAULT_CRYPT_TYPE,
        }))
        .await
    }

    async fn store(
        &self,
        card: &CreditCard,
        options: &TransactionOptions,
    ) -> Result<Response, ProviderError> {
        self.commit(Transaction::ResAddCc(AddCard {
            cust_id: options.customer.clone(),
            pan: card.number.expose_secret().clone(),
            expdate: format_expdate(card.year, card.month),
            crypt_type: DEFAULT_CRYPT_TYPE,
        }))
        .await
    }

    async fn unstore(
        &self,
        data_key: &str,
        _options: &TransactionOptions,
    ) -> Result<Response, ProviderError> {
        self.commit(Transaction::ResDelete(DeleteCard {
            data_key: data_key.to_string(),
        }))
        .await
    }
}
