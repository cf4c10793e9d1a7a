use std::sync::Arc;

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use sqlx::{Pool, Postgres};
use validator::{Validate, ValidateCreditCard, ValidationError};

use crate::repository::{db::Repository, models::CreditCardRecord};

use super::error::StoreError;

/// A card as the platform holds it. Only the non-sensitive fields are persisted.
#[derive(Debug, Clone, Validate)]
pub struct CreditCard {
    pub id: i64,
    #[validate(custom(function = "validate_card_number"))]
    pub number: Secret<String>,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    #[validate(range(min = 2000, max = 2099))]
    pub year: i32,
    #[validate(length(min = 1))]
    pub name: String,
    pub cc_type: Option<String>,
    pub verification_value: Option<Secret<String>>,
    pub gateway_customer_profile_id: Option<String>,
    pub gateway_payment_profile_id: Option<String>,
}

impl CreditCard {
    pub fn payment_profile_id(&self) -> Option<&str> {
        present(&self.gateway_payment_profile_id)
    }

    pub fn customer_profile_id(&self) -> Option<&str> {
        present(&self.gateway_customer_profile_id)
    }

    pub fn has_payment_profile(&self) -> bool {
        self.payment_profile_id().is_some()
    }

    /// Vault token held in either profile field, payment profile first.
    pub fn profile_token(&self) -> Option<&str> {
        self.payment_profile_id().or(self.customer_profile_id())
    }

    /// Last four digits of the number, when it is known.
    pub fn last_digits(&self) -> Option<String> {
        let number = self.number.expose_secret();
        let count = number.chars().count();
        if count < 4 {
            return None;
        }
        Some(number.chars().skip(count - 4).collect())
    }

    pub(crate) fn set_profile_token(&mut self, token: &str) {
        self.gateway_payment_profile_id = Some(token.to_string());
        self.gateway_customer_profile_id = Some(token.to_string());
    }

    pub(crate) fn clear_profile_token(&mut self) {
        self.gateway_payment_profile_id = None;
        self.gateway_customer_profile_id = None;
    }
}

fn validate_card_number(number: &Secret<String>) -> Result<(), ValidationError> {
    if number.expose_secret().validate_credit_card() {
        Ok(())
    } else {
        Err(ValidationError::new("credit_card"))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl TryFrom<CreditCardRecord> for CreditCard {
    type Error = StoreError;

    fn try_from(record: CreditCardRecord) -> Result<Self, Self::Error> {
        let month = match u32::try_from(record.month) {
            Ok(month @ 1..=12) => month,
            _ => {
                return Err(StoreError::InvalidMonth {
                    id: record.id,
                    month: record.month,
                })
            }
        };
        Ok(CreditCard {
            id: record.id,
            number: Secret::new(String::new()),
            month,
            year: record.year,
            name: record.name,
            cc_type: record.cc_type,
            verification_value: None,
            gateway_customer_profile_id: record.gateway_customer_profile_id,
            gateway_payment_profile_id: record.gateway_payment_profile_id,
        })
    }
}

/// A payment: its number identifies it in logs, its source is what the gateway acts on.
#[derive(Debug, Clone)]
pub struct Payment {
    pub number: String,
    pub source: CreditCard,
}

/// Persistence of platform-owned payment sources.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SourceStore: Send + Sync {
    async fn save_profile_ids(&self, card: &CreditCard) -> Result<(), StoreError>;
    async fn destroy(&self, card_id: i64) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: SourceStore + ?Sized> SourceStore for Arc<T> {
    async fn save_profile_ids(&self, card: &CreditCard) -> Result<(), StoreError> {
        (**self).save_profile_ids(card).await
    }

    async fn destroy(&self, card_id: i64) -> Result<(), StoreError> {
        (**self).destroy(card_id).await
    }
}

#[derive(Clone)]
pub struct PgSourceStore {
    db: Pool<Postgres>,
    repo: Repository,
}

impl PgSourceStore {
    pub fn new(db: Pool<Postgres>, repo: Repository) -> Self {
        PgSourceStore { db, repo }
    }

    pub async fn get_credit_card(&self, id: i64) -> Result<CreditCard, StoreError> {
        match self.repo.get_credit_card_by_id(&self.db, id).await {
            Ok(record) => CreditCard::try_from(record),
            Err(sqlx::Error::RowNotFound) => Err(StoreError::NotFound { id }),
            Err(e) => {
                tracing::error!("cannot get_credit_card_by_id due to err: {}", e);
                Err(StoreError::Unexpected {
                    message: "cannot get credit card by id from db".to_string(),
                    source: Box::new(e) as Box<dyn std::error::Error + Send + Sync>,
                })
            }
        }
    }
}

#[async_trait]
impl SourceStore for PgSourceStore {
    async fn save_profile_ids(&self, card: &CreditCard) -> Result<(), StoreError> {
        let updated = self
            .repo
            .update_credit_card_profile_ids(
                &self.db,
                card.id,
                card.gateway_customer_profile_id.as_deref(),
                card.gateway_payment_profile_id.as_deref(),
            )
            .await;
        match updated {
            Ok(0) => Err(StoreError::NotFound { id: card.id }),
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::error!("cannot update_credit_card_profile_ids due to err: {}", e);
                Err(StoreError::Unexpected {
                    message: "cannot save profile ids".to_string(),
                    source: Box::new(e) as Box<dyn std::error::Error + Send + Sync>,
                })
            }
        }
    }

    async fn destroy(&self, card_id: i64) -> Result<(), StoreError> {
        match self.repo.delete_credit_card(&self.db, card_id).await {
            Ok(0) => Err(StoreError::NotFound { id: card_id }),
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::error!("cannot delete_credit_card due to err: {}", e);
                Err(StoreError::Unexpected {
                    message: "cannot destroy credit card".to_string(),
                    source: Box::new(e) as Box<dyn std::error::Error + Send + Sync>,
                })
            }
        }
    }
}
