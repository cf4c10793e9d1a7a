use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::client::moneris::Response;
use crate::repository::{db::Repository, log_entry::CreateLogEntryArgs};

/// The platform's hook for failed provider calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn gateway_error(&self, operation: &str, response: &Response);
}

#[async_trait]
impl<T: ErrorReporter + ?Sized> ErrorReporter for Arc<T> {
    async fn gateway_error(&self, operation: &str, response: &Response) {
        (**self).gateway_error(operation, response).await
    }
}

#[derive(Clone, Debug, Default)]
pub struct TracingReporter;

#[async_trait]
impl ErrorReporter for TracingReporter {
    async fn gateway_error(&self, operation: &str, response: &Response) {
        tracing::warn!(
            operation,
            response_code = response.param("response_code").unwrap_or_default(),
            "gateway error: {}",
            response.message()
        );
    }
}

/// Keeps a `log_entries` row for every failed provider call.
#[derive(Clone)]
pub struct LogEntryReporter {
    db: Pool<Postgres>,
    repo: Repository,
}

impl LogEntryReporter {
    pub fn new(db: Pool<Postgres>, repo: Repository) -> Self {
        LogEntryReporter { db, repo }
    }
}

#[async_trait]
impl ErrorReporter for LogEntryReporter {
    async fn gateway_error(&self, operation: &str, response: &Response) {
        TracingReporter.gateway_error(operation, response).await;

        let details = match serde_json::to_value(response) {
            Ok(details) => details,
            Err(e) => {
                tracing::error!("cannot serialize gateway response due to err: {}", e);
                serde_json::Value::Null
            }
        };
        let res = self
            .repo
            .create_log_entry(
                &self.db,
                CreateLogEntryArgs {
                    operation,
                    success: response.success(),
                    message: response.message(),
                    authorization: response.authorization(),
                    details,
                },
            )
            .await;
        if let Err(e) = res {
            tracing::error!("cannot create_log_entry due to err: {}", e);
        }
    }
}
