use chrono;
use serde::{Deserialize, Serialize};

#[derive(sqlx::FromRow, Deserialize, Serialize, Debug)]
pub struct CreditCardRecord {
    pub id: i64,
    pub month: i32,
    pub year: i32,
    pub name: String,
    pub cc_type: Option<String>,
    pub last_digits: Option<String>,
    pub gateway_customer_profile_id: Option<String>,
    pub gateway_payment_profile_id: Option<String>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(sqlx::FromRow, Deserialize, Serialize, Debug)]
pub struct LogEntry {
    pub id: i64,
    pub operation: String,
    pub success: bool,
    pub message: String,
    pub authorization_code: Option<String>,
    pub details: sqlx::types::JsonValue,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
