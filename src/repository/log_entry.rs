use sqlx::{Pool, Postgres};

use super::{db::Repository, models::LogEntry};

pub struct CreateLogEntryArgs<'a> {
    pub operation: &'a str,
    pub success: bool,
    pub message: &'a str,
    pub authorization: Option<&'a str>,
    pub details: serde_json::Value,
}

impl Repository {
    pub async fn create_log_entry(
        &self,
        db: &Pool<Postgres>,
        args: CreateLogEntryArgs<'_>,
    ) -> Result<LogEntry, sqlx::Error> {
        let res = sqlx::query_as::<_, LogEntry>(
            "INSERT INTO log_entries (
            operation,
            success,
            message,
            authorization_code,
            details,
            created_at
            ) VALUES(
            $1, $2, $3, $4, $5, NOW()
            ) RETURNING *",
        )
        .bind(args.operation)
        .bind(args.success)
        .bind(args.message)
        .bind(args.authorization)
        .bind(args.details)
        .fetch_one(db)
        .await?;
        Ok(res)
    }

    pub async fn get_log_entries_by_operation(
        &self,
        db: &Pool<Postgres>,
        operation: &str,
    ) -> Result<Vec<LogEntry>, sqlx::Error> {
        let res = sqlx::query_as::<_, LogEntry>(
            "SELECT * FROM log_entries WHERE operation = $1 ORDER BY id DESC",
        )
        .bind(operation)
        .fetch_all(db)
        .await?;
        Ok(res)
    }
}
