use sqlx::{PgConnection, Pool, Postgres};

use super::{db::Repository, models::CreditCardRecord};

pub struct CreateCreditCardArgs<'a> {
    pub month: i32,
    pub year: i32,
    pub name: &'a str,
    pub cc_type: Option<&'a str>,
    pub last_digits: Option<&'a str>,
}

impl Repository {
    pub async fn create_credit_card(
        &self,
        conn: &mut PgConnection,
        args: CreateCreditCardArgs<'_>,
    ) -> Result<CreditCardRecord, sqlx::Error> {
        let res = sqlx::query_as::<_, CreditCardRecord>(
            "INSERT INTO credit_cards (
            month,
            year,
            name,
            cc_type,
            last_digits,
            created_at,
            updated_at
            ) VALUES(
            $1, $2, $3, $4, $5, NOW(), NOW()
            ) RETURNING *",
        )
        .bind(args.month)
        .bind(args.year)
        .bind(args.name)
        .bind(args.cc_type)
        .bind(args.last_digits)
        .fetch_one(&mut *conn)
        .await?;
        Ok(res)
    }

    pub async fn get_credit_card_by_id(
        &self,
        db: &Pool<Postgres>,
        id: i64,
    ) -> Result<CreditCardRecord, sqlx::Error> {
        let res = sqlx::query_as::<_, CreditCardRecord>(
            "SELECT * FROM credit_cards WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(res)
    }

    /// Returns the number of updated rows.
    pub async fn update_credit_card_profile_ids(
        &self,
        db: &Pool<Postgres>,
        id: i64,
        gateway_customer_profile_id: Option<&str>,
        gateway_payment_profile_id: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let res = sqlx::query(
            "UPDATE credit_cards
            SET gateway_customer_profile_id = $2,
             gateway_payment_profile_id = $3,
             updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL;",
        )
        .bind(id)
        .bind(gateway_customer_profile_id)
        .bind(gateway_payment_profile_id)
        .execute(db)
        .await?;
        Ok(res.rows_affected())
    }

    /// Soft delete, the row stays for the payments that reference it.
    pub async fn delete_credit_card(&self, db: &Pool<Postgres>, id: i64) -> Result<u64, sqlx::Error> {
        let res = sqlx::query(
            "UPDATE credit_cards
            SET deleted_at = NOW(),
             updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL;",
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(res.rows_affected())
    }
}
