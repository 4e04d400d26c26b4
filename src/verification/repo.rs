use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// Which contact channel a code proves control of. Both flows share one
/// table; the purpose tag keeps them from validating each other's codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Purpose {
    Phone,
    Email,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VerificationCode {
    pub id: i64,
    pub address: String,
    pub code: String,
    pub purpose: Purpose,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
    pub consumed: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl VerificationCode {
    /// Drop any still-unconsumed codes for this address and purpose so only
    /// the newest issuance is ever valid.
    pub async fn invalidate_unconsumed(
        db: &SqlitePool,
        address: &str,
        purpose: Purpose,
    ) -> anyhow::Result<u64> {
        let result =
            sqlx::query("DELETE FROM verification_codes WHERE address = ? AND purpose = ? AND consumed = 0")
                .bind(address)
                .bind(purpose)
                .execute(db)
                .await?;
        Ok(result.rows_affected())
    }

    pub async fn insert(
        db: &SqlitePool,
        address: &str,
        code: &str,
        purpose: Purpose,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<VerificationCode> {
        let record = sqlx::query_as::<_, VerificationCode>(
            r#"
            INSERT INTO verification_codes (address, code, purpose, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(address)
        .bind(code)
        .bind(purpose)
        .bind(expires_at)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await?;
        Ok(record)
    }

    /// Most recently issued unconsumed code matching address+code+purpose.
    pub async fn find_latest_match(
        db: &SqlitePool,
        address: &str,
        code: &str,
        purpose: Purpose,
    ) -> anyhow::Result<Option<VerificationCode>> {
        let record = sqlx::query_as::<_, VerificationCode>(
            r#"
            SELECT * FROM verification_codes
            WHERE address = ? AND code = ? AND purpose = ? AND consumed = 0
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(address)
        .bind(code)
        .bind(purpose)
        .fetch_optional(db)
        .await?;
        Ok(record)
    }

    pub async fn mark_consumed(db: &SqlitePool, id: i64) -> anyhow::Result<()> {
        sqlx::query("UPDATE verification_codes SET consumed = 1 WHERE id = ?")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
