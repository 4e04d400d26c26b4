use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;
use sqlx::SqlitePool;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::notify::Notifier;
use crate::verification::repo::{Purpose, VerificationCode};

/// Codes are valid for ten minutes from issuance.
pub const CODE_TTL: Duration = Duration::minutes(10);

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// International formats: 10 to 15 digits, punctuation ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    (10..=15).contains(&digits)
}

/// 6-digit decimal code, uniform over [100000, 999999].
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("failed to send verification code")]
    Gateway(#[source] anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<IssueError> for ApiError {
    fn from(e: IssueError) -> Self {
        match e {
            IssueError::Gateway(inner) => {
                warn!(error = %inner, "verification gateway failure");
                ApiError::Unavailable("failed to send verification code".into())
            }
            IssueError::Internal(inner) => ApiError::Internal(inner),
        }
    }
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("invalid verification code")]
    NotFound,
    #[error("verification code has expired")]
    Expired,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<VerifyError> for ApiError {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::NotFound => ApiError::not_found("invalid verification code"),
            VerifyError::Expired => ApiError::validation("verification code has expired"),
            VerifyError::Internal(inner) => ApiError::Internal(inner),
        }
    }
}

/// Issue a fresh code for (address, purpose): prior unconsumed codes are
/// invalidated, the new record is persisted, then the gateway dispatches it.
/// A gateway failure is reported to the caller so it can retry; the stored
/// code stays behind and is superseded by the next issuance.
pub async fn issue_code(
    db: &SqlitePool,
    gateway: &dyn Notifier,
    address: &str,
    purpose: Purpose,
) -> Result<String, IssueError> {
    VerificationCode::invalidate_unconsumed(db, address, purpose).await?;

    let code = generate_code();
    let expires_at = OffsetDateTime::now_utc() + CODE_TTL;
    VerificationCode::insert(db, address, &code, purpose, expires_at).await?;

    gateway
        .send(
            address,
            &format!("Your GlobeTrotter verification code is {code}"),
        )
        .await
        .map_err(IssueError::Gateway)?;

    info!(%address, ?purpose, "verification code issued");
    Ok(code)
}

/// Consume a code: the most recently issued unconsumed match wins. Succeeds
/// at most once per code; a second attempt fails with `NotFound`.
pub async fn verify_code(
    db: &SqlitePool,
    address: &str,
    code: &str,
    purpose: Purpose,
) -> Result<(), VerifyError> {
    let record = VerificationCode::find_latest_match(db, address, code, purpose)
        .await?
        .ok_or(VerifyError::NotFound)?;

    if record.expires_at < OffsetDateTime::now_utc() {
        return Err(VerifyError::Expired);
    }

    VerificationCode::mark_consumed(db, record.id).await?;
    info!(%address, ?purpose, "verification code consumed");
    Ok(())
}
