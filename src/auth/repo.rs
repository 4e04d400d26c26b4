use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// User record. The password hash never leaves the process in JSON.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone_number: String,
    pub city: String,
    pub country: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub is_admin: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub struct NewUser<'a> {
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub phone_number: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    pub bio: Option<&'a str>,
    pub avatar: Option<&'a str>,
}

impl User {
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    pub async fn find_by_username(db: &SqlitePool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    /// Insert a new account. Both verification flags are set true here:
    /// registration is only reachable after both channels verified.
    pub async fn create(db: &SqlitePool, new: NewUser<'_>) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users
                (username, first_name, last_name, email, password_hash,
                 phone_number, city, country, bio, avatar,
                 email_verified, phone_verified, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, 1, ?)
            RETURNING *
            "#,
        )
        .bind(new.username)
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.phone_number)
        .bind(new.city)
        .bind(new.country)
        .bind(new.bio)
        .bind(new.avatar)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn update_profile(
        db: &SqlitePool,
        id: i64,
        first_name: Option<&str>,
        last_name: Option<&str>,
        city: Option<&str>,
        country: Option<&str>,
        bio: Option<&str>,
        avatar: Option<&str>,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                first_name = COALESCE(?, first_name),
                last_name  = COALESCE(?, last_name),
                city       = COALESCE(?, city),
                country    = COALESCE(?, country),
                bio        = COALESCE(?, bio),
                avatar     = COALESCE(?, avatar)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(city)
        .bind(country)
        .bind(bio)
        .bind(avatar)
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(db)
            .await?;
        Ok(users)
    }
}
