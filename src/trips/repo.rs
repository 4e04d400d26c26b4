use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TripStatus {
    Upcoming,
    Ongoing,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub destination: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: TripStatus,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

pub struct NewTrip<'a> {
    pub title: &'a str,
    pub destination: &'a str,
    pub start_date: Date,
    pub end_date: Date,
    pub status: TripStatus,
    pub description: Option<&'a str>,
}

impl Trip {
    pub async fn create(db: &SqlitePool, user_id: i64, new: NewTrip<'_>) -> anyhow::Result<Trip> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            INSERT INTO trips
                (user_id, title, destination, start_date, end_date, status, description, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(new.title)
        .bind(new.destination)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.status)
        .bind(new.description)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await?;
        Ok(trip)
    }

    pub async fn find_for_user(
        db: &SqlitePool,
        id: i64,
        user_id: i64,
    ) -> anyhow::Result<Option<Trip>> {
        let trip = sqlx::query_as::<_, Trip>("SELECT * FROM trips WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(db)
            .await?;
        Ok(trip)
    }

    /// Owner-scoped listing, optionally narrowed by status and a free-text
    /// search over title and destination. Most recent first.
    pub async fn list(
        db: &SqlitePool,
        user_id: i64,
        status: Option<TripStatus>,
        search: Option<&str>,
    ) -> anyhow::Result<Vec<Trip>> {
        let pattern = search.map(|q| format!("%{}%", q));
        let trips = sqlx::query_as::<_, Trip>(
            r#"
            SELECT * FROM trips
            WHERE user_id = ?1
              AND (?2 IS NULL OR status = ?2)
              AND (?3 IS NULL OR title LIKE ?3 OR destination LIKE ?3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(pattern)
        .fetch_all(db)
        .await?;
        Ok(trips)
    }

    pub async fn update(
        db: &SqlitePool,
        id: i64,
        user_id: i64,
        title: Option<&str>,
        destination: Option<&str>,
        start_date: Option<Date>,
        end_date: Option<Date>,
        status: Option<TripStatus>,
        description: Option<&str>,
    ) -> anyhow::Result<Option<Trip>> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"
            UPDATE trips SET
                title       = COALESCE(?, title),
                destination = COALESCE(?, destination),
                start_date  = COALESCE(?, start_date),
                end_date    = COALESCE(?, end_date),
                status      = COALESCE(?, status),
                description = COALESCE(?, description)
            WHERE id = ? AND user_id = ?
            RETURNING *
            "#,
        )
        .bind(title)
        .bind(destination)
        .bind(start_date)
        .bind(end_date)
        .bind(status)
        .bind(description)
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(trip)
    }

    /// Deletes the trip; sections and activities go with it via cascade.
    pub async fn delete(db: &SqlitePool, id: i64, user_id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM trips WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
