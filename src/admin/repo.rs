use std::collections::BTreeMap;

use sqlx::SqlitePool;
use time::{Duration, OffsetDateTime};

use crate::admin::dto::{ActivityBucket, AdminStats};

/// Dashboard activity window.
const ACTIVITY_DAYS: i64 = 14;

async fn count_rows(db: &SqlitePool, table: &str) -> anyhow::Result<i64> {
    // Table names come from the fixed list below, never from input.
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db)
        .await?;
    Ok(count)
}

async fn trips_by_status(db: &SqlitePool) -> anyhow::Result<BTreeMap<String, i64>> {
    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM trips GROUP BY status")
            .fetch_all(db)
            .await?;
    Ok(rows.into_iter().collect())
}

async fn daily_counts(
    db: &SqlitePool,
    table: &str,
    cutoff: OffsetDateTime,
) -> anyhow::Result<Vec<(String, i64)>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(&format!(
        "SELECT date(created_at) AS d, COUNT(*) FROM {table} WHERE created_at >= ? GROUP BY d"
    ))
    .bind(cutoff)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn collect_stats(db: &SqlitePool) -> anyhow::Result<AdminStats> {
    let cutoff = OffsetDateTime::now_utc() - Duration::days(ACTIVITY_DAYS);

    let mut buckets: BTreeMap<String, ActivityBucket> = BTreeMap::new();
    for (date, n) in daily_counts(db, "users", cutoff).await? {
        buckets.entry(date.clone()).or_default().users = n;
    }
    for (date, n) in daily_counts(db, "trips", cutoff).await? {
        buckets.entry(date.clone()).or_default().trips = n;
    }
    for (date, n) in daily_counts(db, "posts", cutoff).await? {
        buckets.entry(date.clone()).or_default().posts = n;
    }
    let recent_activity = buckets
        .into_iter()
        .rev() // newest day first
        .map(|(date, mut bucket)| {
            bucket.date = date;
            bucket
        })
        .collect();

    Ok(AdminStats {
        total_users: count_rows(db, "users").await?,
        total_trips: count_rows(db, "trips").await?,
        total_cities: count_rows(db, "cities").await?,
        total_posts: count_rows(db, "posts").await?,
        trips_by_status: trips_by_status(db).await?,
        recent_activity,
    })
}
