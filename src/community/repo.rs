use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub trip_id: Option<i64>,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Post joined with its author and (optional) referenced trip for the feed.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PostWithMeta {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub trip_id: Option<i64>,
    pub trip_title: Option<String>,
    pub title: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CommentWithAuthor {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Post {
    pub async fn create(
        db: &SqlitePool,
        user_id: i64,
        trip_id: Option<i64>,
        title: &str,
        content: &str,
    ) -> anyhow::Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, trip_id, title, content, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(trip_id)
        .bind(title)
        .bind(content)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await?;
        Ok(post)
    }

    /// The whole community feed, most recent first.
    pub async fn list_feed(db: &SqlitePool) -> anyhow::Result<Vec<PostWithMeta>> {
        let posts = sqlx::query_as::<_, PostWithMeta>(
            r#"
            SELECT p.id, p.user_id, u.username, p.trip_id, t.title AS trip_title,
                   p.title, p.content, p.created_at
            FROM posts p
            JOIN users u ON u.id = p.user_id
            LEFT JOIN trips t ON t.id = p.trip_id
            ORDER BY p.created_at DESC, p.id DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(posts)
    }

    pub async fn exists(db: &SqlitePool, id: i64) -> anyhow::Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE id = ?")
            .bind(id)
            .fetch_one(db)
            .await?;
        Ok(count > 0)
    }
}

impl CommentWithAuthor {
    pub async fn list_for_post(db: &SqlitePool, post_id: i64) -> anyhow::Result<Vec<Self>> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.post_id, c.user_id, u.username, c.content, c.created_at
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.post_id = ?
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(db)
        .await?;
        Ok(comments)
    }

    pub async fn create(
        db: &SqlitePool,
        post_id: i64,
        user_id: i64,
        content: &str,
    ) -> anyhow::Result<Self> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO comments (post_id, user_id, content, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await?;

        let comment = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.post_id, c.user_id, u.username, c.content, c.created_at
            FROM comments c
            JOIN users u ON u.id = c.user_id
            WHERE c.id = ?
            "#,
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(comment)
    }
}
