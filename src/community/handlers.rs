use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::AuthUser,
    community::{
        dto::{CreateCommentRequest, CreatePostRequest},
        repo::{CommentWithAuthor, Post, PostWithMeta},
    },
    error::ApiError,
    state::AppState,
    trips::repo::Trip,
};

pub fn community_routes() -> Router<AppState> {
    Router::new()
        .route("/community/posts", get(list_posts).post(create_post))
        .route(
            "/community/posts/:id/comments",
            get(list_comments).post(add_comment),
        )
}

#[instrument(skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<PostWithMeta>>, ApiError> {
    let posts = Post::list_feed(&state.db).await?;
    Ok(Json(posts))
}

#[instrument(skip(state, payload))]
pub async fn create_post(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    if payload.title.trim().is_empty() || payload.content.trim().is_empty() {
        return Err(ApiError::validation("title and content are required"));
    }

    // A referenced trip must be one of the author's own.
    if let Some(trip_id) = payload.trip_id {
        Trip::find_for_user(&state.db, trip_id, user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("trip not found"))?;
    }

    let post = Post::create(
        &state.db,
        user_id,
        payload.trip_id,
        payload.title.trim(),
        payload.content.trim(),
    )
    .await?;

    info!(post_id = %post.id, %user_id, "community post created");
    Ok((StatusCode::CREATED, Json(post)))
}

#[instrument(skip(state))]
pub async fn list_comments(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<CommentWithAuthor>>, ApiError> {
    if !Post::exists(&state.db, post_id).await? {
        return Err(ApiError::not_found("post not found"));
    }
    let comments = CommentWithAuthor::list_for_post(&state.db, post_id).await?;
    Ok(Json(comments))
}

#[instrument(skip(state, payload))]
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(post_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentWithAuthor>), ApiError> {
    if payload.content.trim().is_empty() {
        return Err(ApiError::validation("comment content is required"));
    }
    if !Post::exists(&state.db, post_id).await? {
        return Err(ApiError::not_found("post not found"));
    }

    let comment =
        CommentWithAuthor::create(&state.db, post_id, user_id, payload.content.trim()).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::seed_user;
    use crate::trips::repo::{NewTrip, TripStatus};
    use time::macros::date;

    #[tokio::test]
    async fn feed_is_most_recent_first_with_author_and_trip() {
        let state = AppState::for_tests().await;
        let ada = seed_user(&state.db, "ada@example.com", "ada").await;
        let trip = Trip::create(
            &state.db,
            ada,
            NewTrip {
                title: "Iberia loop",
                destination: "Lisbon",
                start_date: date!(2026 - 09 - 01),
                end_date: date!(2026 - 09 - 14),
                status: TripStatus::Upcoming,
                description: None,
            },
        )
        .await
        .unwrap();

        create_post(
            State(state.clone()),
            AuthUser(ada),
            Json(CreatePostRequest {
                title: "First".into(),
                content: "older".into(),
                trip_id: None,
            }),
        )
        .await
        .expect("first post");
        create_post(
            State(state.clone()),
            AuthUser(ada),
            Json(CreatePostRequest {
                title: "Second".into(),
                content: "newer".into(),
                trip_id: Some(trip.id),
            }),
        )
        .await
        .expect("second post");

        let Json(feed) = list_posts(State(state), AuthUser(ada)).await.expect("feed");
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].title, "Second");
        assert_eq!(feed[0].username, "ada");
        assert_eq!(feed[0].trip_title.as_deref(), Some("Iberia loop"));
        assert!(feed[1].trip_title.is_none());
    }

    #[tokio::test]
    async fn post_cannot_reference_someone_elses_trip() {
        let state = AppState::for_tests().await;
        let ada = seed_user(&state.db, "ada@example.com", "ada").await;
        let bob = seed_user(&state.db, "bob@example.com", "bob").await;
        let trip = Trip::create(
            &state.db,
            ada,
            NewTrip {
                title: "Private",
                destination: "Kyoto",
                start_date: date!(2026 - 10 - 01),
                end_date: date!(2026 - 10 - 08),
                status: TripStatus::Upcoming,
                description: None,
            },
        )
        .await
        .unwrap();

        let err = create_post(
            State(state),
            AuthUser(bob),
            Json(CreatePostRequest {
                title: "Hijack".into(),
                content: "not my trip".into(),
                trip_id: Some(trip.id),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn comments_attach_to_existing_posts_only() {
        let state = AppState::for_tests().await;
        let ada = seed_user(&state.db, "ada@example.com", "ada").await;

        let err = add_comment(
            State(state.clone()),
            AuthUser(ada),
            Path(404),
            Json(CreateCommentRequest {
                content: "hello?".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        let (_, Json(post)) = create_post(
            State(state.clone()),
            AuthUser(ada),
            Json(CreatePostRequest {
                title: "Tips".into(),
                content: "ask me anything".into(),
                trip_id: None,
            }),
        )
        .await
        .expect("post");

        add_comment(
            State(state.clone()),
            AuthUser(ada),
            Path(post.id),
            Json(CreateCommentRequest {
                content: "self reply".into(),
            }),
        )
        .await
        .expect("comment");

        let Json(comments) = list_comments(State(state), AuthUser(ada), Path(post.id))
            .await
            .expect("list");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].username, "ada");
    }
}
