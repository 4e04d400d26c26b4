use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{repo::User, AuthUser},
    error::ApiError,
    state::AppState,
    users::dto::UpdateProfileRequest,
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users/:id", get(get_user).put(update_user))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    // Profiles are self-service only.
    if caller != id {
        return Err(ApiError::Auth("cannot modify another user's profile".into()));
    }

    let user = User::update_profile(
        &state.db,
        id,
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
        payload.city.as_deref(),
        payload.country.as_deref(),
        payload.bio.as_deref(),
        payload.avatar.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::not_found("user not found"))?;

    info!(user_id = %id, "profile updated");
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::seed_user;

    #[tokio::test]
    async fn profile_update_is_self_service_only() {
        let state = AppState::for_tests().await;
        let ada = seed_user(&state.db, "ada@example.com", "ada").await;
        let bob = seed_user(&state.db, "bob@example.com", "bob").await;

        let err = update_user(
            State(state.clone()),
            AuthUser(bob),
            Path(ada),
            Json(UpdateProfileRequest {
                first_name: Some("Hacked".into()),
                last_name: None,
                city: None,
                country: None,
                bio: None,
                avatar: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Auth(_)));

        let Json(updated) = update_user(
            State(state),
            AuthUser(ada),
            Path(ada),
            Json(UpdateProfileRequest {
                first_name: None,
                last_name: None,
                city: Some("Porto".into()),
                country: None,
                bio: Some("wanderer".into()),
                avatar: None,
            }),
        )
        .await
        .expect("self update");
        assert_eq!(updated.city, "Porto");
        assert_eq!(updated.bio.as_deref(), Some("wanderer"));
        // Untouched fields survive a partial update.
        assert_eq!(updated.first_name, "Test");
    }

    #[tokio::test]
    async fn get_user_returns_404_for_missing_id() {
        let state = AppState::for_tests().await;
        let ada = seed_user(&state.db, "ada@example.com", "ada").await;
        let err = get_user(State(state), AuthUser(ada), Path(9999))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
