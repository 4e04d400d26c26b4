use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    admin::{dto::AdminStats, repo::collect_stats},
    auth::{repo::User, AuthUser},
    error::ApiError,
    state::AppState,
};

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(stats))
        .route("/admin/users", get(list_users))
}

async fn require_admin(state: &AppState, user_id: i64) -> Result<(), ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| ApiError::Auth("not authenticated".into()))?;
    if !user.is_admin {
        return Err(ApiError::Auth("admin access required".into()));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn stats(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<AdminStats>, ApiError> {
    require_admin(&state, user_id).await?;
    let stats = collect_stats(&state.db).await?;
    Ok(Json(stats))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<User>>, ApiError> {
    require_admin(&state, user_id).await?;
    let users = User::list_all(&state.db).await?;
    Ok(Json(users))
}
