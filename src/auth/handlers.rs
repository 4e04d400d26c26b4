use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, CheckResponse, LoginRequest, ProfilePreview, SignupRequest},
        password::{hash_password, verify_password},
        repo::{NewUser, User},
        session::{expired_session_cookie, session_cookie, SessionKeys, SESSION_COOKIE},
    },
    error::ApiError,
    state::AppState,
    verification::service::is_valid_email,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/check", get(check))
        .route("/auth/logout", post(logout))
        .route("/users/by-email/:email", get(profile_preview))
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let required = [
        &payload.username,
        &payload.first_name,
        &payload.last_name,
        &payload.email,
        &payload.password,
        &payload.phone_number,
        &payload.city,
        &payload.country,
    ];
    if required.iter().any(|f| f.trim().is_empty()) {
        return Err(ApiError::validation("all required fields must be provided"));
    }

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::validation("invalid email format"));
    }

    if payload.password.len() < 6 {
        return Err(ApiError::validation("password must be at least 6 characters"));
    }

    // Activation requires both channels verified before the row exists.
    if !payload.phone_verified {
        return Err(ApiError::validation("phone number must be verified"));
    }
    if !payload.email_verified {
        return Err(ApiError::validation("email must be verified"));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict(
            "user with this email already exists".into(),
        ));
    }
    if User::find_by_username(&state.db, &payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("username already taken".into()));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        NewUser {
            username: &payload.username,
            first_name: &payload.first_name,
            last_name: &payload.last_name,
            email: &payload.email,
            password_hash: &hash,
            phone_number: &payload.phone_number,
            city: &payload.city,
            country: &payload.country,
            bio: payload.bio.as_deref(),
            avatar: payload.avatar.as_deref(),
        },
    )
    .await?;

    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    let jar = jar.add(session_cookie(token));

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, jar, Json(AuthResponse { user })))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    // Unknown email and wrong password produce the same error so callers
    // cannot probe which addresses are registered.
    let invalid = || ApiError::Auth("invalid email or password".into());

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(invalid());
        }
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(user.id)?;
    let jar = jar.add(session_cookie(token));

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((jar, Json(AuthResponse { user })))
}

#[instrument(skip(state, jar))]
pub async fn check(State(state): State<AppState>, jar: CookieJar) -> Json<CheckResponse> {
    let keys = SessionKeys::from_ref(&state);
    let user_id = jar
        .get(SESSION_COOKIE)
        .and_then(|c| keys.verify(c.value()).ok())
        .map(|claims| claims.sub);
    Json(CheckResponse {
        authenticated: user_id.is_some(),
        user_id,
    })
}

#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = jar.remove(expired_session_cookie());
    (jar, Json(json!({ "message": "logged out" })))
}

#[instrument(skip(state))]
pub async fn profile_preview(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<ProfilePreview>, ApiError> {
    let email = email.trim().to_lowercase();
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;
    Ok(Json(ProfilePreview {
        id: user.id,
        username: user.username,
        avatar: user.avatar,
    }))
}
