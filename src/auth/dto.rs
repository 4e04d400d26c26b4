use serde::{Deserialize, Serialize};

use crate::auth::repo::User;

/// Request body for signup. Both verification flags come from the client
/// after it has completed the OTP flows; the server still refuses to create
/// the account unless both are true.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub city: String,
    pub country: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub phone_verified: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
}

/// Identity-check result. Never an error: anonymous is a valid answer.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// Pre-login profile preview, non-sensitive fields only.
#[derive(Debug, Serialize)]
pub struct ProfilePreview {
    pub id: i64,
    pub username: String,
    pub avatar: Option<String>,
}
