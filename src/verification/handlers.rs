use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    error::ApiError,
    state::AppState,
    verification::{
        dto::{
            CodeIssuedResponse, CodeVerifiedResponse, SendEmailOtpRequest, SendPhoneOtpRequest,
            VerifyEmailOtpRequest, VerifyPhoneOtpRequest,
        },
        repo::Purpose,
        service::{is_valid_email, is_valid_phone, issue_code, verify_code},
    },
};

pub fn otp_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/send-phone-otp", post(send_phone_otp))
        .route("/auth/verify-phone-otp", post(verify_phone_otp))
        .route("/auth/send-email-otp", post(send_email_otp))
        .route("/auth/verify-email-otp", post(verify_email_otp))
}

fn issued(code: String, dev_mode: bool, message: &'static str) -> CodeIssuedResponse {
    CodeIssuedResponse {
        message,
        otp: dev_mode.then_some(code),
    }
}

#[instrument(skip(state, payload))]
pub async fn send_phone_otp(
    State(state): State<AppState>,
    Json(payload): Json<SendPhoneOtpRequest>,
) -> Result<Json<CodeIssuedResponse>, ApiError> {
    let phone = payload.phone_number.trim();
    if phone.is_empty() {
        return Err(ApiError::validation("phone number is required"));
    }
    if !is_valid_phone(phone) {
        return Err(ApiError::validation("invalid phone number format"));
    }

    let code = issue_code(&state.db, state.sms.as_ref(), phone, Purpose::Phone).await?;
    Ok(Json(issued(code, state.config.dev_mode, "OTP sent successfully")))
}

#[instrument(skip(state, payload))]
pub async fn verify_phone_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyPhoneOtpRequest>,
) -> Result<Json<CodeVerifiedResponse>, ApiError> {
    let phone = payload.phone_number.trim();
    if phone.is_empty() || payload.otp.trim().is_empty() {
        return Err(ApiError::validation("phone number and OTP are required"));
    }

    verify_code(&state.db, phone, payload.otp.trim(), Purpose::Phone).await?;
    Ok(Json(CodeVerifiedResponse {
        message: "phone number verified successfully",
        verified: true,
    }))
}

#[instrument(skip(state, payload))]
pub async fn send_email_otp(
    State(state): State<AppState>,
    Json(payload): Json<SendEmailOtpRequest>,
) -> Result<Json<CodeIssuedResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ApiError::validation("email is required"));
    }
    if !is_valid_email(&email) {
        return Err(ApiError::validation("invalid email format"));
    }

    let code = issue_code(&state.db, state.email.as_ref(), &email, Purpose::Email).await?;
    Ok(Json(issued(
        code,
        state.config.dev_mode,
        "verification code sent to email",
    )))
}

#[instrument(skip(state, payload))]
pub async fn verify_email_otp(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailOtpRequest>,
) -> Result<Json<CodeVerifiedResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.otp.trim().is_empty() {
        return Err(ApiError::validation("email and OTP are required"));
    }

    verify_code(&state.db, &email, payload.otp.trim(), Purpose::Email).await?;
    Ok(Json(CodeVerifiedResponse {
        message: "email verified successfully",
        verified: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn phone_otp_flow_wrong_then_right_then_replay() {
        let state = AppState::for_tests().await;

        let Json(resp) = send_phone_otp(
            State(state.clone()),
            Json(SendPhoneOtpRequest {
                phone_number: "+15551234567".into(),
            }),
        )
        .await
        .expect("send");
        // dev mode echoes the code
        let code = resp.otp.expect("dev mode echoes code");
        assert_eq!(code.len(), 6);

        let wrong = verify_phone_otp(
            State(state.clone()),
            Json(VerifyPhoneOtpRequest {
                phone_number: "+15551234567".into(),
                otp: "000000".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(wrong, ApiError::NotFound(_)));

        let Json(ok) = verify_phone_otp(
            State(state.clone()),
            Json(VerifyPhoneOtpRequest {
                phone_number: "+15551234567".into(),
                otp: code.clone(),
            }),
        )
        .await
        .expect("correct code verifies");
        assert!(ok.verified);

        let replay = verify_phone_otp(
            State(state),
            Json(VerifyPhoneOtpRequest {
                phone_number: "+15551234567".into(),
                otp: code,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(replay, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn send_rejects_malformed_addresses() {
        let state = AppState::for_tests().await;

        let err = send_phone_otp(
            State(state.clone()),
            Json(SendPhoneOtpRequest {
                phone_number: "12345".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = send_email_otp(
            State(state),
            Json(SendEmailOtpRequest {
                email: "not-an-email".into(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn email_code_not_echoed_outside_dev_mode() {
        let state = AppState::for_tests().await;
        let mut config = (*state.config).clone();
        config.dev_mode = false;
        let state = AppState::from_parts(
            state.db.clone(),
            std::sync::Arc::new(config),
            state.sms.clone(),
            state.email.clone(),
        );

        let Json(resp) = send_email_otp(
            State(state),
            Json(SendEmailOtpRequest {
                email: "ada@example.com".into(),
            }),
        )
        .await
        .expect("send");
        assert!(resp.otp.is_none());
    }
}
