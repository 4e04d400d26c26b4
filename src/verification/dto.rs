use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SendPhoneOtpRequest {
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyPhoneOtpRequest {
    pub phone_number: String,
    pub otp: String,
}

#[derive(Debug, Deserialize)]
pub struct SendEmailOtpRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Serialize)]
pub struct CodeIssuedResponse {
    pub message: &'static str,
    /// Present only in dev mode for local testing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CodeVerifiedResponse {
    pub message: &'static str,
    pub verified: bool,
}
