//! OTP auth handlers

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::auth::AuthToken;
use crate::core::ServerState;
use crate::db::models::OtpPurpose;
use crate::utils::{AppResponse, AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub email: String,
    pub purpose: OtpPurpose,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub purpose: OtpPurpose,
    pub code: String,
}

/// POST /api/auth/otp/send
pub async fn send(
    State(state): State<ServerState>,
    Json(payload): Json<SendRequest>,
) -> AppResult<Json<AppResponse<()>>> {
    state.otp.send_code(&payload.email, payload.purpose).await?;
    Ok(ok_with_message((), "Code sent"))
}

/// POST /api/auth/otp/verify
pub async fn verify(
    State(state): State<ServerState>,
    Json(payload): Json<VerifyRequest>,
) -> AppResult<Json<AppResponse<AuthToken>>> {
    let token = state
        .otp
        .verify_code(&payload.email, payload.purpose, &payload.code)
        .await?;
    Ok(ok(token))
}

/// POST /api/auth/otp/resend
///
/// Same throttle as send; a resend inside the cooldown window is rejected.
pub async fn resend(
    State(state): State<ServerState>,
    Json(payload): Json<SendRequest>,
) -> AppResult<Json<AppResponse<()>>> {
    state.otp.send_code(&payload.email, payload.purpose).await?;
    Ok(ok_with_message((), "Code resent"))
}
