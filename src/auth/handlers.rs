use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{
        AuthResponse, EmailRequest, EmailVerificationRequest, EmailVerificationResponse, LoginRequest,
        PasswordResetResponse, RegisterRequest, ResetPasswordRequest, UserResponse,
    },
    extractors::CurrentUser,
    jwt::JwtKeys,
    services,
};
use crate::{error::AppResult, state::AppState, validation::validate_payload};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/verify-email", post(verify_email))
        .route("/auth/email-verify", post(verify_email))
        .route("/auth/resend-verification", post(resend_verification))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

fn status_for(success: bool, failure: StatusCode) -> StatusCode {
    if success {
        StatusCode::OK
    } else {
        failure
    }
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    validate_payload(&payload)?;
    let keys = JwtKeys::from_ref(&state);
    let resp = services::register(&state, &keys, payload).await?;
    let status = if resp.success {
        StatusCode::CREATED
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(resp)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    validate_payload(&payload)?;
    let keys = JwtKeys::from_ref(&state);
    let resp = services::login(&state, &keys, payload).await?;
    Ok((status_for(resp.success, StatusCode::UNAUTHORIZED), Json(resp)))
}

#[instrument(skip(state, payload))]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(payload): Json<EmailVerificationRequest>,
) -> AppResult<(StatusCode, Json<EmailVerificationResponse>)> {
    validate_payload(&payload)?;
    let resp = services::verify_email(&state, payload.token.trim()).await?;
    Ok((status_for(resp.success, StatusCode::BAD_REQUEST), Json(resp)))
}

#[instrument(skip(state, payload))]
pub async fn resend_verification(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> AppResult<(StatusCode, Json<EmailVerificationResponse>)> {
    validate_payload(&payload)?;
    let resp = services::resend_verification(&state, &payload.email).await?;
    Ok((status_for(resp.success, StatusCode::BAD_REQUEST), Json(resp)))
}

#[instrument(skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<EmailRequest>,
) -> AppResult<(StatusCode, Json<PasswordResetResponse>)> {
    validate_payload(&payload)?;
    let resp = services::forgot_password(&state, &payload.email).await?;
    Ok((status_for(resp.success, StatusCode::BAD_REQUEST), Json(resp)))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> AppResult<(StatusCode, Json<PasswordResetResponse>)> {
    validate_payload(&payload)?;
    let resp = services::reset_password(&state, payload.token.trim(), &payload.new_password).await?;
    Ok((status_for(resp.success, StatusCode::BAD_REQUEST), Json(resp)))
}

#[instrument(skip_all)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcomes_keep_their_status() {
        assert_eq!(status_for(true, StatusCode::UNAUTHORIZED), StatusCode::OK);
        assert_eq!(status_for(false, StatusCode::UNAUTHORIZED), StatusCode::UNAUTHORIZED);
    }
}
