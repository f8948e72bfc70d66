use axum::{http::StatusCode, routing::post, Json, Router};
use tracing::{info, instrument};

use super::dto::{CreateInsightRequest, SuggestionRequest};
use crate::{
    auth::extractors::CurrentUser,
    error::{AppError, AppResult},
    state::AppState,
    validation::validate_payload,
    workouts::ensure_caller,
};

pub fn insight_routes() -> Router<AppState> {
    Router::new()
        .route("/insights/generate", post(generate_insight))
        .route("/insights/suggestions", post(generate_suggestions))
}

/// Checks the insight contract; no analysis engine is wired in.
#[instrument(skip(user, payload), fields(user_id = user.id))]
pub async fn generate_insight(
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateInsightRequest>,
) -> AppResult<StatusCode> {
    validate_payload(&payload)?;
    ensure_caller(&user, payload.user_id)?;
    info!(
        analysis_type = payload.resolved_analysis_type().unwrap_or("overall"),
        force = payload.force_regenerate,
        "insight requested"
    );
    Err(AppError::Unavailable("AI insights are not available".into()))
}

#[instrument(skip(user, payload), fields(user_id = user.id))]
pub async fn generate_suggestions(
    CurrentUser(user): CurrentUser,
    Json(payload): Json<SuggestionRequest>,
) -> AppResult<StatusCode> {
    validate_payload(&payload)?;
    ensure_caller(&user, payload.user_id)?;
    info!(
        kind = payload.suggestion_type.as_deref().unwrap_or("general"),
        focus_areas = payload.focus_areas.len(),
        "suggestions requested"
    );
    Err(AppError::Unavailable("AI suggestions are not available".into()))
}
