use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;

use super::dto::{
    MetricsHistoryQuery, UpdateUserMetricsRequest, UpsertUserProfileRequest, UserMetricsRequest,
    UserMetricsResponse, UserProfileResponse,
};
use super::services;
use crate::{
    auth::extractors::CurrentUser,
    error::AppResult,
    pagination::{PageRequest, PageResponse},
    state::AppState,
    validation::validate_payload,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(upsert_profile))
        .route("/profile/metrics", get(metrics_history).post(record_metrics))
        .route("/profile/metrics/latest", get(latest_metrics))
        .route("/profile/metrics/:id", put(update_metrics))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<UserProfileResponse>> {
    Ok(Json(services::get_profile(&state, &user).await?.into()))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn upsert_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpsertUserProfileRequest>,
) -> AppResult<Json<UserProfileResponse>> {
    validate_payload(&payload)?;
    Ok(Json(services::upsert_profile(&state, &user, payload).await?.into()))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn record_metrics(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UserMetricsRequest>,
) -> AppResult<(StatusCode, Json<UserMetricsResponse>)> {
    validate_payload(&payload)?;
    let saved = services::record(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(saved.into())))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn update_metrics(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserMetricsRequest>,
) -> AppResult<Json<UserMetricsResponse>> {
    validate_payload(&payload)?;
    Ok(Json(services::update(&state, &user, id, payload).await?.into()))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn latest_metrics(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<UserMetricsResponse>> {
    Ok(Json(services::latest(&state, &user).await?.into()))
}

#[instrument(skip(state, user, page, range), fields(user_id = user.id))]
pub async fn metrics_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<PageRequest>,
    Query(range): Query<MetricsHistoryQuery>,
) -> AppResult<Json<PageResponse<UserMetricsResponse>>> {
    validate_payload(&page)?;
    validate_payload(&range)?;
    let history = services::history(&state, &user, &range, &page).await?;
    Ok(Json(PageResponse::from_page(Some(history), UserMetricsResponse::from, page.page())))
}
