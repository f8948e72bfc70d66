use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{
    DailyProgressPoint, ExportQuery, ExportResponse, QuickStatsQuery, QuickStatsResponse, RangeQuery, TodayMeal,
};
use super::services::{self, DateWindow, Period};
use crate::{auth::extractors::CurrentUser, datetime::now_local, error::AppResult, state::AppState};

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/quick-stats", get(quick_stats))
        .route("/dashboard/daily-progress", get(daily_progress))
        .route("/dashboard/today-meals", get(today_meals))
        .route("/dashboard/export-data-json", get(export_json))
}

#[instrument(skip(state, user, query), fields(user_id = user.id))]
pub async fn quick_stats(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<QuickStatsQuery>,
) -> AppResult<Json<QuickStatsResponse>> {
    let period = Period::parse(query.period.as_deref())?;
    Ok(Json(services::quick_stats(&state, &user, period).await?))
}

#[instrument(skip(state, user, query), fields(user_id = user.id))]
pub async fn daily_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<DailyProgressPoint>>> {
    let window = DateWindow::parse(query.date_range.as_deref(), now_local().date())?;
    Ok(Json(services::daily_progress(&state, &user, window).await?))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn today_meals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<TodayMeal>>> {
    Ok(Json(services::today_meals(&state, &user).await?))
}

#[instrument(skip(state, user, query), fields(user_id = user.id))]
pub async fn export_json(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ExportQuery>,
) -> AppResult<Json<ExportResponse>> {
    let format = services::export_format(query.format.as_deref())?;
    let window = DateWindow::parse(query.date_range.as_deref(), now_local().date())?;
    let label = query
        .date_range
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| "30d".into());
    Ok(Json(services::export(&state, &user, window, format, label).await?))
}
