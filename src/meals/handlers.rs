use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{AiMealEstimationRequest, CreateMealRequest, DailySummaryResponse, MealDetailResponse, SummaryQuery, UpdateMealRequest};
use super::repo_types::Meal;
use super::services;
use crate::{
    auth::extractors::CurrentUser,
    error::{AppError, AppResult},
    pagination::{PageRequest, PageResponse},
    state::AppState,
    validation::validate_payload,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/summary", get(daily_summary))
        .route("/meals/ai/estimate", post(estimate_meal))
        .route("/meals/:id", get(get_meal).put(update_meal).delete(delete_meal))
}

fn not_found() -> AppError {
    AppError::NotFound("Meal not found".into())
}

#[instrument(skip(state, user, page), fields(user_id = user.id))]
pub async fn list_meals(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<PageRequest>,
) -> AppResult<Json<PageResponse<MealDetailResponse>>> {
    validate_payload(&page)?;
    let meals = Meal::list_page(&state.db, user.id, &page).await?;
    Ok(Json(PageResponse::from_page(Some(meals), MealDetailResponse::from, page.page())))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn create_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateMealRequest>,
) -> AppResult<(StatusCode, Json<MealDetailResponse>)> {
    validate_payload(&payload)?;
    let meal = services::create_meal(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(meal.into())))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MealDetailResponse>> {
    let meal = Meal::find_owned(&state.db, user.id, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(meal.into()))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn update_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateMealRequest>,
) -> AppResult<Json<MealDetailResponse>> {
    validate_payload(&payload)?;
    let mut meal = Meal::find_owned(&state.db, user.id, id)
        .await?
        .ok_or_else(not_found)?;
    payload.apply(&mut meal);
    let saved = Meal::save(&state.db, &meal).await?;
    info!(meal_id = id, "meal updated");
    Ok(Json(saved.into()))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_meal(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if !Meal::delete_owned(&state.db, user.id, id).await? {
        return Err(not_found());
    }
    info!(meal_id = id, "meal deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user, query), fields(user_id = user.id))]
pub async fn daily_summary(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<DailySummaryResponse>> {
    Ok(Json(services::daily_summary(&state, &user, query.date).await?))
}

/// Accepts and checks the estimation contract; no estimator is wired in.
#[instrument(skip(user, payload), fields(user_id = user.id))]
pub async fn estimate_meal(
    CurrentUser(user): CurrentUser,
    Json(payload): Json<AiMealEstimationRequest>,
) -> AppResult<StatusCode> {
    validate_payload(&payload)?;
    info!(role = %payload.role, save = payload.should_save(), "meal estimation requested");
    Err(AppError::Unavailable("AI meal estimation is not available".into()))
}
