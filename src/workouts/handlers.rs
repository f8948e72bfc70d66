use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{AiWorkoutRequest, WorkoutDto, WorkoutFilter, WorkoutRequest, WorkoutResponse};
use super::repo_types::Workout;
use super::services;
use crate::{
    auth::extractors::CurrentUser,
    error::{AppError, AppResult},
    pagination::{PageRequest, PageResponse},
    state::AppState,
    validation::validate_payload,
};

pub fn workout_routes() -> Router<AppState> {
    Router::new()
        .route("/workouts", get(list_workouts).post(create_workout))
        .route("/workouts/ai", post(estimate_workout))
        .route(
            "/workouts/:id",
            get(get_workout).put(update_workout).delete(delete_workout),
        )
}

#[instrument(skip(state, user, page, filter), fields(user_id = user.id))]
pub async fn list_workouts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<PageRequest>,
    Query(filter): Query<WorkoutFilter>,
) -> AppResult<Json<PageResponse<WorkoutDto>>> {
    validate_payload(&page)?;
    let workouts = Workout::list_page(&state.db, user.id, filter.workout_date, &page).await?;
    Ok(Json(PageResponse::from_page(Some(workouts), WorkoutDto::from, page.page())))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn create_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<WorkoutRequest>,
) -> AppResult<(StatusCode, Json<WorkoutResponse>)> {
    validate_payload(&payload)?;
    let resp = services::create(&state, &user, &payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<WorkoutDto>> {
    Ok(Json(services::get(&state, &user, id).await?.into()))
}

#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn update_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<WorkoutRequest>,
) -> AppResult<Json<WorkoutResponse>> {
    validate_payload(&payload)?;
    Ok(Json(services::update(&state, &user, id, &payload).await?))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_workout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<WorkoutResponse>> {
    Ok(Json(services::delete(&state, &user, id).await?))
}

/// Checks the AI workout contract; no estimator is wired in.
#[instrument(skip(user, payload), fields(user_id = user.id))]
pub async fn estimate_workout(
    CurrentUser(user): CurrentUser,
    Json(payload): Json<AiWorkoutRequest>,
) -> AppResult<StatusCode> {
    validate_payload(&payload)?;
    services::ensure_caller(&user, payload.user_id)?;
    info!(save = payload.should_save(), "workout estimation requested");
    Err(AppError::Unavailable("AI workout estimation is not available".into()))
}
