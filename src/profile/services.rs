use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use tracing::{info, instrument};

use super::dto::{MetricsHistoryQuery, UpdateUserMetricsRequest, UpsertUserProfileRequest, UserMetricsRequest};
use super::metrics::{bmi, bmr, normalize_gender};
use super::repo_types::{NewUserMetrics, UserMetrics, UserProfile};
use crate::auth::repo_types::User;
use crate::datetime::now_local;
use crate::error::{AppError, AppResult};
use crate::pagination::{Page, PageRequest};
use crate::state::AppState;

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Metrics entry with ID {id} not found."))
}

pub fn new_metrics(req: UserMetricsRequest, now: PrimitiveDateTime) -> NewUserMetrics {
    let gender = normalize_gender(req.gender.as_deref());
    NewUserMetrics {
        bmi: bmi(Some(req.weight_kg), Some(req.height_cm)),
        bmr: bmr(Some(req.weight_kg), Some(req.height_cm), req.age, gender.as_deref()),
        height_cm: req.height_cm,
        weight_kg: req.weight_kg,
        age: req.age,
        gender,
        user_goal: req.user_goal,
        record_at: req.record_at.unwrap_or(now),
    }
}

/// Overlays the provided fields and recomputes BMI and BMR.
pub fn apply_update(m: &mut UserMetrics, req: UpdateUserMetricsRequest) {
    if let Some(height) = req.height_cm {
        m.height_cm = height;
    }
    if let Some(weight) = req.weight_kg {
        m.weight_kg = weight;
    }
    if req.age.is_some() {
        m.age = req.age;
    }
    if req.gender.is_some() {
        m.gender = normalize_gender(req.gender.as_deref());
    }
    if req.user_goal.is_some() {
        m.user_goal = req.user_goal;
    }
    if let Some(at) = req.record_at {
        m.record_at = at;
    }
    m.bmi = bmi(Some(m.weight_kg), Some(m.height_cm));
    m.bmr = bmr(Some(m.weight_kg), Some(m.height_cm), m.age, m.gender.as_deref());
}

/// Inclusive date window as a half-open UTC instant range.
pub fn history_bounds(q: &MetricsHistoryQuery) -> (Option<OffsetDateTime>, Option<OffsetDateTime>) {
    let midnight = |d: Date| PrimitiveDateTime::new(d, Time::MIDNIGHT).assume_utc();
    let from = q.start_date.map(midnight);
    let until = q.end_date.and_then(|d| d.next_day()).map(midnight);
    (from, until)
}

#[instrument(skip(state, user, req), fields(user_id = user.id))]
pub async fn record(state: &AppState, user: &User, req: UserMetricsRequest) -> AppResult<UserMetrics> {
    let new = new_metrics(req, now_local());
    let saved = UserMetrics::insert(&state.db, user.id, &new).await?;
    info!(metric_id = saved.id, "metrics recorded");
    Ok(saved)
}

#[instrument(skip(state, user, req), fields(user_id = user.id))]
pub async fn update(
    state: &AppState,
    user: &User,
    id: i64,
    req: UpdateUserMetricsRequest,
) -> AppResult<UserMetrics> {
    let mut m = UserMetrics::find_owned(&state.db, user.id, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    apply_update(&mut m, req);
    let saved = UserMetrics::save(&state.db, &m).await?;
    info!(metric_id = id, "metrics updated");
    Ok(saved)
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn latest(state: &AppState, user: &User) -> AppResult<UserMetrics> {
    UserMetrics::latest(&state.db, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No metrics recorded yet".into()))
}

#[instrument(skip(state, user, page), fields(user_id = user.id))]
pub async fn history(
    state: &AppState,
    user: &User,
    range: &MetricsHistoryQuery,
    page: &PageRequest,
) -> AppResult<Page<UserMetrics>> {
    let (from, until) = history_bounds(range);
    Ok(UserMetrics::history_page(&state.db, user.id, from, until, page).await?)
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get_profile(state: &AppState, user: &User) -> AppResult<UserProfile> {
    UserProfile::find(&state.db, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))
}

#[instrument(skip(state, user, req), fields(user_id = user.id))]
pub async fn upsert_profile(
    state: &AppState,
    user: &User,
    req: UpsertUserProfileRequest,
) -> AppResult<UserProfile> {
    let gender = req.gender.map(|g| g.as_str());
    let profile = UserProfile::upsert(&state.db, user.id, req.birth_date, gender).await?;
    info!("profile saved");
    Ok(profile)
}
