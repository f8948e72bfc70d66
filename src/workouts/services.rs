use tracing::{info, instrument, warn};

use super::dto::{WorkoutRequest, WorkoutResponse};
use super::repo_types::Workout;
use crate::auth::repo_types::User;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A `userId` in the payload is accepted only when it names the caller.
pub fn ensure_caller(user: &User, requested: Option<i64>) -> AppResult<()> {
    match requested {
        Some(id) if id != user.id => {
            warn!(caller = user.id, requested = id, "payload names another user");
            Err(AppError::BadRequest(
                "Authenticated user does not match request payload".into(),
            ))
        }
        _ => Ok(()),
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Workout with ID {id} not found."))
}

#[instrument(skip(state, user, req), fields(user_id = user.id))]
pub async fn create(state: &AppState, user: &User, req: &WorkoutRequest) -> AppResult<WorkoutResponse> {
    ensure_caller(user, req.user_id)?;
    let workout = Workout::insert(&state.db, user.id, req).await?;
    info!(workout_id = workout.id, "workout created");
    Ok(WorkoutResponse::ok(format!("Workout created with ID {}.", workout.id)))
}

#[instrument(skip(state, user, req), fields(user_id = user.id))]
pub async fn update(
    state: &AppState,
    user: &User,
    id: i64,
    req: &WorkoutRequest,
) -> AppResult<WorkoutResponse> {
    ensure_caller(user, req.user_id)?;
    Workout::update_owned(&state.db, user.id, id, req)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!(workout_id = id, "workout updated");
    Ok(WorkoutResponse::ok(format!("Workout with ID {id} updated.")))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete(state: &AppState, user: &User, id: i64) -> AppResult<WorkoutResponse> {
    if !Workout::delete_owned(&state.db, user.id, id).await? {
        return Err(not_found(id));
    }
    info!(workout_id = id, "workout deleted");
    Ok(WorkoutResponse::ok(format!("Workout with ID {id} deleted.")))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn get(state: &AppState, user: &User, id: i64) -> AppResult<Workout> {
    Workout::find_owned(&state.db, user.id, id)
        .await?
        .ok_or_else(|| not_found(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::current_user::fakes::user;

    #[test]
    fn payload_user_must_match_caller() {
        let caller = user("ana@example.com");
        assert!(ensure_caller(&caller, None).is_ok());
        assert!(ensure_caller(&caller, Some(caller.id)).is_ok());
        let err = ensure_caller(&caller, Some(caller.id + 1)).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m == "Authenticated user does not match request payload"));
    }
}
