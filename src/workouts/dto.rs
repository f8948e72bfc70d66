use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use validator::Validate;

use super::repo_types::Workout;
use crate::validation::{non_negative_decimal, not_blank};

/// Manually logged workout; used for create and full update.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRequest {
    /// Optional on the wire; when present it must be the caller.
    pub user_id: Option<i64>,
    pub workout_date: Option<Date>,
    #[validate(custom(function = "not_blank", message = "Workout type is required"))]
    pub workout_type: String,
    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration_minutes: Option<i32>,
    #[validate(custom(function = "non_negative_decimal"))]
    pub calories_burned: Option<Decimal>,
    pub notes: Option<String>,
}

/// Free-text workout for the AI estimator. Field names are snake_case on the wire.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AiWorkoutRequest {
    pub user_id: Option<i64>,
    #[validate(custom(function = "not_blank", message = "Workout description is required"))]
    pub description: String,
    pub save: Option<bool>,
    pub workout_date: Option<Date>,
    pub notes: Option<String>,
}

impl AiWorkoutRequest {
    pub fn should_save(&self) -> bool {
        self.save != Some(false)
    }
}

/// Optional filter of the workout list.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutFilter {
    pub workout_date: Option<Date>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDto {
    pub workout_id: i64,
    pub user_id: i64,
    pub workout_type: String,
    pub workout_date: Option<Date>,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<Decimal>,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Workout> for WorkoutDto {
    fn from(w: Workout) -> Self {
        Self {
            workout_id: w.id,
            user_id: w.user_id,
            workout_type: w.workout_type,
            workout_date: w.workout_date,
            duration_minutes: w.duration_minutes,
            calories_burned: w.calories_burned,
            notes: w.notes,
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

/// Outcome of a write operation.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WorkoutResponse {
    pub success: bool,
    pub message: String,
}

impl WorkoutResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::validation::validate_payload;

    #[test]
    fn ai_request_uses_snake_case_and_saves_by_default() {
        let req: AiWorkoutRequest = serde_json::from_str(
            r#"{"user_id":3,"description":"5k run","workout_date":"2024-05-01"}"#,
        )
        .unwrap();
        assert_eq!(req.user_id, Some(3));
        assert_eq!(req.workout_date, Some(date!(2024-05-01)));
        assert!(req.should_save());

        let req: AiWorkoutRequest =
            serde_json::from_str(r#"{"description":"yoga","save":false}"#).unwrap();
        assert!(!req.should_save());
    }

    #[test]
    fn workout_request_is_validated() {
        let req: WorkoutRequest = serde_json::from_str(
            r#"{"workoutType":" ","durationMinutes":0,"caloriesBurned":-3}"#,
        )
        .unwrap();
        let Err(crate::error::AppError::Validation(v)) = validate_payload(&req) else {
            panic!("expected validation failure");
        };
        let fields: Vec<_> = v.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["calories_burned", "duration_minutes", "workout_type"]);

        let req: WorkoutRequest = serde_json::from_str(
            r#"{"workoutDate":"2024-05-01","workoutType":"Cycling","durationMinutes":45,"caloriesBurned":410.5}"#,
        )
        .unwrap();
        assert!(validate_payload(&req).is_ok());
    }
}
