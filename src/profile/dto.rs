use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, PrimitiveDateTime};
use validator::{Validate, ValidationError};

use super::repo_types::{UserMetrics, UserProfile};
use crate::datetime::iso_local;
use crate::validation::{past_date, positive_decimal};

/// Largest height or weight the metrics columns hold.
pub const MAX_MEASUREMENT: Decimal = Decimal::from_parts(999_999, 0, 0, false, 2);

fn measurement(value: &Decimal, field: &'static str) -> Result<(), ValidationError> {
    let message = if positive_decimal(value).is_err() {
        format!("{field} must be greater than zero")
    } else if *value > MAX_MEASUREMENT {
        format!("{field} must not exceed {MAX_MEASUREMENT}")
    } else {
        return Ok(());
    };
    let mut err = ValidationError::new("measurement");
    err.message = Some(message.into());
    Err(err)
}

fn valid_height(value: &Decimal) -> Result<(), ValidationError> {
    measurement(value, "Height")
}

fn valid_weight(value: &Decimal) -> Result<(), ValidationError> {
    measurement(value, "Weight")
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserMetricsRequest {
    #[validate(custom(function = "valid_height"))]
    pub height_cm: Decimal,
    #[validate(custom(function = "valid_weight"))]
    pub weight_kg: Decimal,
    #[validate(range(min = 1, message = "Age must be a positive number"))]
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub user_goal: Option<String>,
    #[serde(default, with = "iso_local::option")]
    pub record_at: Option<PrimitiveDateTime>,
}

/// Partial update of a metrics entry.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserMetricsRequest {
    #[validate(custom(function = "valid_height"))]
    pub height_cm: Option<Decimal>,
    #[validate(custom(function = "valid_weight"))]
    pub weight_kg: Option<Decimal>,
    #[validate(range(min = 1, message = "Age must be a positive number"))]
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub user_goal: Option<String>,
    #[serde(default, with = "iso_local::option")]
    pub record_at: Option<PrimitiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetricsResponse {
    pub metric_id: i64,
    pub user_id: i64,
    pub height_cm: Decimal,
    pub weight_kg: Decimal,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub bmi: Option<Decimal>,
    pub bmr: Option<Decimal>,
    pub user_goal: Option<String>,
    #[serde(with = "iso_local")]
    pub record_at: PrimitiveDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<UserMetrics> for UserMetricsResponse {
    fn from(m: UserMetrics) -> Self {
        Self {
            metric_id: m.id,
            user_id: m.user_id,
            height_cm: m.height_cm,
            weight_kg: m.weight_kg,
            age: m.age,
            gender: m.gender,
            bmi: m.bmi,
            bmr: m.bmr,
            user_goal: m.user_goal,
            record_at: m.record_at,
            created_at: m.created_at,
        }
    }
}

/// Date window of the metrics history; both ends inclusive.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "ordered_range"))]
pub struct MetricsHistoryQuery {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

fn ordered_range(q: &MetricsHistoryQuery) -> Result<(), ValidationError> {
    match (q.start_date, q.end_date) {
        (Some(start), Some(end)) if start > end => {
            let mut err = ValidationError::new("date_range");
            err.message = Some("Start date cannot be after end date".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    Other,
    Undisclosed,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::NonBinary => "NON_BINARY",
            Gender::Other => "OTHER",
            Gender::Undisclosed => "UNDISCLOSED",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserProfileRequest {
    #[validate(custom(function = "past_date"))]
    pub birth_date: Option<Date>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub user_id: i64,
    pub birth_date: Option<Date>,
    pub gender: Option<String>,
}

impl From<UserProfile> for UserProfileResponse {
    fn from(p: UserProfile) -> Self {
        Self {
            user_id: p.user_id,
            birth_date: p.birth_date,
            gender: p.gender,
        }
    }
}

#[cfg(test)]
mod tests {
    use time::{macros::date, Duration};

    use super::*;
    use crate::error::AppError;
    use crate::validation::validate_payload;

    fn messages<T: Validate>(value: &T) -> Vec<String> {
        match validate_payload(value) {
            Ok(()) => Vec::new(),
            Err(AppError::Validation(v)) => v.into_iter().map(|f| f.message).collect(),
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn metrics_need_positive_height_and_weight() {
        let req: UserMetricsRequest =
            serde_json::from_str(r#"{"heightCm":0,"weightKg":-2,"age":0}"#).unwrap();
        assert_eq!(
            messages(&req),
            vec![
                "Age must be a positive number",
                "Height must be greater than zero",
                "Weight must be greater than zero",
            ]
        );

        let req: UserMetricsRequest = serde_json::from_str(
            r#"{"heightCm":172.5,"weightKg":68.2,"gender":"male","recordAt":"2024-05-01T07:00:00"}"#,
        )
        .unwrap();
        assert!(messages(&req).is_empty());
        assert!(req.record_at.is_some());
    }

    #[test]
    fn measurements_are_capped_at_column_size() {
        let req: UserMetricsRequest =
            serde_json::from_str(r#"{"heightCm":"100000000000000000000","weightKg":10000}"#).unwrap();
        assert_eq!(
            messages(&req),
            vec!["Height must not exceed 9999.99", "Weight must not exceed 9999.99"]
        );

        let req: UserMetricsRequest =
            serde_json::from_str(r#"{"heightCm":"9999.99","weightKg":"9999.99"}"#).unwrap();
        assert!(messages(&req).is_empty());

        let update: UpdateUserMetricsRequest = serde_json::from_str(r#"{"weightKg":12000}"#).unwrap();
        assert_eq!(messages(&update), vec!["Weight must not exceed 9999.99"]);
    }

    #[test]
    fn history_range_must_be_ordered() {
        let q = MetricsHistoryQuery {
            start_date: Some(date!(2024-05-02)),
            end_date: Some(date!(2024-05-01)),
        };
        assert_eq!(messages(&q), vec!["Start date cannot be after end date"]);

        let same_day = MetricsHistoryQuery {
            start_date: Some(date!(2024-05-01)),
            end_date: Some(date!(2024-05-01)),
        };
        assert!(messages(&same_day).is_empty());
        assert!(messages(&MetricsHistoryQuery::default()).is_empty());
    }

    #[test]
    fn gender_uses_screaming_snake_case() {
        let g: Gender = serde_json::from_str(r#""NON_BINARY""#).unwrap();
        assert_eq!(g, Gender::NonBinary);
        assert_eq!(g.as_str(), "NON_BINARY");
        assert!(serde_json::from_str::<Gender>(r#""unknown""#).is_err());
    }

    #[test]
    fn birth_date_must_be_in_the_past() {
        let today = OffsetDateTime::now_utc().date();
        let req = UpsertUserProfileRequest {
            birth_date: Some(today),
            gender: Some(Gender::Female),
        };
        assert_eq!(messages(&req), vec!["Birth date must be in the past"]);

        let req = UpsertUserProfileRequest {
            birth_date: Some(today - Duration::days(1)),
            gender: None,
        };
        assert!(messages(&req).is_empty());
    }
}
