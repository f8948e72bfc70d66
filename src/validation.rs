//! Request validation run at the HTTP boundary, right after deserialization.
//!
//! DTOs derive [`validator::Validate`]; [`validate_payload`] flattens the
//! nested `ValidationErrors` tree into an ordered list of field violations.

use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, OffsetDateTime};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    match payload.validate() {
        Ok(()) => Ok(()),
        Err(errors) => Err(AppError::Validation(violations(&errors))),
    }
}

/// Flattens validator output into `(field, message)` pairs sorted by field.
pub fn violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    collect("", errors, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

fn collect(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    out.push(FieldViolation {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => collect(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    collect(&format!("{path}[{idx}]"), inner, out);
                }
            }
        }
    }
}

fn violation(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(violation("blank", "must not be blank"));
    }
    Ok(())
}

pub fn positive_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        return Err(violation("positive", "must be greater than zero"));
    }
    Ok(())
}

pub fn non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(violation("non_negative", "must not be negative"));
    }
    Ok(())
}

pub fn past_date(value: &Date) -> Result<(), ValidationError> {
    if *value >= OffsetDateTime::now_utc().date() {
        return Err(violation("past", "Birth date must be in the past"));
    }
    Ok(())
}

pub(crate) fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accepts either a single string or an array of strings and yields a list.
pub fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<OneOrMany>::deserialize(deserializer)?;
    Ok(match value {
        None => Vec::new(),
        Some(OneOrMany::One(v)) => vec![v],
        Some(OneOrMany::Many(vs)) => vs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[derive(Debug, Validate)]
    struct Sample {
        #[validate(custom(function = "not_blank"))]
        name: String,
        #[validate(range(min = 1, max = 100, message = "Page size cannot exceed 100"))]
        size: u32,
    }

    #[test]
    fn collects_violations_sorted_by_field() {
        let sample = Sample {
            name: "   ".into(),
            size: 500,
        };
        let err = sample.validate().unwrap_err();
        let list = violations(&err);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].field, "name");
        assert_eq!(list[0].message, "must not be blank");
        assert_eq!(list[1].field, "size");
        assert_eq!(list[1].message, "Page size cannot exceed 100");
    }

    #[test]
    fn validate_payload_wraps_into_app_error() {
        let sample = Sample {
            name: "ok".into(),
            size: 0,
        };
        match validate_payload(&sample) {
            Err(AppError::Validation(v)) => assert_eq!(v[0].field, "size"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn decimal_checks() {
        assert!(positive_decimal(&dec("0.01")).is_ok());
        assert!(positive_decimal(&Decimal::ZERO).is_err());
        assert!(non_negative_decimal(&Decimal::ZERO).is_ok());
        assert!(non_negative_decimal(&dec("-1.5")).is_err());
    }

    #[test]
    fn past_date_rejects_today() {
        let today = OffsetDateTime::now_utc().date();
        assert!(past_date(&today).is_err());
        assert!(past_date(&today.previous_day().unwrap()).is_ok());
    }

    #[derive(Deserialize)]
    struct Prefs {
        #[serde(default, deserialize_with = "one_or_many")]
        equipment: Vec<String>,
    }

    #[test]
    fn one_or_many_accepts_both_shapes() {
        let single: Prefs = serde_json::from_str(r#"{"equipment":"dumbbells"}"#).unwrap();
        assert_eq!(single.equipment, vec!["dumbbells"]);

        let many: Prefs = serde_json::from_str(r#"{"equipment":["mat","bands"]}"#).unwrap();
        assert_eq!(many.equipment, vec!["mat", "bands"]);

        let null: Prefs = serde_json::from_str(r#"{"equipment":null}"#).unwrap();
        assert!(null.equipment.is_empty());

        let absent: Prefs = serde_json::from_str("{}").unwrap();
        assert!(absent.equipment.is_empty());
    }
}
