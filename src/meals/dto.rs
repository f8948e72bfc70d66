use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};
use validator::{Validate, ValidationError};

use super::repo_types::Meal;
use crate::datetime::iso_local;
use crate::validation::{has_text, non_negative_decimal, not_blank, positive_decimal};

/// Request to estimate a meal from a photo and/or a description.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "image_or_description"))]
pub struct AiMealEstimationRequest {
    pub image_url: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "not_blank", message = "Meal type (role) is required"))]
    pub role: String,
    pub save: Option<bool>,
}

impl AiMealEstimationRequest {
    /// Saving is the default; only an explicit `false` opts out.
    pub fn should_save(&self) -> bool {
        self.save != Some(false)
    }

    pub fn has_valid_input(&self) -> bool {
        has_text(self.image_url.as_deref()) || has_text(self.description.as_deref())
    }
}

fn image_or_description(req: &AiMealEstimationRequest) -> Result<(), ValidationError> {
    if req.has_valid_input() {
        return Ok(());
    }
    let mut err = ValidationError::new("input_required");
    err.message = Some("Either imageUrl or description must be provided".into());
    Err(err)
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    #[validate(custom(function = "not_blank", message = "Meal description is required"))]
    pub meal_description: String,
    pub photo_url: Option<String>,
    #[validate(custom(function = "positive_decimal", message = "Total calories must be positive"))]
    pub total_calories: Decimal,
    #[validate(custom(function = "non_negative_decimal"))]
    pub protein_g: Decimal,
    #[validate(custom(function = "non_negative_decimal"))]
    pub carbs_g: Decimal,
    #[validate(custom(function = "non_negative_decimal"))]
    pub fat_g: Decimal,
    #[validate(custom(function = "not_blank", message = "Role is required"))]
    pub role: String,
    /// ISO local date-time; missing or unparseable values mean "now".
    pub meal_time: Option<String>,
    #[serde(default)]
    pub is_ai_generated: bool,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealRequest {
    pub meal_description: Option<String>,
    pub photo_url: Option<String>,
    #[validate(custom(function = "positive_decimal", message = "Total calories must be positive"))]
    pub total_calories: Option<Decimal>,
    #[validate(custom(function = "non_negative_decimal"))]
    pub protein_g: Option<Decimal>,
    #[validate(custom(function = "non_negative_decimal"))]
    pub carbs_g: Option<Decimal>,
    #[validate(custom(function = "non_negative_decimal"))]
    pub fat_g: Option<Decimal>,
    pub role: Option<String>,
    #[serde(default = "edited_by_default")]
    pub user_edited: bool,
}

fn edited_by_default() -> bool {
    true
}

impl UpdateMealRequest {
    pub fn apply(self, meal: &mut Meal) {
        if let Some(v) = self.meal_description {
            meal.meal_description = v;
        }
        if let Some(v) = self.photo_url {
            meal.photo_url = Some(v);
        }
        if let Some(v) = self.total_calories {
            meal.total_calories = v;
        }
        if let Some(v) = self.protein_g {
            meal.protein_g = v;
        }
        if let Some(v) = self.carbs_g {
            meal.carbs_g = v;
        }
        if let Some(v) = self.fat_g {
            meal.fat_g = v;
        }
        if let Some(v) = self.role {
            meal.role = v;
        }
        meal.user_edited = self.user_edited;
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDetailResponse {
    pub meal_id: i64,
    pub meal_description: String,
    pub photo_url: Option<String>,
    pub total_calories: Decimal,
    pub protein_g: Decimal,
    pub carbs_g: Decimal,
    pub fat_g: Decimal,
    pub role: String,
    #[serde(with = "iso_local")]
    pub meal_time: PrimitiveDateTime,
    pub is_ai_generated: bool,
    pub user_edited: bool,
}

impl From<Meal> for MealDetailResponse {
    fn from(m: Meal) -> Self {
        Self {
            meal_id: m.id,
            meal_description: m.meal_description,
            photo_url: m.photo_url,
            total_calories: m.total_calories,
            protein_g: m.protein_g,
            carbs_g: m.carbs_g,
            fat_g: m.fat_g,
            role: m.role,
            meal_time: m.meal_time,
            is_ai_generated: m.is_ai_generated,
            user_edited: m.user_edited,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub date: Option<Date>,
}

/// What was eaten on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Intake {
    pub meal_count: usize,
    pub calories: Decimal,
    pub protein_g: Decimal,
    pub carbs_g: Decimal,
    pub fat_g: Decimal,
}

/// Daily goals, in kcal and grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Targets {
    pub calories: i64,
    pub protein_g: i64,
    pub carbs_g: i64,
    pub fat_g: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummaryResponse {
    pub date: Date,
    pub current_intake: Intake,
    pub daily_targets: Targets,
}
