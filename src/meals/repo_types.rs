use rust_decimal::Decimal;
use sqlx::FromRow;
use time::{OffsetDateTime, PrimitiveDateTime};

/// A logged meal. Quantities are stored as NUMERIC.
#[derive(Debug, Clone, FromRow)]
pub struct Meal {
    pub id: i64,
    pub user_id: i64,
    pub meal_description: String,
    pub photo_url: Option<String>,
    pub total_calories: Decimal,
    pub protein_g: Decimal,
    pub carbs_g: Decimal,
    pub fat_g: Decimal,
    pub role: String,
    pub meal_time: PrimitiveDateTime,
    pub is_ai_generated: bool,
    pub user_edited: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Values of a meal about to be inserted.
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub meal_description: String,
    pub photo_url: Option<String>,
    pub total_calories: Decimal,
    pub protein_g: Decimal,
    pub carbs_g: Decimal,
    pub fat_g: Decimal,
    pub role: String,
    pub meal_time: PrimitiveDateTime,
    pub is_ai_generated: bool,
}
