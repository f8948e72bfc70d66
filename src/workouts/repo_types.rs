use rust_decimal::Decimal;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

#[derive(Debug, Clone, FromRow)]
pub struct Workout {
    pub id: i64,
    pub user_id: i64,
    pub workout_type: String,
    pub workout_date: Option<Date>,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
