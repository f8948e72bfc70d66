use rust_decimal::Decimal;
use sqlx::FromRow;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// One body measurement; `bmi` and `bmr` are derived on every write.
#[derive(Debug, Clone, FromRow)]
pub struct UserMetrics {
    pub id: i64,
    pub user_id: i64,
    pub height_cm: Decimal,
    pub weight_kg: Decimal,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub bmi: Option<Decimal>,
    pub bmr: Option<Decimal>,
    pub user_goal: Option<String>,
    pub record_at: PrimitiveDateTime,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: i64,
    pub birth_date: Option<Date>,
    pub gender: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUserMetrics {
    pub height_cm: Decimal,
    pub weight_kg: Decimal,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub bmi: Option<Decimal>,
    pub bmr: Option<Decimal>,
    pub user_goal: Option<String>,
    pub record_at: PrimitiveDateTime,
}
