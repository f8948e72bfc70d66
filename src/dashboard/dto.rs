use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, PrimitiveDateTime};

use crate::datetime::iso_local;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuickStatsQuery {
    pub period: Option<String>,
}

/// `dateRange` is `7d`, `30d`, `90d`, `365d` (or `week`, `month`,
/// `3months`, `year`) or an explicit `YYYY-MM-DD,YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub date_range: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportQuery {
    pub format: Option<String>,
    pub date_range: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Macros {
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fats: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyMetrics {
    pub weight: Decimal,
    pub height: Decimal,
    pub bmi: Decimal,
    pub bmr: Decimal,
    pub weight_change: Decimal,
    pub weight_trend: &'static str,
    #[serde(with = "iso_local::option")]
    pub last_updated: Option<PrimitiveDateTime>,
}

impl BodyMetrics {
    pub fn empty() -> Self {
        Self {
            weight: Decimal::ZERO,
            height: Decimal::ZERO,
            bmi: Decimal::ZERO,
            bmr: Decimal::ZERO,
            weight_change: Decimal::ZERO,
            weight_trend: "no_data",
            last_updated: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAverages {
    pub avg_calories_intake: i64,
    pub avg_macros: Macros,
    pub avg_workout_duration: i64,
    pub avg_calories_burned: i64,
    pub period_days: i64,
    pub total_calories_intake: i64,
    pub total_workout_duration: i64,
    pub total_calories_burned: i64,
    pub workout_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutFrequency {
    pub workout_days: usize,
    pub total_days: i64,
    pub frequency_percentage: Decimal,
    pub workout_types: BTreeMap<String, usize>,
    pub total_workouts: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Streaks {
    pub workout_streak: u32,
    pub nutrition_streak: u32,
    pub consistency_streak: u32,
    pub workout_streak_status: &'static str,
    pub nutrition_streak_status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStatsResponse {
    pub body_metrics: BodyMetrics,
    pub weekly_averages: DailyAverages,
    pub monthly_averages: DailyAverages,
    pub workout_frequency: WorkoutFrequency,
    pub streaks: Streaks,
}

/// One day of the progress chart; `weight` carries the last known value forward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyProgressPoint {
    pub date: Date,
    pub weight: Decimal,
    pub calories: i64,
    pub workouts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TodayMeal {
    pub id: i64,
    pub name: String,
    pub calories: i64,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
    /// `HH:mm`
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileExport {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub current_weight: Decimal,
    pub current_height: Decimal,
    #[serde(rename = "currentBMI")]
    pub current_bmi: Decimal,
    #[serde(rename = "currentBMR")]
    pub current_bmr: Decimal,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub activity_level: Option<String>,
    #[serde(with = "iso_local::option")]
    pub profile_last_updated: Option<PrimitiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyNutrition {
    pub date: Date,
    pub daily_calories: Decimal,
    pub daily_macros: Macros,
    pub meals_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummaryExport {
    pub date_range: String,
    pub total_calories_consumed: Decimal,
    pub avg_daily_calories: Decimal,
    pub total_macros: Macros,
    pub avg_daily_macros: Macros,
    pub total_meals: usize,
    pub avg_meals_per_day: Decimal,
    pub daily_breakdown: Vec<DailyNutrition>,
    /// Percent of the BMR-based calorie target; absent without a BMR.
    pub calorie_target_progress: Option<Decimal>,
    pub nutrition_goal_status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWorkout {
    pub date: Date,
    pub workouts_count: usize,
    pub total_duration: i64,
    pub total_calories_burned: Decimal,
    pub workout_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutHistoryExport {
    pub date_range: String,
    pub total_workouts: usize,
    pub total_workout_days: usize,
    pub total_calories_burned: Decimal,
    pub total_duration_minutes: i64,
    pub avg_workout_duration: Decimal,
    pub avg_calories_burned_per_workout: Decimal,
    pub workout_type_distribution: BTreeMap<String, usize>,
    pub daily_breakdown: Vec<DailyWorkout>,
    pub consistency_rating: &'static str,
    pub weekly_frequency_percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightProgress {
    pub start_weight: Option<Decimal>,
    pub current_weight: Option<Decimal>,
    pub weight_change: Decimal,
    pub trend: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressMetricsExport {
    pub date_range: String,
    pub weight_progress: WeightProgress,
    pub streaks: Streaks,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub export_format: String,
    pub date_range: String,
    pub export_timestamp: Date,
    pub total_data_points: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub user_profile: UserProfileExport,
    pub nutrition_summary: NutritionSummaryExport,
    pub exercise_history: WorkoutHistoryExport,
    pub progress_metrics: ProgressMetricsExport,
    pub metadata: ExportMetadata,
}
