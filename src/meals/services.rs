use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use time::{Date, Duration, PrimitiveDateTime, Time};
use tracing::{debug, info, instrument, warn};

use super::dto::{CreateMealRequest, DailySummaryResponse, Intake, Targets};
use super::repo_types::{Meal, NewMeal};
use crate::auth::repo_types::User;
use crate::datetime::{now_local, parse_local};
use crate::profile::repo_types::UserMetrics;
use crate::state::AppState;

/// Used when the user has no BMR on record.
pub const DEFAULT_TARGETS: Targets = Targets {
    calories: 2200,
    protein_g: 140,
    carbs_g: 275,
    fat_g: 73,
};

/// Missing or unparseable meal times fall back to `now`.
pub fn resolve_meal_time(raw: Option<&str>, now: PrimitiveDateTime) -> PrimitiveDateTime {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => now,
        Some(text) => parse_local(text).unwrap_or_else(|| {
            warn!(meal_time = %text, "unparseable meal time, using now");
            now
        }),
    }
}

pub fn new_meal(req: CreateMealRequest, now: PrimitiveDateTime) -> NewMeal {
    let meal_time = resolve_meal_time(req.meal_time.as_deref(), now);
    NewMeal {
        meal_description: req.meal_description,
        photo_url: req.photo_url,
        total_calories: req.total_calories,
        protein_g: req.protein_g,
        carbs_g: req.carbs_g,
        fat_g: req.fat_g,
        role: req.role,
        meal_time,
        is_ai_generated: req.is_ai_generated,
    }
}

pub fn summarize(meals: &[Meal]) -> Intake {
    meals.iter().fold(
        Intake {
            meal_count: 0,
            calories: Decimal::ZERO,
            protein_g: Decimal::ZERO,
            carbs_g: Decimal::ZERO,
            fat_g: Decimal::ZERO,
        },
        |mut acc, m| {
            acc.meal_count += 1;
            acc.calories += m.total_calories;
            acc.protein_g += m.protein_g;
            acc.carbs_g += m.carbs_g;
            acc.fat_g += m.fat_g;
            acc
        },
    )
}

fn whole(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}

/// Splits a BMR into 30% protein, 40% carbs, 30% fat (4/4/9 kcal per gram).
pub fn targets_from_bmr(bmr: Option<Decimal>) -> Targets {
    let Some(bmr) = bmr else {
        return DEFAULT_TARGETS;
    };
    let ratio = |pct: i64, kcal_per_g: i64| whole(bmr * Decimal::new(pct, 2) / Decimal::from(kcal_per_g));
    Targets {
        calories: whole(bmr),
        protein_g: ratio(30, 4),
        carbs_g: ratio(40, 4),
        fat_g: ratio(30, 9),
    }
}

pub fn day_bounds(date: Date) -> (PrimitiveDateTime, PrimitiveDateTime) {
    let start = PrimitiveDateTime::new(date, Time::MIDNIGHT);
    (start, start + Duration::days(1))
}

#[instrument(skip(state, user, req), fields(user_id = user.id))]
pub async fn create_meal(state: &AppState, user: &User, req: CreateMealRequest) -> anyhow::Result<Meal> {
    let new = new_meal(req, now_local());
    let meal = Meal::insert(&state.db, user.id, &new).await?;
    info!(meal_id = meal.id, "meal created");
    Ok(meal)
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn daily_summary(
    state: &AppState,
    user: &User,
    date: Option<Date>,
) -> anyhow::Result<DailySummaryResponse> {
    let date = date.unwrap_or_else(|| now_local().date());
    let (start, end) = day_bounds(date);
    let meals = Meal::list_between(&state.db, user.id, start, end).await?;
    let latest = UserMetrics::latest(&state.db, user.id).await?;
    debug!(meals = meals.len(), "daily summary");
    Ok(DailySummaryResponse {
        date,
        current_intake: summarize(&meals),
        daily_targets: targets_from_bmr(latest.and_then(|m| m.bmr)),
    })
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};
    use time::OffsetDateTime;

    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn meal(cal: &str, p: &str, c: &str, f: &str) -> Meal {
        let now = OffsetDateTime::now_utc();
        Meal {
            id: 1,
            user_id: 1,
            meal_description: "Oats".into(),
            photo_url: None,
            total_calories: dec(cal),
            protein_g: dec(p),
            carbs_g: dec(c),
            fat_g: dec(f),
            role: "breakfast".into(),
            meal_time: datetime!(2024-05-01 08:00:00),
            is_ai_generated: false,
            user_edited: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn meal_time_falls_back_to_now() {
        let now = datetime!(2024-05-01 12:00:00);
        assert_eq!(resolve_meal_time(None, now), now);
        assert_eq!(resolve_meal_time(Some("  "), now), now);
        assert_eq!(resolve_meal_time(Some("not a date"), now), now);
        assert_eq!(
            resolve_meal_time(Some("2024-04-30T19:15:00"), now),
            datetime!(2024-04-30 19:15:00)
        );
    }

    #[test]
    fn summary_adds_exact_decimals() {
        let intake = summarize(&[meal("350.10", "12.2", "40", "9.9"), meal("99.90", "0.1", "5.5", "0.1")]);
        assert_eq!(intake.meal_count, 2);
        assert_eq!(intake.calories, dec("450.00"));
        assert_eq!(intake.protein_g, dec("12.3"));
        assert_eq!(intake.fat_g, dec("10.0"));

        let empty = summarize(&[]);
        assert_eq!(empty.meal_count, 0);
        assert_eq!(empty.calories, Decimal::ZERO);
    }

    #[test]
    fn targets_follow_bmr_or_defaults() {
        assert_eq!(targets_from_bmr(None), DEFAULT_TARGETS);
        let t = targets_from_bmr(Some(dec("1800.00")));
        assert_eq!(
            t,
            Targets {
                calories: 1800,
                protein_g: 135,
                carbs_g: 180,
                fat_g: 60,
            }
        );
    }

    #[test]
    fn day_bounds_cover_one_day() {
        let (start, end) = day_bounds(date!(2024-02-28));
        assert_eq!(start, datetime!(2024-02-28 00:00:00));
        assert_eq!(end, datetime!(2024-02-29 00:00:00));
    }
}
