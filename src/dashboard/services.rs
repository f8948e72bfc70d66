use std::collections::{BTreeMap, BTreeSet, HashMap};

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use time::{
    format_description::FormatItem, macros::format_description, Date, Duration, PrimitiveDateTime, Time,
};
use tracing::{debug, instrument};

use super::dto::{
    BodyMetrics, DailyAverages, DailyNutrition, DailyProgressPoint, DailyWorkout, ExportMetadata,
    ExportResponse, Macros, NutritionSummaryExport, ProgressMetricsExport, QuickStatsResponse, Streaks,
    TodayMeal, UserProfileExport, WeightProgress, WorkoutFrequency, WorkoutHistoryExport,
};
use crate::auth::repo_types::User;
use crate::datetime::now_local;
use crate::error::{AppError, AppResult};
use crate::meals::repo_types::Meal;
use crate::profile::metrics::{bmi, bmr, normalize_gender};
use crate::profile::repo_types::{UserMetrics, UserProfile};
use crate::state::AppState;
use crate::workouts::repo_types::Workout;

const HALF_UP: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

const DAY_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");
const CLOCK_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]");

/// Streaks stop counting after a year.
pub const MAX_STREAK: u32 = 365;

/// Longest explicit `dateRange`, in days.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Moderate activity factor; the daily calorie target is BMR times this.
const ACTIVITY_FACTOR: Decimal = Decimal::from_parts(14, 0, 0, false, 1);

const DEFAULT_RANGE: &str = "30d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Weekly,
    Monthly,
}

impl Period {
    /// Missing means weekly; matching ignores case.
    pub fn parse(raw: Option<&str>) -> AppResult<Period> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(Period::Weekly),
            Some(p) if p.eq_ignore_ascii_case("weekly") => Ok(Period::Weekly),
            Some(p) if p.eq_ignore_ascii_case("monthly") => Ok(Period::Monthly),
            Some(_) => Err(AppError::BadRequest(
                "Period must be either 'weekly' or 'monthly'".into(),
            )),
        }
    }

    pub fn days(self) -> i64 {
        match self {
            Period::Weekly => 7,
            Period::Monthly => 30,
        }
    }
}

fn invalid_range() -> AppError {
    AppError::BadRequest(
        "dateRange must be one of 7d, 30d, 90d, 365d or YYYY-MM-DD,YYYY-MM-DD".into(),
    )
}

/// Calendar days `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Date,
    pub end: Date,
}

impl DateWindow {
    /// The `days` days that end with `today`.
    pub fn last_days(today: Date, days: i64) -> Self {
        Self {
            start: today.saturating_sub(Duration::days(days.max(1) - 1)),
            end: today,
        }
    }

    pub fn parse(raw: Option<&str>, today: Date) -> AppResult<Self> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_RANGE);
        let days = match raw.to_ascii_lowercase().as_str() {
            "7d" | "week" => Some(7),
            "30d" | "month" => Some(30),
            "90d" | "3months" => Some(90),
            "365d" | "year" => Some(365),
            _ => None,
        };
        if let Some(days) = days {
            return Ok(Self::last_days(today, days));
        }

        let (start, end) = raw
            .split_once(',')
            .and_then(|(a, b)| {
                let start = Date::parse(a.trim(), DAY_FORMAT).ok()?;
                let end = Date::parse(b.trim(), DAY_FORMAT).ok()?;
                Some((start, end))
            })
            .filter(|(_, end)| end.next_day().is_some())
            .ok_or_else(invalid_range)?;
        if start > end {
            return Err(AppError::BadRequest(
                "dateRange start must not be after its end".into(),
            ));
        }
        let window = Self { start, end };
        if window.days() > MAX_RANGE_DAYS {
            return Err(AppError::BadRequest(format!(
                "dateRange cannot span more than {MAX_RANGE_DAYS} days"
            )));
        }
        Ok(window)
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).whole_days() + 1
    }

    pub fn contains(&self, day: Date) -> bool {
        self.start <= day && day <= self.end
    }

    pub fn dates(&self) -> impl Iterator<Item = Date> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |d| d.next_day().filter(|next| *next <= end))
    }

    /// Half-open local bounds, for `meal_time` queries.
    pub fn bounds(&self) -> (PrimitiveDateTime, PrimitiveDateTime) {
        let after = self.end.next_day().unwrap_or(self.end);
        (
            PrimitiveDateTime::new(self.start, Time::MIDNIGHT),
            PrimitiveDateTime::new(after, Time::MIDNIGHT),
        )
    }

    pub fn label(&self) -> String {
        format!("{} to {}", self.start, self.end)
    }
}

/// Only `json` is produced; missing means `json`.
pub fn export_format(raw: Option<&str>) -> AppResult<String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok("json".into()),
        Some(f) if f.eq_ignore_ascii_case("json") => Ok("json".into()),
        Some(_) => Err(AppError::BadRequest(
            "Only the json export format is supported".into(),
        )),
    }
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, HALF_UP)
}

fn whole(value: Decimal) -> i64 {
    value.round_dp_with_strategy(0, HALF_UP).to_i64().unwrap_or_default()
}

fn mean(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

fn percent(part: usize, of: i64) -> Decimal {
    if of <= 0 {
        return Decimal::ZERO;
    }
    round2(Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(of))
}

fn totals<'a>(meals: impl IntoIterator<Item = &'a Meal>) -> (Decimal, Macros) {
    meals.into_iter().fold((Decimal::ZERO, Macros::default()), |(calories, m), meal| {
        (
            calories + meal.total_calories,
            Macros {
                protein: m.protein + meal.protein_g,
                carbs: m.carbs + meal.carbs_g,
                fats: m.fats + meal.fat_g,
            },
        )
    })
}

fn meals_by_day(meals: &[Meal]) -> BTreeMap<Date, Vec<&Meal>> {
    let mut days: BTreeMap<Date, Vec<&Meal>> = BTreeMap::new();
    for meal in meals {
        days.entry(meal.meal_time.date()).or_default().push(meal);
    }
    days
}

fn type_counts<'a>(workouts: impl IntoIterator<Item = &'a Workout>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for w in workouts {
        *counts.entry(w.workout_type.clone()).or_default() += 1;
    }
    counts
}

/// Intake averages are per day with at least one meal; workout averages
/// skip workouts without a duration or calorie figure.
pub fn daily_averages(window: &DateWindow, meals: &[Meal], workouts: &[Workout]) -> DailyAverages {
    let meals: Vec<&Meal> = meals
        .iter()
        .filter(|m| window.contains(m.meal_time.date()))
        .collect();
    let logged_days = meals.iter().map(|m| m.meal_time.date()).collect::<BTreeSet<_>>().len();
    let (calories, macros) = totals(meals.iter().copied());

    let workouts: Vec<&Workout> = workouts
        .iter()
        .filter(|w| w.workout_date.is_some_and(|d| window.contains(d)))
        .collect();
    let durations: Vec<i64> = workouts
        .iter()
        .filter_map(|w| w.duration_minutes.map(i64::from))
        .collect();
    let burned: Vec<Decimal> = workouts.iter().filter_map(|w| w.calories_burned).collect();
    let total_duration: i64 = durations.iter().sum();
    let total_burned: Decimal = burned.iter().copied().sum();

    DailyAverages {
        avg_calories_intake: whole(mean(calories, logged_days)),
        avg_macros: Macros {
            protein: round2(mean(macros.protein, logged_days)),
            carbs: round2(mean(macros.carbs, logged_days)),
            fats: round2(mean(macros.fats, logged_days)),
        },
        avg_workout_duration: whole(mean(Decimal::from(total_duration), durations.len())),
        avg_calories_burned: whole(mean(total_burned, burned.len())),
        period_days: window.days(),
        total_calories_intake: whole(calories),
        total_workout_duration: total_duration,
        total_calories_burned: whole(total_burned),
        workout_count: workouts.len(),
    }
}

pub fn workout_frequency(window: &DateWindow, workouts: &[Workout]) -> WorkoutFrequency {
    let in_window: Vec<&Workout> = workouts
        .iter()
        .filter(|w| w.workout_date.is_some_and(|d| window.contains(d)))
        .collect();
    let workout_days = in_window
        .iter()
        .filter_map(|w| w.workout_date)
        .collect::<BTreeSet<_>>()
        .len();
    WorkoutFrequency {
        workout_days,
        total_days: window.days(),
        frequency_percentage: percent(workout_days, window.days()),
        workout_types: type_counts(in_window.iter().copied()),
        total_workouts: in_window.len(),
    }
}

pub fn streak_status(streak: u32) -> &'static str {
    match streak {
        0 => "none",
        1..=2 => "building",
        3..=6 => "good",
        7..=13 => "great",
        _ => "excellent",
    }
}

/// Consecutive days ending with `today` on which `hit` holds.
pub fn streak_length(today: Date, mut hit: impl FnMut(Date) -> bool) -> u32 {
    let mut streak = 0;
    let mut day = today;
    while streak < MAX_STREAK && hit(day) {
        streak += 1;
        match day.previous_day() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

/// BMR times the activity factor; `None` without a usable BMR.
pub fn calorie_target(bmr: Option<Decimal>) -> Option<Decimal> {
    bmr.filter(|b| *b > Decimal::ZERO).map(|b| b * ACTIVITY_FACTOR)
}

/// Within 80% to 120% of the target.
pub fn on_target(calories: Decimal, target: Decimal) -> bool {
    calories >= target * Decimal::new(8, 1) && calories <= target * Decimal::new(12, 1)
}

pub fn streaks(
    today: Date,
    workout_days: &BTreeSet<Date>,
    calories_by_day: &HashMap<Date, Decimal>,
    target: Option<Decimal>,
) -> Streaks {
    let workout_streak = streak_length(today, |d| workout_days.contains(&d));
    let nutrition_streak = match target {
        Some(target) => streak_length(today, |d| {
            calories_by_day.get(&d).is_some_and(|c| on_target(*c, target))
        }),
        None => 0,
    };
    Streaks {
        workout_streak,
        nutrition_streak,
        consistency_streak: workout_streak.min(nutrition_streak),
        workout_streak_status: streak_status(workout_streak),
        nutrition_streak_status: streak_status(nutrition_streak),
    }
}

/// Completed years between `birth` and `today`.
pub fn age_on(birth: Date, today: Date) -> i32 {
    let mut age = today.year() - birth.year();
    if (u8::from(today.month()), today.day()) < (u8::from(birth.month()), birth.day()) {
        age -= 1;
    }
    age
}

/// Profile values win over the ones recorded with the metrics entry.
pub fn age_and_gender(
    latest: Option<&UserMetrics>,
    profile: Option<&UserProfile>,
    today: Date,
) -> (Option<i32>, Option<String>) {
    let age = profile
        .and_then(|p| p.birth_date)
        .map(|b| age_on(b, today))
        .or_else(|| latest.and_then(|m| m.age));
    let gender = normalize_gender(profile.and_then(|p| p.gender.as_deref()))
        .or_else(|| latest.and_then(|m| m.gender.clone()));
    (age, gender)
}

pub fn weight_trend(change: Decimal) -> &'static str {
    if change > Decimal::ZERO {
        "up"
    } else if change < Decimal::ZERO {
        "down"
    } else {
        "stable"
    }
}

/// `recent` is newest first; the first two entries give the weight change.
pub fn body_metrics(recent: &[UserMetrics], profile: Option<&UserProfile>, today: Date) -> BodyMetrics {
    let Some(latest) = recent.first() else {
        return BodyMetrics::empty();
    };
    let (age, gender) = age_and_gender(Some(latest), profile, today);
    let (weight, height) = (Some(latest.weight_kg), Some(latest.height_cm));
    let (weight_change, weight_trend) = match recent.get(1) {
        Some(previous) => {
            let change = round2(latest.weight_kg - previous.weight_kg);
            (change, weight_trend(change))
        }
        None => (Decimal::ZERO, "stable"),
    };
    BodyMetrics {
        weight: latest.weight_kg,
        height: latest.height_cm,
        bmi: bmi(weight, height).unwrap_or_default(),
        bmr: bmr(weight, height, age, gender.as_deref()).unwrap_or_default(),
        weight_change,
        weight_trend,
        last_updated: Some(latest.record_at),
    }
}

/// One point per day; `metrics` must be oldest first.
pub fn progress_points(
    window: &DateWindow,
    meals: &[Meal],
    workouts: &[Workout],
    metrics: &[UserMetrics],
) -> Vec<DailyProgressPoint> {
    let mut calories: HashMap<Date, Decimal> = HashMap::new();
    for meal in meals {
        *calories.entry(meal.meal_time.date()).or_default() += meal.total_calories;
    }
    let mut sessions: HashMap<Date, usize> = HashMap::new();
    for day in workouts.iter().filter_map(|w| w.workout_date) {
        *sessions.entry(day).or_default() += 1;
    }

    let mut pending = metrics.iter().peekable();
    let mut weight: Option<Decimal> = None;
    window
        .dates()
        .map(|date| {
            while let Some(m) = pending.next_if(|m| m.record_at.date() <= date) {
                weight = Some(m.weight_kg);
            }
            DailyProgressPoint {
                date,
                weight: weight
                    .map(|w| w.round_dp_with_strategy(1, HALF_UP))
                    .unwrap_or_default(),
                calories: whole(calories.get(&date).copied().unwrap_or_default()),
                workouts: sessions.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

pub fn meal_type_for_hour(hour: u8) -> &'static str {
    match hour {
        0..=10 => "breakfast",
        11..=15 => "lunch",
        16..=17 => "snack",
        _ => "dinner",
    }
}

pub fn today_meal(meal: Meal) -> TodayMeal {
    let time = meal.meal_time.format(CLOCK_FORMAT).unwrap_or_default();
    let kind = if meal.role.trim().is_empty() {
        meal_type_for_hour(meal.meal_time.hour()).to_string()
    } else {
        meal.role
    };
    TodayMeal {
        id: meal.id,
        name: meal.meal_description,
        calories: whole(meal.total_calories),
        protein: meal.protein_g,
        carbs: meal.carbs_g,
        fat: meal.fat_g,
        time,
        kind,
    }
}

pub fn nutrition_goal_status(progress: Decimal) -> &'static str {
    if progress >= Decimal::from(90) && progress <= Decimal::from(110) {
        "On Track"
    } else if progress < Decimal::from(80) {
        "Under Target"
    } else if progress > Decimal::from(120) {
        "Over Target"
    } else {
        "Close to Target"
    }
}

pub fn consistency_rating(frequency: Decimal) -> &'static str {
    if frequency >= Decimal::from(80) {
        "Excellent"
    } else if frequency >= Decimal::from(60) {
        "Good"
    } else if frequency >= Decimal::from(40) {
        "Fair"
    } else {
        "Needs Improvement"
    }
}

/// Averages are per calendar day of the window, logged or not.
pub fn nutrition_summary(window: &DateWindow, meals: &[Meal], target: Option<Decimal>) -> NutritionSummaryExport {
    let days = Decimal::from(window.days());
    let by_day = meals_by_day(meals);
    let daily_breakdown = window
        .dates()
        .map(|date| {
            let day = by_day.get(&date).map(Vec::as_slice).unwrap_or(&[]);
            let (daily_calories, daily_macros) = totals(day.iter().copied());
            DailyNutrition {
                date,
                daily_calories,
                daily_macros,
                meals_count: day.len(),
            }
        })
        .collect();

    let (total, macros) = totals(meals);
    let progress = target.map(|t| round2(total * Decimal::ONE_HUNDRED / (days * t)));

    NutritionSummaryExport {
        date_range: window.label(),
        total_calories_consumed: total,
        avg_daily_calories: round2(total / days),
        total_macros: macros,
        avg_daily_macros: Macros {
            protein: round2(macros.protein / days),
            carbs: round2(macros.carbs / days),
            fats: round2(macros.fats / days),
        },
        total_meals: meals.len(),
        avg_meals_per_day: round2(Decimal::from(meals.len()) / days),
        daily_breakdown,
        calorie_target_progress: progress,
        nutrition_goal_status: progress.map(nutrition_goal_status).unwrap_or("No Target"),
    }
}

/// Workouts without a duration or calorie figure count as zero here.
pub fn workout_history(window: &DateWindow, workouts: &[Workout]) -> WorkoutHistoryExport {
    let mut by_day: BTreeMap<Date, Vec<&Workout>> = BTreeMap::new();
    for w in workouts {
        if let Some(day) = w.workout_date {
            by_day.entry(day).or_default().push(w);
        }
    }
    let burned = |ws: &[&Workout]| -> Decimal { ws.iter().filter_map(|w| w.calories_burned).sum() };
    let minutes = |ws: &[&Workout]| -> i64 { ws.iter().filter_map(|w| w.duration_minutes).map(i64::from).sum() };

    let daily_breakdown = window
        .dates()
        .map(|date| {
            let day = by_day.get(&date).map(Vec::as_slice).unwrap_or(&[]);
            let mut workout_types: Vec<String> = Vec::new();
            for w in day {
                if !workout_types.contains(&w.workout_type) {
                    workout_types.push(w.workout_type.clone());
                }
            }
            DailyWorkout {
                date,
                workouts_count: day.len(),
                total_duration: minutes(day),
                total_calories_burned: burned(day),
                workout_types,
            }
        })
        .collect();

    let all: Vec<&Workout> = workouts.iter().collect();
    let total_burned = burned(&all);
    let total_minutes = minutes(&all);
    let frequency = percent(by_day.len(), window.days());

    WorkoutHistoryExport {
        date_range: window.label(),
        total_workouts: workouts.len(),
        total_workout_days: by_day.len(),
        total_calories_burned: total_burned,
        total_duration_minutes: total_minutes,
        avg_workout_duration: round2(mean(Decimal::from(total_minutes), workouts.len())),
        avg_calories_burned_per_workout: round2(mean(total_burned, workouts.len())),
        workout_type_distribution: type_counts(workouts),
        daily_breakdown,
        consistency_rating: consistency_rating(frequency),
        weekly_frequency_percentage: frequency,
    }
}

/// Starts from the last weight known on the window's first day, or the first
/// one recorded inside it. `metrics` must be oldest first.
pub fn weight_progress(window: &DateWindow, metrics: &[UserMetrics]) -> WeightProgress {
    let known: Vec<&UserMetrics> = metrics
        .iter()
        .filter(|m| m.record_at.date() <= window.end)
        .collect();
    let start = known
        .iter()
        .rev()
        .find(|m| m.record_at.date() <= window.start)
        .or_else(|| known.iter().find(|m| window.contains(m.record_at.date())))
        .map(|m| m.weight_kg);
    let current = known.last().map(|m| m.weight_kg);
    match (start, current) {
        (Some(start), Some(current)) => {
            let change = round2(current - start);
            WeightProgress {
                start_weight: Some(start),
                current_weight: Some(current),
                weight_change: change,
                trend: weight_trend(change),
            }
        }
        _ => WeightProgress {
            start_weight: None,
            current_weight: None,
            weight_change: Decimal::ZERO,
            trend: "no_data",
        },
    }
}

async fn load_body(state: &AppState, user_id: i64) -> anyhow::Result<(Vec<UserMetrics>, Option<UserProfile>)> {
    let recent = UserMetrics::recent(&state.db, user_id, 2).await?;
    let profile = UserProfile::find(&state.db, user_id).await?;
    Ok((recent, profile))
}

async fn load_streaks(
    state: &AppState,
    user_id: i64,
    today: Date,
    target: Option<Decimal>,
) -> anyhow::Result<Streaks> {
    let year = DateWindow::last_days(today, i64::from(MAX_STREAK));
    let workout_days: BTreeSet<Date> = Workout::active_days(&state.db, user_id, year.start, year.end)
        .await?
        .into_iter()
        .collect();
    let calories: HashMap<Date, Decimal> = match target {
        Some(_) => {
            let (start, end) = year.bounds();
            Meal::calories_by_day(&state.db, user_id, start, end)
                .await?
                .into_iter()
                .collect()
        }
        None => HashMap::new(),
    };
    Ok(streaks(today, &workout_days, &calories, target))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn quick_stats(state: &AppState, user: &User, period: Period) -> anyhow::Result<QuickStatsResponse> {
    let today = now_local().date();
    let (recent, profile) = load_body(state, user.id).await?;
    let body = body_metrics(&recent, profile.as_ref(), today);

    let month = DateWindow::last_days(today, 30);
    let (start, end) = month.bounds();
    let meals = Meal::list_between(&state.db, user.id, start, end).await?;
    let workouts = Workout::list_between(&state.db, user.id, month.start, month.end).await?;
    let streaks = load_streaks(state, user.id, today, calorie_target(Some(body.bmr))).await?;
    debug!(meals = meals.len(), workouts = workouts.len(), "quick stats");

    Ok(QuickStatsResponse {
        weekly_averages: daily_averages(&DateWindow::last_days(today, 7), &meals, &workouts),
        monthly_averages: daily_averages(&month, &meals, &workouts),
        workout_frequency: workout_frequency(&DateWindow::last_days(today, period.days()), &workouts),
        body_metrics: body,
        streaks,
    })
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn daily_progress(
    state: &AppState,
    user: &User,
    window: DateWindow,
) -> anyhow::Result<Vec<DailyProgressPoint>> {
    let (start, end) = window.bounds();
    let meals = Meal::list_between(&state.db, user.id, start, end).await?;
    let workouts = Workout::list_between(&state.db, user.id, window.start, window.end).await?;
    let metrics = UserMetrics::list_before(&state.db, user.id, end).await?;
    Ok(progress_points(&window, &meals, &workouts, &metrics))
}

#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn today_meals(state: &AppState, user: &User) -> anyhow::Result<Vec<TodayMeal>> {
    let (start, end) = DateWindow::last_days(now_local().date(), 1).bounds();
    let meals = Meal::list_between(&state.db, user.id, start, end).await?;
    Ok(meals.into_iter().map(today_meal).collect())
}

#[instrument(skip(state, user, format, range_label), fields(user_id = user.id))]
pub async fn export(
    state: &AppState,
    user: &User,
    window: DateWindow,
    format: String,
    range_label: String,
) -> anyhow::Result<ExportResponse> {
    let today = now_local().date();
    let (recent, profile) = load_body(state, user.id).await?;
    let body = body_metrics(&recent, profile.as_ref(), today);
    let target = calorie_target(Some(body.bmr));

    let (start, end) = window.bounds();
    let meals = Meal::list_between(&state.db, user.id, start, end).await?;
    let workouts = Workout::list_between(&state.db, user.id, window.start, window.end).await?;
    let metrics = UserMetrics::list_before(&state.db, user.id, end).await?;
    let streaks = load_streaks(state, user.id, today, target).await?;

    let (age, gender) = age_and_gender(recent.first(), profile.as_ref(), today);
    let recorded = metrics
        .iter()
        .filter(|m| window.contains(m.record_at.date()))
        .count();
    let total_data_points = meals.len() + workouts.len() + recorded;
    debug!(total_data_points, "export assembled");

    Ok(ExportResponse {
        user_profile: UserProfileExport {
            user_id: user.id,
            username: user.user_name.clone(),
            email: user.email.clone(),
            current_weight: body.weight,
            current_height: body.height,
            current_bmi: body.bmi,
            current_bmr: body.bmr,
            age,
            gender,
            activity_level: recent.first().and_then(|m| m.user_goal.clone()),
            profile_last_updated: body.last_updated,
        },
        nutrition_summary: nutrition_summary(&window, &meals, target),
        exercise_history: workout_history(&window, &workouts),
        progress_metrics: ProgressMetricsExport {
            date_range: window.label(),
            weight_progress: weight_progress(&window, &metrics),
            streaks,
        },
        metadata: ExportMetadata {
            export_format: format,
            date_range: range_label,
            export_timestamp: today,
            total_data_points,
        },
    })
}
