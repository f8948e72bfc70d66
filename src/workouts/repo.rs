use anyhow::Context;
use sqlx::PgPool;
use time::Date;

use super::dto::WorkoutRequest;
use super::repo_types::Workout;
use crate::pagination::{Page, PageRequest};

const WORKOUT_COLUMNS: &str = "id, user_id, workout_type, workout_date, duration_minutes, \
     calories_burned, notes, created_at, updated_at";

pub const WORKOUT_SORTS: &[(&str, &str)] = &[
    ("workoutDate", "workout_date"),
    ("createdAt", "created_at"),
    ("durationMinutes", "duration_minutes"),
    ("caloriesBurned", "calories_burned"),
];

impl Workout {
    pub async fn insert(db: &PgPool, user_id: i64, req: &WorkoutRequest) -> anyhow::Result<Workout> {
        let row = sqlx::query_as::<_, Workout>(&format!(
            r#"
            INSERT INTO workouts (user_id, workout_type, workout_date, duration_minutes, calories_burned, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {WORKOUT_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(req.workout_type.trim())
        .bind(req.workout_date)
        .bind(req.duration_minutes)
        .bind(req.calories_burned)
        .bind(&req.notes)
        .fetch_one(db)
        .await
        .context("insert workout")?;
        Ok(row)
    }

    pub async fn find_owned(db: &PgPool, user_id: i64, id: i64) -> anyhow::Result<Option<Workout>> {
        let row = sqlx::query_as::<_, Workout>(&format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("find workout")?;
        Ok(row)
    }

    /// Replaces all editable fields; `None` when the workout is not the user's.
    pub async fn update_owned(
        db: &PgPool,
        user_id: i64,
        id: i64,
        req: &WorkoutRequest,
    ) -> anyhow::Result<Option<Workout>> {
        let row = sqlx::query_as::<_, Workout>(&format!(
            r#"
            UPDATE workouts
               SET workout_type = $3, workout_date = $4, duration_minutes = $5,
                   calories_burned = $6, notes = $7, updated_at = now()
             WHERE id = $1 AND user_id = $2
            RETURNING {WORKOUT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(user_id)
        .bind(req.workout_type.trim())
        .bind(req.workout_date)
        .bind(req.duration_minutes)
        .bind(req.calories_burned)
        .bind(&req.notes)
        .fetch_optional(db)
        .await
        .context("update workout")?;
        Ok(row)
    }

    pub async fn delete_owned(db: &PgPool, user_id: i64, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await
            .context("delete workout")?;
        Ok(res.rows_affected() > 0)
    }

    /// Pages the user's workouts, optionally restricted to one date.
    pub async fn list_page(
        db: &PgPool,
        user_id: i64,
        on: Option<Date>,
        req: &PageRequest,
    ) -> anyhow::Result<Page<Workout>> {
        let column = req.sort_column(WORKOUT_SORTS, "workout_date");
        let direction = req.direction().as_sql();

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM workouts WHERE user_id = $1 AND ($2::date IS NULL OR workout_date = $2)",
        )
        .bind(user_id)
        .bind(on)
        .fetch_one(db)
        .await
        .context("count workouts")?;

        let rows = sqlx::query_as::<_, Workout>(&format!(
            r#"
            SELECT {WORKOUT_COLUMNS}
              FROM workouts
             WHERE user_id = $1 AND ($2::date IS NULL OR workout_date = $2)
             ORDER BY {column} {direction} NULLS LAST, id {direction}
             LIMIT $3 OFFSET $4
            "#
        ))
        .bind(user_id)
        .bind(on)
        .bind(i64::from(req.size()))
        .bind(req.offset())
        .fetch_all(db)
        .await
        .context("list workouts")?;

        Ok(Page::new(rows, req.page().saturating_sub(1), req.size(), total.max(0) as u64))
    }

    /// Workouts dated within `start..=end`, oldest first.
    pub async fn list_between(db: &PgPool, user_id: i64, start: Date, end: Date) -> anyhow::Result<Vec<Workout>> {
        let rows = sqlx::query_as::<_, Workout>(&format!(
            r#"
            SELECT {WORKOUT_COLUMNS}
              FROM workouts
             WHERE user_id = $1 AND workout_date BETWEEN $2 AND $3
             ORDER BY workout_date ASC, id ASC
            "#
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await
        .context("list workouts in range")?;
        Ok(rows)
    }

    /// Distinct dates in `start..=end` with at least one workout.
    pub async fn active_days(db: &PgPool, user_id: i64, start: Date, end: Date) -> anyhow::Result<Vec<Date>> {
        let days = sqlx::query_scalar::<_, Date>(
            r#"
            SELECT DISTINCT workout_date
              FROM workouts
             WHERE user_id = $1 AND workout_date BETWEEN $2 AND $3
             ORDER BY workout_date DESC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await
        .context("list workout days")?;
        Ok(days)
    }
}
