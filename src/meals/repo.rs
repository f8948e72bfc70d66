use anyhow::Context;
use rust_decimal::Decimal;
use sqlx::PgPool;
use time::{Date, PrimitiveDateTime};

use super::repo_types::{Meal, NewMeal};
use crate::pagination::{Page, PageRequest};

const MEAL_COLUMNS: &str = "id, user_id, meal_description, photo_url, total_calories, protein_g, \
     carbs_g, fat_g, role, meal_time, is_ai_generated, user_edited, created_at, updated_at";

/// `sortBy` values accepted by the meal list.
pub const MEAL_SORTS: &[(&str, &str)] = &[
    ("mealTime", "meal_time"),
    ("createdAt", "created_at"),
    ("totalCalories", "total_calories"),
];

impl Meal {
    pub async fn insert(db: &PgPool, user_id: i64, new: &NewMeal) -> anyhow::Result<Meal> {
        let meal = sqlx::query_as::<_, Meal>(&format!(
            r#"
            INSERT INTO meals (user_id, meal_description, photo_url, total_calories, protein_g,
                               carbs_g, fat_g, role, meal_time, is_ai_generated, user_edited)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, FALSE)
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&new.meal_description)
        .bind(&new.photo_url)
        .bind(new.total_calories)
        .bind(new.protein_g)
        .bind(new.carbs_g)
        .bind(new.fat_g)
        .bind(&new.role)
        .bind(new.meal_time)
        .bind(new.is_ai_generated)
        .fetch_one(db)
        .await
        .context("insert meal")?;
        Ok(meal)
    }

    /// Only returns the meal when it belongs to `user_id`.
    pub async fn find_owned(db: &PgPool, user_id: i64, id: i64) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(&format!(
            "SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("find meal")?;
        Ok(meal)
    }

    /// Writes back every editable column of an already loaded meal.
    pub async fn save(db: &PgPool, meal: &Meal) -> anyhow::Result<Meal> {
        let saved = sqlx::query_as::<_, Meal>(&format!(
            r#"
            UPDATE meals
               SET meal_description = $3, photo_url = $4, total_calories = $5, protein_g = $6,
                   carbs_g = $7, fat_g = $8, role = $9, user_edited = $10, updated_at = now()
             WHERE id = $1 AND user_id = $2
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(meal.id)
        .bind(meal.user_id)
        .bind(&meal.meal_description)
        .bind(&meal.photo_url)
        .bind(meal.total_calories)
        .bind(meal.protein_g)
        .bind(meal.carbs_g)
        .bind(meal.fat_g)
        .bind(&meal.role)
        .bind(meal.user_edited)
        .fetch_one(db)
        .await
        .context("update meal")?;
        Ok(saved)
    }

    /// Returns false when nothing owned by the user matched.
    pub async fn delete_owned(db: &PgPool, user_id: i64, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM meals WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await
            .context("delete meal")?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn list_page(db: &PgPool, user_id: i64, req: &PageRequest) -> anyhow::Result<Page<Meal>> {
        let column = req.sort_column(MEAL_SORTS, "meal_time");
        let direction = req.direction().as_sql();

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meals WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(db)
            .await
            .context("count meals")?;

        let rows = sqlx::query_as::<_, Meal>(&format!(
            r#"
            SELECT {MEAL_COLUMNS}
              FROM meals
             WHERE user_id = $1
             ORDER BY {column} {direction}, id {direction}
             LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(i64::from(req.size()))
        .bind(req.offset())
        .fetch_all(db)
        .await
        .context("list meals")?;

        Ok(Page::new(rows, req.page().saturating_sub(1), req.size(), total.max(0) as u64))
    }

    /// Meals with `meal_time` in `[start, end)`, earliest first.
    pub async fn list_between(
        db: &PgPool,
        user_id: i64,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(&format!(
            r#"
            SELECT {MEAL_COLUMNS}
              FROM meals
             WHERE user_id = $1 AND meal_time >= $2 AND meal_time < $3
             ORDER BY meal_time ASC
            "#
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await
        .context("list meals of day")?;
        Ok(rows)
    }

    /// Calories eaten per calendar day with meals in `[start, end)`.
    pub async fn calories_by_day(
        db: &PgPool,
        user_id: i64,
        start: PrimitiveDateTime,
        end: PrimitiveDateTime,
    ) -> anyhow::Result<Vec<(Date, Decimal)>> {
        let rows = sqlx::query_as::<_, (Date, Decimal)>(
            r#"
            SELECT meal_time::date AS day, SUM(total_calories) AS calories
              FROM meals
             WHERE user_id = $1 AND meal_time >= $2 AND meal_time < $3
             GROUP BY day
             ORDER BY day DESC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await
        .context("sum meal calories by day")?;
        Ok(rows)
    }
}
