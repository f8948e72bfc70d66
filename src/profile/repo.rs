use anyhow::Context;
use sqlx::PgPool;
use time::{OffsetDateTime, PrimitiveDateTime};

use super::repo_types::{NewUserMetrics, UserMetrics, UserProfile};
use crate::pagination::{Page, PageRequest};

const METRICS_COLUMNS: &str = "id, user_id, height_cm, weight_kg, age, gender, bmi, bmr, \
     user_goal, record_at, created_at, updated_at";

const PROFILE_COLUMNS: &str = "id, user_id, birth_date, gender, created_at, updated_at";

pub const METRICS_SORTS: &[(&str, &str)] = &[
    ("recordAt", "record_at"),
    ("createdAt", "created_at"),
    ("weightKg", "weight_kg"),
    ("bmi", "bmi"),
];

impl UserMetrics {
    pub async fn insert(db: &PgPool, user_id: i64, new: &NewUserMetrics) -> anyhow::Result<UserMetrics> {
        let row = sqlx::query_as::<_, UserMetrics>(&format!(
            r#"
            INSERT INTO user_metrics (user_id, height_cm, weight_kg, age, gender, bmi, bmr, user_goal, record_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {METRICS_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(new.height_cm)
        .bind(new.weight_kg)
        .bind(new.age)
        .bind(&new.gender)
        .bind(new.bmi)
        .bind(new.bmr)
        .bind(&new.user_goal)
        .bind(new.record_at)
        .fetch_one(db)
        .await
        .context("insert user metrics")?;
        Ok(row)
    }

    pub async fn find_owned(db: &PgPool, user_id: i64, id: i64) -> anyhow::Result<Option<UserMetrics>> {
        let row = sqlx::query_as::<_, UserMetrics>(&format!(
            "SELECT {METRICS_COLUMNS} FROM user_metrics WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("find user metrics")?;
        Ok(row)
    }

    /// Most recent entry by `record_at`, ties broken by insertion order.
    pub async fn latest(db: &PgPool, user_id: i64) -> anyhow::Result<Option<UserMetrics>> {
        let row = sqlx::query_as::<_, UserMetrics>(&format!(
            r#"
            SELECT {METRICS_COLUMNS}
              FROM user_metrics
             WHERE user_id = $1
             ORDER BY record_at DESC, id DESC
             LIMIT 1
            "#
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("latest user metrics")?;
        Ok(row)
    }

    /// Up to `limit` entries, newest first.
    pub async fn recent(db: &PgPool, user_id: i64, limit: i64) -> anyhow::Result<Vec<UserMetrics>> {
        let rows = sqlx::query_as::<_, UserMetrics>(&format!(
            r#"
            SELECT {METRICS_COLUMNS}
              FROM user_metrics
             WHERE user_id = $1
             ORDER BY record_at DESC, id DESC
             LIMIT $2
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(db)
        .await
        .context("recent user metrics")?;
        Ok(rows)
    }

    /// Entries recorded before `until`, oldest first.
    pub async fn list_before(db: &PgPool, user_id: i64, until: PrimitiveDateTime) -> anyhow::Result<Vec<UserMetrics>> {
        let rows = sqlx::query_as::<_, UserMetrics>(&format!(
            r#"
            SELECT {METRICS_COLUMNS}
              FROM user_metrics
             WHERE user_id = $1 AND record_at < $2
             ORDER BY record_at ASC, id ASC
            "#
        ))
        .bind(user_id)
        .bind(until)
        .fetch_all(db)
        .await
        .context("list user metrics before")?;
        Ok(rows)
    }

    pub async fn save(db: &PgPool, m: &UserMetrics) -> anyhow::Result<UserMetrics> {
        let row = sqlx::query_as::<_, UserMetrics>(&format!(
            r#"
            UPDATE user_metrics
               SET height_cm = $3, weight_kg = $4, age = $5, gender = $6, bmi = $7, bmr = $8,
                   user_goal = $9, record_at = $10, updated_at = now()
             WHERE id = $1 AND user_id = $2
            RETURNING {METRICS_COLUMNS}
            "#
        ))
        .bind(m.id)
        .bind(m.user_id)
        .bind(m.height_cm)
        .bind(m.weight_kg)
        .bind(m.age)
        .bind(&m.gender)
        .bind(m.bmi)
        .bind(m.bmr)
        .bind(&m.user_goal)
        .bind(m.record_at)
        .fetch_one(db)
        .await
        .context("update user metrics")?;
        Ok(row)
    }

    /// Pages entries created in `[from, until)`; a missing bound is open.
    pub async fn history_page(
        db: &PgPool,
        user_id: i64,
        from: Option<OffsetDateTime>,
        until: Option<OffsetDateTime>,
        req: &PageRequest,
    ) -> anyhow::Result<Page<UserMetrics>> {
        let column = req.sort_column(METRICS_SORTS, "created_at");
        let direction = req.direction().as_sql();
        let filter = "user_id = $1 \
             AND ($2::timestamptz IS NULL OR created_at >= $2) \
             AND ($3::timestamptz IS NULL OR created_at < $3)";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM user_metrics WHERE {filter}"))
            .bind(user_id)
            .bind(from)
            .bind(until)
            .fetch_one(db)
            .await
            .context("count user metrics")?;

        let rows = sqlx::query_as::<_, UserMetrics>(&format!(
            r#"
            SELECT {METRICS_COLUMNS}
              FROM user_metrics
             WHERE {filter}
             ORDER BY {column} {direction} NULLS LAST, id {direction}
             LIMIT $4 OFFSET $5
            "#
        ))
        .bind(user_id)
        .bind(from)
        .bind(until)
        .bind(i64::from(req.size()))
        .bind(req.offset())
        .fetch_all(db)
        .await
        .context("list user metrics")?;

        Ok(Page::new(rows, req.page().saturating_sub(1), req.size(), total.max(0) as u64))
    }
}

impl UserProfile {
    pub async fn find(db: &PgPool, user_id: i64) -> anyhow::Result<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM user_profile WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("find user profile")?;
        Ok(row)
    }

    /// Creates the profile on first write; later writes replace both fields.
    pub async fn upsert(
        db: &PgPool,
        user_id: i64,
        birth_date: Option<time::Date>,
        gender: Option<&str>,
    ) -> anyhow::Result<UserProfile> {
        let row = sqlx::query_as::<_, UserProfile>(&format!(
            r#"
            INSERT INTO user_profile (user_id, birth_date, gender)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
               SET birth_date = EXCLUDED.birth_date, gender = EXCLUDED.gender, updated_at = now()
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(birth_date)
        .bind(gender)
        .fetch_one(db)
        .await
        .context("upsert user profile")?;
        Ok(row)
    }
}
