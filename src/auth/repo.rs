use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use super::current_user::UserLookup;
use super::repo_types::{PasswordResetToken, User, VerificationToken};

const USER_COLUMNS: &str =
    "id, uuid, email, user_name, password_hash, email_verified, created_at, updated_at";

impl User {
    /// Find a user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    pub async fn find_by_uuid(db: &PgPool, uuid: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE uuid = $1"
        ))
        .bind(uuid)
        .fetch_optional(db)
        .await
        .context("find user by uuid")?;
        Ok(user)
    }

    /// Create an unverified user with a fresh public UUID.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        email: &str,
        user_name: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (uuid, email, user_name, password_hash, email_verified)
            VALUES ($1, $2, $3, $4, FALSE)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(user_name)
        .bind(password_hash)
        .fetch_one(&mut **tx)
        .await
        .context("insert user")?;
        Ok(user)
    }

    pub async fn mark_verified(tx: &mut Transaction<'_, Postgres>, id: i64) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET email_verified = TRUE, updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .context("mark user verified")?;
        Ok(())
    }

    pub async fn update_password(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
        password_hash: &str,
    ) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&mut **tx)
            .await
            .context("update password")?;
        Ok(())
    }
}

impl VerificationToken {
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        user_id: i64,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO verification_tokens (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&mut **tx)
            .await
            .context("insert verification token")?;
        Ok(())
    }

    pub async fn find_by_token(db: &PgPool, token: &str) -> anyhow::Result<Option<VerificationToken>> {
        let row = sqlx::query_as::<_, VerificationToken>(
            r#"
            SELECT id, token, user_id, expires_at, verified_at, created_at
              FROM verification_tokens
             WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(db)
        .await
        .context("find verification token")?;
        Ok(row)
    }

    pub async fn mark_verified(tx: &mut Transaction<'_, Postgres>, id: i64) -> anyhow::Result<()> {
        sqlx::query("UPDATE verification_tokens SET verified_at = now() WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .context("mark token verified")?;
        Ok(())
    }

    /// Drop tokens of the user that were never used.
    pub async fn delete_pending(tx: &mut Transaction<'_, Postgres>, user_id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM verification_tokens WHERE user_id = $1 AND verified_at IS NULL")
            .bind(user_id)
            .execute(&mut **tx)
            .await
            .context("delete pending verification tokens")?;
        Ok(())
    }
}

impl PasswordResetToken {
    pub async fn insert(
        tx: &mut Transaction<'_, Postgres>,
        user_id: i64,
        token: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO password_reset_tokens (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&mut **tx)
            .await
            .context("insert password reset token")?;
        Ok(())
    }

    pub async fn find_by_token(db: &PgPool, token: &str) -> anyhow::Result<Option<PasswordResetToken>> {
        let row = sqlx::query_as::<_, PasswordResetToken>(
            r#"
            SELECT id, token, user_id, expires_at, used_at, created_at
              FROM password_reset_tokens
             WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(db)
        .await
        .context("find password reset token")?;
        Ok(row)
    }

    pub async fn delete_for_user(tx: &mut Transaction<'_, Postgres>, user_id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await
            .context("delete password reset tokens")?;
        Ok(())
    }

    pub async fn mark_used(tx: &mut Transaction<'_, Postgres>, id: i64) -> anyhow::Result<()> {
        sqlx::query("UPDATE password_reset_tokens SET used_at = now() WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .context("mark reset token used")?;
        Ok(())
    }
}

/// [`UserLookup`] backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserLookup for PgUserStore {
    async fn find_by_uuid(&self, uuid: Uuid) -> anyhow::Result<Option<User>> {
        User::find_by_uuid(&self.db, uuid).await
    }
}
