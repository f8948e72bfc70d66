use anyhow::Context;
use time::{Duration, OffsetDateTime};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::dto::{
    AuthResponse, EmailVerificationResponse, LoginRequest, PasswordResetResponse, RegisterRequest,
};
use super::jwt::JwtKeys;
use super::password::{hash_password, verify_password};
use super::repo_types::{PasswordResetToken, User, VerificationToken};
use crate::state::AppState;

pub const VERIFICATION_TOKEN_TTL: Duration = Duration::hours(24);
pub const RESET_TOKEN_TTL: Duration = Duration::hours(1);

const RESET_REQUESTED: &str =
    "If an account exists with this email, a password reset link has been sent.";
const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationCheck {
    AlreadyVerified,
    Expired,
    Valid,
}

/// A token that was already used wins over expiry.
pub fn check_verification(token: &VerificationToken, now: OffsetDateTime) -> VerificationCheck {
    if token.is_verified() {
        VerificationCheck::AlreadyVerified
    } else if token.is_expired(now) {
        VerificationCheck::Expired
    } else {
        VerificationCheck::Valid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetCheck {
    Expired,
    Used,
    Valid,
}

/// Expiry is reported before reuse.
pub fn check_reset(token: &PasswordResetToken, now: OffsetDateTime) -> ResetCheck {
    if token.is_expired(now) {
        ResetCheck::Expired
    } else if token.is_used() {
        ResetCheck::Used
    } else {
        ResetCheck::Valid
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn new_token() -> String {
    Uuid::new_v4().to_string()
}

fn issue(keys: &JwtKeys, message: &str, user: &User) -> anyhow::Result<AuthResponse> {
    let token = keys.sign(user.uuid).context("sign jwt")?;
    Ok(AuthResponse::success(message, token, keys.expires_in_secs(), user))
}

#[instrument(skip(state, keys, req), fields(email = %req.email))]
pub async fn register(
    state: &AppState,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> anyhow::Result<AuthResponse> {
    let email = normalize_email(&req.email);
    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!("email already registered");
        return Ok(AuthResponse::failure("Email already exists"));
    }

    let hash = hash_password(&req.password)?;
    let token = new_token();

    let mut tx = state.db.begin().await.context("begin tx")?;
    let user = User::create(&mut tx, &email, req.user_name.trim(), &hash).await?;
    VerificationToken::insert(
        &mut tx,
        user.id,
        &token,
        OffsetDateTime::now_utc() + VERIFICATION_TOKEN_TTL,
    )
    .await?;
    tx.commit().await.context("commit registration")?;
    info!(user_uuid = %user.uuid, "user registered");

    if !state
        .mailer
        .send_verification_email(&user.email, &user.user_name, &token)
        .await
    {
        // registration stands; the user can ask for a new email
        error!(user_uuid = %user.uuid, "verification email not sent");
    }

    issue(keys, "Registration successful", &user)
}

#[instrument(skip(state, keys, req), fields(email = %req.email))]
pub async fn login(
    state: &AppState,
    keys: &JwtKeys,
    req: LoginRequest,
) -> anyhow::Result<AuthResponse> {
    let email = normalize_email(&req.email);
    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!("login for unknown email");
        return Ok(AuthResponse::failure(INVALID_CREDENTIALS));
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_uuid = %user.uuid, "login with wrong password");
        return Ok(AuthResponse::failure(INVALID_CREDENTIALS));
    }

    info!(user_uuid = %user.uuid, email_verified = user.email_verified, "user logged in");
    issue(keys, "Login successful", &user)
}

#[instrument(skip_all)]
pub async fn verify_email(state: &AppState, token: &str) -> anyhow::Result<EmailVerificationResponse> {
    let Some(record) = VerificationToken::find_by_token(&state.db, token).await? else {
        warn!("unknown verification token");
        return Ok(EmailVerificationResponse::new(false, "Invalid verification token", false));
    };

    match check_verification(&record, OffsetDateTime::now_utc()) {
        VerificationCheck::AlreadyVerified => {
            Ok(EmailVerificationResponse::new(false, "Email already verified", true))
        }
        VerificationCheck::Expired => {
            warn!(user_id = record.user_id, "verification token expired");
            Ok(EmailVerificationResponse::new(
                false,
                "Verification token has expired. Please request a new one.",
                false,
            ))
        }
        VerificationCheck::Valid => {
            let mut tx = state.db.begin().await.context("begin tx")?;
            User::mark_verified(&mut tx, record.user_id).await?;
            VerificationToken::mark_verified(&mut tx, record.id).await?;
            tx.commit().await.context("commit verification")?;
            info!(user_id = record.user_id, "email verified");
            Ok(EmailVerificationResponse::new(true, "Email verified successfully", true))
        }
    }
}

#[instrument(skip(state))]
pub async fn resend_verification(
    state: &AppState,
    email: &str,
) -> anyhow::Result<EmailVerificationResponse> {
    let email = normalize_email(email);
    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!("resend for unknown email");
        return Ok(EmailVerificationResponse::new(false, "User not found", false));
    };
    if user.email_verified {
        return Ok(EmailVerificationResponse::new(false, "Email already verified", true));
    }

    let token = new_token();
    let mut tx = state.db.begin().await.context("begin tx")?;
    VerificationToken::delete_pending(&mut tx, user.id).await?;
    VerificationToken::insert(
        &mut tx,
        user.id,
        &token,
        OffsetDateTime::now_utc() + VERIFICATION_TOKEN_TTL,
    )
    .await?;
    tx.commit().await.context("commit verification token")?;
    debug!(user_uuid = %user.uuid, "new verification token stored");

    if !state
        .mailer
        .send_verification_email(&user.email, &user.user_name, &token)
        .await
    {
        return Ok(EmailVerificationResponse::new(
            false,
            "Failed to send verification email. Please try again later.",
            false,
        ));
    }
    Ok(EmailVerificationResponse::new(true, "Verification email sent successfully", false))
}

/// Unknown addresses get the same answer as known ones.
#[instrument(skip(state))]
pub async fn forgot_password(state: &AppState, email: &str) -> anyhow::Result<PasswordResetResponse> {
    let email = normalize_email(email);
    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!("password reset for unknown email");
        return Ok(PasswordResetResponse::new(true, RESET_REQUESTED));
    };

    let token = new_token();
    let mut tx = state.db.begin().await.context("begin tx")?;
    PasswordResetToken::delete_for_user(&mut tx, user.id).await?;
    PasswordResetToken::insert(
        &mut tx,
        user.id,
        &token,
        OffsetDateTime::now_utc() + RESET_TOKEN_TTL,
    )
    .await?;
    tx.commit().await.context("commit reset token")?;

    if !state
        .mailer
        .send_password_reset_email(&user.email, &user.user_name, &token)
        .await
    {
        return Ok(PasswordResetResponse::new(
            false,
            "Failed to send password reset email. Please try again later.",
        ));
    }
    info!(user_uuid = %user.uuid, "password reset email sent");
    Ok(PasswordResetResponse::new(true, RESET_REQUESTED))
}

#[instrument(skip_all)]
pub async fn reset_password(
    state: &AppState,
    token: &str,
    new_password: &str,
) -> anyhow::Result<PasswordResetResponse> {
    let Some(record) = PasswordResetToken::find_by_token(&state.db, token).await? else {
        warn!("unknown password reset token");
        return Ok(PasswordResetResponse::new(false, "Invalid or expired password reset token."));
    };

    match check_reset(&record, OffsetDateTime::now_utc()) {
        ResetCheck::Expired => Ok(PasswordResetResponse::new(
            false,
            "Password reset token has expired. Please request a new one.",
        )),
        ResetCheck::Used => Ok(PasswordResetResponse::new(
            false,
            "This password reset token has already been used.",
        )),
        ResetCheck::Valid => {
            let hash = hash_password(new_password)?;
            let mut tx = state.db.begin().await.context("begin tx")?;
            User::update_password(&mut tx, record.user_id, &hash).await?;
            PasswordResetToken::mark_used(&mut tx, record.id).await?;
            tx.commit().await.context("commit password reset")?;
            info!(user_id = record.user_id, "password reset");
            Ok(PasswordResetResponse::new(
                true,
                "Password has been reset successfully. You can now login with your new password.",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verification(expires_in: Duration, verified: bool) -> VerificationToken {
        let now = OffsetDateTime::now_utc();
        VerificationToken {
            id: 1,
            token: new_token(),
            user_id: 7,
            expires_at: now + expires_in,
            verified_at: verified.then_some(now),
            created_at: now,
        }
    }

    fn reset(expires_in: Duration, used: bool) -> PasswordResetToken {
        let now = OffsetDateTime::now_utc();
        PasswordResetToken {
            id: 1,
            token: new_token(),
            user_id: 7,
            expires_at: now + expires_in,
            used_at: used.then_some(now),
            created_at: now,
        }
    }

    #[test]
    fn verification_token_states() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(check_verification(&verification(Duration::hours(1), false), now), VerificationCheck::Valid);
        assert_eq!(check_verification(&verification(-Duration::hours(1), false), now), VerificationCheck::Expired);
        // a verified token is reported as such even after expiry
        assert_eq!(
            check_verification(&verification(-Duration::hours(1), true), now),
            VerificationCheck::AlreadyVerified
        );
    }

    #[test]
    fn reset_token_states() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(check_reset(&reset(Duration::minutes(30), false), now), ResetCheck::Valid);
        assert_eq!(check_reset(&reset(Duration::minutes(30), true), now), ResetCheck::Used);
        assert_eq!(check_reset(&reset(-Duration::minutes(1), true), now), ResetCheck::Expired);
    }

    #[test]
    fn token_lifetimes() {
        assert_eq!(VERIFICATION_TOKEN_TTL.whole_hours(), 24);
        assert_eq!(RESET_TOKEN_TTL.whole_hours(), 1);
    }

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn tokens_are_uuid_strings() {
        let token = new_token();
        assert!(Uuid::parse_str(&token).is_ok());
        assert_ne!(token, new_token());
    }
}
