use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::repo_types::User;
use crate::validation::not_blank;

/// Request body for user registration.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "not_blank"))]
    pub user_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EmailVerificationRequest {
    #[validate(custom(function = "not_blank"))]
    pub token: String,
}

/// Body of both resend-verification and forgot-password.
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(custom(function = "not_blank"))]
    pub token: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub uuid: Uuid,
    pub email: String,
    pub user_name: String,
    pub email_verified: bool,
}

impl From<&User> for UserResponse {
    fn from(u: &User) -> Self {
        Self {
            uuid: u.uuid,
            email: u.email.clone(),
            user_name: u.user_name.clone(),
            email_verified: u.email_verified,
        }
    }
}

/// Response returned after login or register.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

impl AuthResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            token: None,
            token_type: None,
            expires_in: None,
            user: None,
        }
    }

    pub fn success(message: impl Into<String>, token: String, expires_in: u64, user: &User) -> Self {
        Self {
            success: true,
            message: message.into(),
            token: Some(token),
            token_type: Some("Bearer"),
            expires_in: Some(expires_in),
            user: Some(user.into()),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmailVerificationResponse {
    pub success: bool,
    pub message: String,
    pub email_verified: bool,
}

impl EmailVerificationResponse {
    pub fn new(success: bool, message: impl Into<String>, email_verified: bool) -> Self {
        Self {
            success,
            message: message.into(),
            email_verified,
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PasswordResetResponse {
    pub success: bool,
    pub message: String,
}

impl PasswordResetResponse {
    pub fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_payload;

    #[test]
    fn register_request_checks_email_and_password() {
        let bad: RegisterRequest = serde_json::from_str(
            r#"{"email":"not-an-email","userName":"Sam","password":"short"}"#,
        )
        .unwrap();
        let Err(crate::error::AppError::Validation(v)) = validate_payload(&bad) else {
            panic!("expected validation failure");
        };
        let fields: Vec<_> = v.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "password"]);

        let good: RegisterRequest = serde_json::from_str(
            r#"{"email":"sam@example.com","userName":"Sam","password":"longenough"}"#,
        )
        .unwrap();
        assert!(validate_payload(&good).is_ok());
    }

    #[test]
    fn failed_auth_response_omits_token_fields() {
        let json = serde_json::to_value(AuthResponse::failure("Invalid email or password")).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("token").is_none());
        assert!(json.get("user").is_none());
    }

    #[test]
    fn user_response_is_camel_case() {
        let user = crate::auth::current_user::fakes::user("sam@example.com");
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();
        assert_eq!(json["emailVerified"], false);
        assert_eq!(json["userName"], "Test User");
    }
}
