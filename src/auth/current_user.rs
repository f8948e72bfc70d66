//! Resolves the authenticated caller to a [`User`] record.
//!
//! The authentication state is passed in explicitly: the HTTP layer builds one
//! [`Authentication`] per request (see [`super::extractors`]) and every
//! resolver call reads it again together with the user store. Nothing is
//! cached between calls.

use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::User;

/// Principal name the framework uses for unauthenticated callers.
pub const ANONYMOUS_PRINCIPAL: &str = "anonymousUser";

/// Authentication state of a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    /// No usable credentials were presented.
    Anonymous,
    /// Credentials carrying a principal name; for bearer tokens the JWT subject.
    Token { principal: String, authenticated: bool },
}

/// Lookup of user records by their public UUID.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn find_by_uuid(&self, uuid: Uuid) -> anyhow::Result<Option<User>>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthStateError {
    #[error("Invalid authenticated user identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Authenticated user not found: {0}")]
    UserMissing(Uuid),

    #[error("No authenticated user found")]
    NoAuthenticatedUser,

    #[error("user lookup failed: {0}")]
    Lookup(#[source] anyhow::Error),
}

pub fn is_authenticated(auth: Option<&Authentication>) -> bool {
    current_username(auth).is_some()
}

pub fn current_username(auth: Option<&Authentication>) -> Option<&str> {
    match auth? {
        Authentication::Anonymous => None,
        Authentication::Token {
            authenticated: false,
            ..
        } => None,
        Authentication::Token { principal, .. } if principal == ANONYMOUS_PRINCIPAL => None,
        Authentication::Token { principal, .. } => Some(principal.as_str()),
    }
}

/// `Ok(None)` when nobody is authenticated; an error when the principal is not a UUID.
pub fn current_user_id(auth: Option<&Authentication>) -> Result<Option<Uuid>, AuthStateError> {
    current_username(auth)
        .map(|name| Uuid::parse_str(name).map_err(|_| AuthStateError::InvalidIdentifier(name.to_string())))
        .transpose()
}

pub async fn current_user(
    auth: Option<&Authentication>,
    users: &dyn UserLookup,
) -> Result<Option<User>, AuthStateError> {
    let Some(uuid) = current_user_id(auth)? else {
        return Ok(None);
    };
    match users.find_by_uuid(uuid).await.map_err(AuthStateError::Lookup)? {
        Some(user) => Ok(Some(user)),
        None => Err(AuthStateError::UserMissing(uuid)),
    }
}

pub async fn current_user_or_err(
    auth: Option<&Authentication>,
    users: &dyn UserLookup,
) -> Result<User, AuthStateError> {
    current_user(auth, users)
        .await?
        .ok_or(AuthStateError::NoAuthenticatedUser)
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use time::OffsetDateTime;

    use super::*;

    /// In-memory user store counting how often it is queried.
    #[derive(Default)]
    pub struct FakeUsers {
        pub users: HashMap<Uuid, User>,
        pub calls: AtomicUsize,
    }

    impl FakeUsers {
        pub fn with(user: User) -> Self {
            let mut users = HashMap::new();
            users.insert(user.uuid, user);
            Self {
                users,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl UserLookup for FakeUsers {
        async fn find_by_uuid(&self, uuid: Uuid) -> anyhow::Result<Option<User>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.users.get(&uuid).cloned())
        }
    }

    pub fn user(email: &str) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: 1,
            uuid: Uuid::new_v4(),
            email: email.into(),
            user_name: "Test User".into(),
            password_hash: String::new(),
            email_verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::fakes::{user, FakeUsers};
    use super::*;

    fn token(principal: &str) -> Authentication {
        Authentication::Token {
            principal: principal.into(),
            authenticated: true,
        }
    }

    #[test]
    fn unauthenticated_states_yield_no_username() {
        assert_eq!(current_username(None), None);
        assert_eq!(current_username(Some(&Authentication::Anonymous)), None);
        assert_eq!(current_username(Some(&token(ANONYMOUS_PRINCIPAL))), None);
        let flagged = Authentication::Token {
            principal: Uuid::new_v4().to_string(),
            authenticated: false,
        };
        assert_eq!(current_username(Some(&flagged)), None);
        assert!(!is_authenticated(Some(&flagged)));
    }

    #[tokio::test]
    async fn anonymous_marker_is_absence_not_error() {
        let users = FakeUsers::default();
        let resolved = current_user(Some(&token(ANONYMOUS_PRINCIPAL)), &users).await;
        assert!(matches!(resolved, Ok(None)));
        assert_eq!(users.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_uuid_username_is_invalid_state() {
        let users = FakeUsers::default();
        let resolved = current_user(Some(&token("alice@example.com")), &users).await;
        assert!(matches!(resolved, Err(AuthStateError::InvalidIdentifier(ref s)) if s == "alice@example.com"));
    }

    #[tokio::test]
    async fn missing_record_is_invalid_state() {
        let users = FakeUsers::default();
        let uuid = Uuid::new_v4();
        let resolved = current_user(Some(&token(&uuid.to_string())), &users).await;
        assert!(matches!(resolved, Err(AuthStateError::UserMissing(u)) if u == uuid));
    }

    #[tokio::test]
    async fn resolves_existing_user_without_caching() {
        let alice = user("alice@example.com");
        let uuid = alice.uuid;
        let users = FakeUsers::with(alice);
        let auth = token(&uuid.to_string());

        let first = current_user(Some(&auth), &users).await.unwrap().unwrap();
        let second = current_user_or_err(Some(&auth), &users).await.unwrap();
        assert_eq!(first.uuid, uuid);
        assert_eq!(second.email, "alice@example.com");
        assert_eq!(users.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn or_err_reports_no_authenticated_user() {
        let users = FakeUsers::default();
        let err = current_user_or_err(None, &users).await.unwrap_err();
        assert!(matches!(err, AuthStateError::NoAuthenticatedUser));
        assert_eq!(err.to_string(), "No authenticated user found");
    }
}
