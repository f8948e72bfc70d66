use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::current_user::{current_user_or_err, Authentication};
use super::jwt::JwtKeys;
use super::repo_types::User;
use crate::{error::AppError, state::AppState};

/// Authentication state of the request, derived once from the bearer token.
///
/// Missing, malformed or expired tokens degrade to [`Authentication::Anonymous`];
/// rejecting the request is left to [`CurrentUser`].
pub struct RequestAuth(pub Authentication);

#[async_trait]
impl<S> FromRequestParts<S> for RequestAuth
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        else {
            return Ok(RequestAuth(Authentication::Anonymous));
        };

        let Some(token) = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
        else {
            warn!("unsupported authorization scheme");
            return Ok(RequestAuth(Authentication::Anonymous));
        };

        let keys = JwtKeys::from_ref(state);
        match keys.verify(token) {
            Ok(claims) => Ok(RequestAuth(Authentication::Token {
                principal: claims.sub,
                authenticated: true,
            })),
            Err(e) => {
                warn!(error = %e, "invalid or expired token");
                Ok(RequestAuth(Authentication::Anonymous))
            }
        }
    }
}

/// The resolved, authenticated user of the request.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let RequestAuth(auth) = match RequestAuth::from_request_parts(parts, state).await {
            Ok(auth) => auth,
            Err(never) => match never {},
        };
        let user = current_user_or_err(Some(&auth), state.users.as_ref()).await?;
        Ok(CurrentUser(user))
    }
}
