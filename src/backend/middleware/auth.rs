/**
 * Authentication Middleware
 *
 * Route protection and identity extraction built on `SessionAuthenticator`.
 *
 * - `auth_middleware` - layer for protected routes. Resolves the bearer
 *   token to an active user or rejects with 401, and attaches the user to
 *   the request extensions.
 * - `AuthUser` / `AdminUser` - extractors for handlers behind that layer
 * - `OptionalIdentity` - extractor for public entry points. Never rejects;
 *   also accepts the token as a `?token=` query parameter, since browsers
 *   cannot set headers on a WebSocket handshake.
 */

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts, Query, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::backend::auth::authenticator::SessionAuthenticator;
use crate::backend::auth::identity::Identity;
use crate::backend::auth::users::User;
use crate::backend::error::BackendError;

/// Authenticated user attached to request extensions by `auth_middleware`
#[derive(Clone, Debug)]
pub struct AuthenticatedUser(pub User);

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// The scheme is matched case-insensitively. Returns `None` for a missing
/// header, another scheme, or an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Authentication middleware
///
/// Returns 401 with `WWW-Authenticate: Bearer` if the token is missing,
/// invalid, expired, or belongs to an unknown or inactive user.
pub async fn auth_middleware(
    State(authenticator): State<SessionAuthenticator>,
    mut request: Request,
    next: Next,
) -> Result<Response, BackendError> {
    let user = authenticator
        .resolve_required(bearer_token(request.headers()))
        .await?;

    request.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(request).await)
}

/// Axum extractor for the user resolved by `auth_middleware`
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthenticatedUser not found in request extensions");
                BackendError::Unauthorized
            })?;

        Ok(AuthUser(user))
    }
}

/// Like `AuthUser`, but rejects non-admins with 403
#[derive(Clone, Debug)]
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            tracing::warn!(user_id = user.id, "Non-admin user requested an admin route");
            return Err(BackendError::forbidden("Admin access required"));
        }
        Ok(AdminUser(user))
    }
}

#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Identity of the caller, `Anonymous` when no valid credential is presented
///
/// Looks at the `Authorization` header first, then the `token` query
/// parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionalIdentity(pub Identity);

impl<S> FromRequestParts<S> for OptionalIdentity
where
    SessionAuthenticator: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = SessionAuthenticator::from_ref(state);

        let query_token = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(query)| query.token)
            .filter(|token| !token.is_empty());
        let credential = bearer_token(&parts.headers).or(query_token.as_deref());

        Ok(OptionalIdentity(authenticator.resolve_optional(credential).await))
    }
}
