/**
 * Login Handler
 *
 * POST /auth/login
 *
 * Takes an OAuth2-style password form and returns a bearer token. Unknown
 * email, wrong password and inactive account all produce the same 401, and
 * an unknown email still pays for one bcrypt verification.
 */

use std::sync::{Arc, OnceLock};

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::Json,
};

use crate::backend::auth::authenticator::SessionAuthenticator;
use crate::backend::auth::handlers::types::{LoginForm, TokenResponse};
use crate::backend::error::BackendError;
use crate::shared::AppConfig;

const LOGIN_FAILED: &str = "Incorrect email or password";

/// Hash verified against when the email is unknown. Built once, at the
/// cost of the first login that needs it; the cost is fixed per process.
static UNKNOWN_USER_HASH: OnceLock<String> = OnceLock::new();

fn login_failed() -> BackendError {
    BackendError::handler(StatusCode::UNAUTHORIZED, LOGIN_FAILED)
}

fn unknown_user_hash(cost: u32) -> Result<&'static str, bcrypt::BcryptError> {
    if let Some(hash) = UNKNOWN_USER_HASH.get() {
        return Ok(hash);
    }
    let hash = bcrypt::hash("unknown-user-placeholder", cost)?;
    Ok(UNKNOWN_USER_HASH.get_or_init(|| hash))
}

/// Check `password` against the stored hash, or against a placeholder hash
/// of the same cost when there is no user
///
/// # Returns
///
/// `true` only when a stored hash exists and matches.
pub(crate) fn check_password(
    password: &str,
    stored_hash: Option<&str>,
    cost: u32,
) -> Result<bool, bcrypt::BcryptError> {
    match stored_hash {
        Some(hash) => bcrypt::verify(password, hash),
        None => {
            bcrypt::verify(password, unknown_user_hash(cost)?)?;
            Ok(false)
        }
    }
}

/// # Errors
///
/// * `401 Unauthorized` - credentials do not match an active user
/// * `500 Internal Server Error` - store, bcrypt or signing failure
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    State(authenticator): State<SessionAuthenticator>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, BackendError> {
    let user = authenticator
        .users()
        .get_user_by_email(form.username.trim())
        .await?;

    let stored_hash = user.as_ref().map(|user| user.hashed_password.as_str());
    let valid = check_password(&form.password, stored_hash, config.bcrypt_cost).map_err(|e| {
        tracing::error!("Password verification error: {:?}", e);
        BackendError::internal("password verification failed")
    })?;

    let Some(user) = user else {
        tracing::warn!("Login for unknown email: {}", form.username);
        return Err(login_failed());
    };
    if !valid {
        tracing::warn!(user_id = user.id, "Invalid password");
        return Err(login_failed());
    }
    if !user.is_active {
        tracing::warn!(user_id = user.id, "Login attempt for inactive user");
        return Err(login_failed());
    }

    let token = authenticator.keys().create_token(user.id).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::internal("token signing failed")
    })?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(TokenResponse::bearer(token)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_password_with_stored_hash() {
        let hash = bcrypt::hash("password123", 4).unwrap();
        assert!(check_password("password123", Some(&hash), 4).unwrap());
        assert!(!check_password("wrong", Some(&hash), 4).unwrap());
    }

    #[test]
    fn test_unknown_user_still_runs_bcrypt() {
        assert!(!check_password("password123", None, 4).unwrap());
        assert!(!check_password("unknown-user-placeholder", None, 4).unwrap());

        let hash = UNKNOWN_USER_HASH.get().expect("placeholder hash built on first use");
        assert!(hash.starts_with("$2"));
        assert!(bcrypt::verify("unknown-user-placeholder", hash).unwrap());
    }
}
