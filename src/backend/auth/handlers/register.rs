/**
 * Register Handler
 *
 * POST /auth/register
 *
 * 1. Validate email and password format
 * 2. Hash the password with bcrypt
 * 3. Create the user; the store decides whether this is the first user and
 *    therefore an admin
 */

use std::sync::Arc;

use axum::{extract::State, response::Json};

use crate::backend::auth::authenticator::SessionAuthenticator;
use crate::backend::auth::handlers::types::{RegisterRequest, UserResponse};
use crate::backend::auth::users::NewUser;
use crate::backend::error::BackendError;
use crate::shared::AppConfig;

/// # Errors
///
/// * `400 Bad Request` - invalid email, short password, or email already registered
/// * `500 Internal Server Error` - hashing or store failure
pub async fn register(
    State(config): State<Arc<AppConfig>>,
    State(authenticator): State<SessionAuthenticator>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, BackendError> {
    request.validate()?;
    let email = request.email.trim().to_string();
    tracing::info!("Registration request for: {}", email);

    let hashed_password = bcrypt::hash(&request.password, config.bcrypt_cost).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::internal("password hashing failed")
    })?;

    let user = authenticator
        .users()
        .create_user(NewUser {
            full_name: request.display_name(),
            email,
            hashed_password,
        })
        .await?;

    tracing::info!(user_id = user.id, is_admin = user.is_admin, "User registered: {}", user.email);
    Ok(Json(user.into()))
}
