/**
 * Session Authenticator
 *
 * Resolves a bearer credential to a user. There are two entry points with
 * different failure semantics:
 *
 * - `resolve_required` - protected routes. Any failure is `Unauthorized`,
 *   with no indication of which check failed.
 * - `resolve_optional` - public and realtime entry points. Any failure is
 *   `Identity::Anonymous`; nothing is ever rejected.
 *
 * A credential resolves only if it verifies against the process-wide keys,
 * has not expired, carries a numeric subject, and that subject is an active
 * user in the store.
 */

use std::sync::Arc;

use thiserror::Error;

use crate::backend::auth::identity::Identity;
use crate::backend::auth::sessions::TokenKeys;
use crate::backend::auth::users::{StoreError, User, UserStore};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Could not validate credentials")]
    Unauthorized,
}

#[derive(Clone)]
pub struct SessionAuthenticator {
    keys: Arc<TokenKeys>,
    users: Arc<dyn UserStore>,
}

impl SessionAuthenticator {
    pub fn new(keys: TokenKeys, users: Arc<dyn UserStore>) -> Self {
        Self {
            keys: Arc::new(keys),
            users,
        }
    }

    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }

    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    /// Resolve a credential that must belong to an active user
    ///
    /// # Errors
    ///
    /// `AuthError::Unauthorized` for a missing, malformed, expired or
    /// foreign-signed credential, an unknown or inactive user, or a store
    /// failure during lookup.
    pub async fn resolve_required(&self, credential: Option<&str>) -> Result<User, AuthError> {
        match self.active_user(credential).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                tracing::warn!("Rejected request with invalid credentials");
                Err(AuthError::Unauthorized)
            }
            Err(e) => {
                tracing::error!("User lookup failed during authentication: {}", e);
                Err(AuthError::Unauthorized)
            }
        }
    }

    /// Resolve a credential if possible, falling back to `Anonymous`
    pub async fn resolve_optional(&self, credential: Option<&str>) -> Identity {
        match self.active_user(credential).await {
            Ok(Some(user)) => Identity::from(&user),
            Ok(None) => Identity::Anonymous,
            Err(e) => {
                tracing::warn!("User lookup failed, treating client as anonymous: {}", e);
                Identity::Anonymous
            }
        }
    }

    async fn active_user(&self, credential: Option<&str>) -> Result<Option<User>, StoreError> {
        let Some(user_id) = credential.and_then(|token| self.keys.subject(token)) else {
            return Ok(None);
        };

        let user = self.users.get_user_by_id(user_id).await?;
        match user {
            Some(user) if user.is_active => Ok(Some(user)),
            Some(_) => {
                tracing::debug!(user_id, "Credential belongs to an inactive user");
                Ok(None)
            }
            None => {
                tracing::debug!(user_id, "Credential belongs to an unknown user");
                Ok(None)
            }
        }
    }
}
