/**
 * Authentication Handler Types
 *
 * Request and response bodies for the register, login and me handlers.
 */

use serde::{Deserialize, Serialize};

use crate::backend::auth::identity::UserId;
use crate::backend::auth::users::User;
use crate::shared::SharedError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration request
#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    /// Plain password, hashed before storage
    pub password: String,
    /// Defaults to the local part of `email`
    #[serde(default)]
    pub full_name: Option<String>,
}

impl RegisterRequest {
    /// Check field formats before touching the store
    ///
    /// # Errors
    ///
    /// `SharedError::ValidationError` naming the first invalid field.
    pub fn validate(&self) -> Result<(), SharedError> {
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(SharedError::validation("email", "Invalid email format")),
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(SharedError::validation(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
        }
        Ok(())
    }

    /// Name to store: the given one, or the email's local part
    pub fn display_name(&self) -> String {
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .email
                .trim()
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

/// Login form (`application/x-www-form-urlencoded`)
///
/// `username` carries the email address.
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// User view without credentials
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_admin: user.is_admin,
        }
    }
}
