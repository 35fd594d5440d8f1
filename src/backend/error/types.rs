/**
 * Backend Error Types
 *
 * This module defines the error type returned by HTTP handlers and
 * extractors. Each variant maps to one status code; internal causes are
 * kept for the log and never rendered to the client.
 *
 * # Error Categories
 *
 * - `Unauthorized` - credential missing or rejected (401, no sub-reason)
 * - `Forbidden` - authenticated but not allowed (403)
 * - `HandlerError` - request-level failures with an explicit status
 * - `StoreError` - user store failures
 * - `SharedError` - validation/serialization failures from `shared`
 * - `Internal` - hashing, signing and other server-side failures
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::auth::authenticator::AuthError;
use crate::backend::auth::users::StoreError;
use crate::shared::SharedError;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
    },

    #[error("Handler error: {message}")]
    HandlerError {
        status: StatusCode,
        message: String,
    },

    #[error(transparent)]
    StoreError(#[from] StoreError),

    #[error(transparent)]
    SharedError(#[from] SharedError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl BackendError {
    /// Create a handler error with a status code
    ///
    /// ```rust
    /// use scrapyflow::backend::error::BackendError;
    /// use axum::http::StatusCode;
    ///
    /// let err = BackendError::handler(StatusCode::BAD_REQUEST, "Invalid request");
    /// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    /// ```
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Server-side failure. `message` is logged, not shown to the client.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::HandlerError { status, .. } => *status,
            Self::StoreError(StoreError::DuplicateEmail(_)) => StatusCode::BAD_REQUEST,
            Self::StoreError(StoreError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } => StatusCode::BAD_REQUEST,
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message rendered to the client
    pub fn message(&self) -> String {
        match self {
            Self::Unauthorized => self.to_string(),
            Self::Forbidden { message } => message.clone(),
            Self::HandlerError { message, .. } => message.clone(),
            Self::StoreError(StoreError::DuplicateEmail(_)) => "Email already registered".to_string(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            Self::StoreError(StoreError::Database(_))
            | Self::SharedError(SharedError::SerializationError { .. })
            | Self::Internal { .. } => INTERNAL_MESSAGE.to_string(),
        }
    }
}

impl From<AuthError> for BackendError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => Self::Unauthorized,
        }
    }
}
