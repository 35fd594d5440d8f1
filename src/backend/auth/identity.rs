/**
 * Connection Identity
 *
 * The principal a realtime connection is registered under. Public entry
 * points accept unauthenticated clients, so identity is either a known user
 * or `Anonymous`.
 */
use std::fmt;

use crate::backend::auth::users::User;

/// Primary key of a user record
pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Identity {
    Anonymous,
    User(UserId),
}

impl Identity {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::User(id) => Some(*id),
        }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self::User(user.id)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::User(id) => write!(f, "user:{}", id),
        }
    }
}
