//! Authentication Module
//!
//! Identity resolution for HTTP and realtime entry points, user persistence,
//! and the register/login HTTP handlers.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs           - Module exports and documentation
//! ├── identity.rs      - Identity (anonymous or user id)
//! ├── sessions.rs      - Signed token issue and verification
//! ├── users.rs         - User model, UserStore port, Postgres and in-memory adapters
//! ├── authenticator.rs - SessionAuthenticator (required / optional resolution)
//! └── handlers/        - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: email + password → user created (first user is admin)
//! 2. **Login**: email + password → bearer token
//! 3. **Protected routes**: token → `resolve_required` → active user or 401
//! 4. **Realtime**: token (header or `?token=`) → `resolve_optional` →
//!    user identity or anonymous
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage
//! - Tokens are HMAC-signed with a process-wide secret and expire
//! - Rejections never say which check failed

/// Caller identity
pub mod identity;

/// Token issue and verification
pub mod sessions;

/// User model and store
pub mod users;

/// Session Authenticator
pub mod authenticator;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use authenticator::{AuthError, SessionAuthenticator};
pub use handlers::{get_me, login, register};
pub use identity::{Identity, UserId};
pub use sessions::{Claims, TokenKeys};
pub use users::{InMemoryUserStore, NewUser, PgUserStore, StoreError, User, UserStore};
