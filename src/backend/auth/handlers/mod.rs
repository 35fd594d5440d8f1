//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports
//! ├── types.rs    - Request and response types
//! ├── register.rs - User registration handler
//! ├── login.rs    - Password login handler
//! └── me.rs       - Current user handler
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /auth/register
//! - **`login`** - POST /auth/login (form body)
//! - **`get_me`** - GET /auth/me, behind `auth_middleware`

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Current user handler
pub mod me;

pub use types::{LoginForm, RegisterRequest, TokenResponse, UserResponse};

pub use login::login;
pub use me::get_me;
pub use register::register;
