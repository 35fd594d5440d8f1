//! Middleware Module
//!
//! HTTP middleware and request extractors for the backend server.
//!
//! - **`auth`** - bearer-token protection for routes, user extractors, and
//!   the never-rejecting `OptionalIdentity` used by the realtime endpoint
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::middleware;
//! use scrapyflow::backend::middleware::auth_middleware;
//!
//! let protected = Router::new()
//!     .route("/auth/me", get(get_me))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
//! ```

pub mod auth;

pub use auth::{auth_middleware, bearer_token, AdminUser, AuthUser, AuthenticatedUser, OptionalIdentity};
