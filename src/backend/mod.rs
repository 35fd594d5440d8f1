//! Backend Module
//!
//! Server-side code for the ScrapyFlow realtime backend: an axum HTTP server
//! with bearer-token authentication and a WebSocket push channel.
//!
//! # Architecture
//!
//! - **`server`** - application state, resource loading, startup and shutdown
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - identity, tokens, Session Authenticator, user store, handlers
//! - **`realtime`** - Connection Hub and the WebSocket entry point
//! - **`middleware`** - route protection and identity extractors
//! - **`error`** - backend error type and its HTTP rendering
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary entry point
//! ├── server/         - State and initialization
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── realtime/       - Connection Hub and WebSocket sessions
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` holds the configuration, the Session Authenticator and the
//! Connection Hub. All three are constructed once at startup and shared by
//! every handler; none of them is a global.
//!
//! # Example
//!
//! ```rust,no_run
//! use scrapyflow::backend::server::{build_state, create_app};
//! use scrapyflow::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let state = build_state(AppConfig::from_env()?).await;
//! let app = create_app(state);
//! // axum::serve(listener, app)
//! # Ok(())
//! # }
//! ```

/// Server setup and state
pub mod server;

/// Route configuration
pub mod routes;

/// Real-time update system
pub mod realtime;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

pub use error::BackendError;
pub use realtime::ConnectionHub;
pub use server::{create_app, AppState};
