//! ScrapyFlow - Realtime Backend Library
//!
//! Authentication and realtime push for the ScrapyFlow scraping dashboard.
//! Clients hold a bearer token; dashboards open a WebSocket and receive task
//! progress as the server pushes it.
//!
//! # Module Structure
//!
//! - **`shared`** - wire and configuration types
//!   - Realtime event envelope, task snapshot
//!   - `AppConfig` and its builder
//!   - Shared error types
//!
//! - **`backend`** - server-side code
//!   - Axum HTTP server, routes and middleware
//!   - Session Authenticator and user store
//!   - Connection Hub and WebSocket sessions
//!
//! # Usage
//!
//! ```rust,no_run
//! use scrapyflow::backend::server::{build_state, create_app};
//! use scrapyflow::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::builder().secret_key("change-me").build()?;
//! let app = create_app(build_state(config).await);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! - The Connection Hub is a `Mutex`-guarded registry behind an `Arc`;
//!   delivery happens outside the lock
//! - The in-memory user store uses `tokio::sync::RwLock`
//! - `AppConfig` is read-only after startup and shared via `Arc`
//!
//! # Error Handling
//!
//! - `Result<T, E>` with `thiserror` enums per layer
//! - `backend::error::BackendError` renders HTTP error responses

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
