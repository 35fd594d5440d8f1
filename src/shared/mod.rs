//! Shared Types Module
//!
//! Types that describe what goes over the wire or into configuration,
//! independent of the HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! shared/
//! ├── mod.rs          - Module exports
//! ├── event.rs        - Realtime message envelope
//! ├── task.rs         - Task snapshot pushed to dashboards
//! ├── error.rs        - Shared error types
//! └── config/         - Application configuration
//! ```

/// Realtime message envelope
pub mod event;

/// Task snapshot and status
pub mod task;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::SharedError;
pub use event::RealtimeEvent;
pub use task::{TaskSnapshot, TaskStatus};
