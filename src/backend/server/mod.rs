//! Server Module
//!
//! Application state, resource loading, and server initialization.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs    - Module exports
//! ├── state.rs  - AppState and FromRef impls
//! ├── config.rs - Database and user store loading
//! └── init.rs   - State building, app creation, graceful shutdown
//! ```

/// Application state management
pub mod state;

/// Server resource loading
pub mod config;

/// Server initialization
pub mod init;

pub use init::{build_state, create_app, shutdown_signal};
pub use state::AppState;
