//! Routes Module
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs             - Module exports
//! ├── router.rs          - Router assembly, /health, fallback, tracing
//! ├── api_routes.rs      - Auth and admin endpoints
//! └── realtime_routes.rs - WebSocket endpoint
//! ```
//!
//! # Endpoints
//!
//! | Method | Path                 | Auth     |
//! |--------|----------------------|----------|
//! | GET    | `/health`            | none     |
//! | POST   | `/auth/register`     | none     |
//! | POST   | `/auth/login`        | none     |
//! | GET    | `/auth/me`           | required |
//! | GET    | `/admin/connections` | admin    |
//! | GET    | `/ws`                | optional |

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

/// Realtime endpoint routes
pub mod realtime_routes;

pub use router::create_router;
