//! Real-time Update Module
//!
//! Push channel from the server to connected dashboards over WebSocket.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs        - Module exports and documentation
//! ├── connection.rs - Per-client handle: outbound queue + shutdown signal
//! ├── hub.rs        - ConnectionHub: identity-keyed registry and fan-out
//! ├── socket.rs     - GET /ws entry point and session loop
//! ├── notify.rs     - Server-initiated pushes (task updates, notifications)
//! └── admin.rs      - Registry stats for admins
//! ```
//!
//! # Delivery Model
//!
//! The hub never writes to sockets. `broadcast` enqueues the serialized
//! event on each target connection's queue and each session's writer task
//! drains its own queue in order. A connection whose queue is gone is
//! dropped from the registry on the spot.
//!
//! # Example
//!
//! ```rust,no_run
//! use scrapyflow::backend::auth::Identity;
//! use scrapyflow::backend::realtime::{notify_task_update, ConnectionHub};
//! use scrapyflow::shared::TaskSnapshot;
//!
//! let hub = ConnectionHub::new();
//! let task = TaskSnapshot::new(1, "Prices", "amazon_price", "https://example.com");
//! let delivered = notify_task_update(&hub, 7, &task);
//! assert_eq!(delivered, hub.connection_count(Identity::User(7)));
//! ```

/// Connection handle
pub mod connection;

/// Connection Hub
pub mod hub;

/// WebSocket entry point
pub mod socket;

/// Server-initiated pushes
pub mod notify;

/// Admin stats handler
pub mod admin;

pub use admin::connection_stats;
pub use connection::{ConnectionHandle, ConnectionId, Outbound, TransportError};
pub use hub::{ConnectionHub, HubStats, Target};
pub use notify::{notify_task_update, notify_user};
pub use socket::{handle_websocket, run_session};
