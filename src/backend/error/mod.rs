//! Backend Error Module
//!
//! Error types returned by HTTP handlers and extractors, and their
//! conversion to HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! Realtime transport failures never reach this type: the connection hub
//! absorbs them as implicit disconnects.

pub mod types;

pub mod conversion;

pub use types::BackendError;
