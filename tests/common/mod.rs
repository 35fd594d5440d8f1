//! Common test utilities and helpers
//!
//! - Authentication test helpers (state, users, tokens)
//! - Postgres fixtures, skipped without `DATABASE_URL`
//! - Custom assertion macros

#![allow(dead_code)]

pub mod assertions;
pub mod auth_helpers;
pub mod database;

pub use auth_helpers::*;
