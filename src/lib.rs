//! Library entrypoint for the order-management schema initializer.
//!
//! The binary is a thin wrapper; integration tests under `tests/` drive the
//! same `services::db_init` functions against a live MongoDB.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use error::InitError;
