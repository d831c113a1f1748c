//! Shared types and models for Volt Dealer Suite
//!
//! This crate contains the pieces used by both the API server and the
//! browser front end (via WASM): row payloads, the role/permission catalog,
//! report chart computations and the invoice PDF builder.

pub mod charts;
pub mod invoice;
pub mod models;
pub mod permissions;
pub mod types;

pub use models::*;
pub use types::*;
