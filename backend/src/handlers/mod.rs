//! HTTP handlers

pub mod auth;
pub mod catalog;
pub mod health;
pub mod invoice;
pub mod reporting;
pub mod sales;

pub use auth::*;
pub use catalog::*;
pub use health::*;
pub use invoice::*;
pub use reporting::*;
pub use sales::*;
