//! Domain models for Volt Dealer Suite

mod dashboard;
mod invoice;
mod report;
mod user;

pub use dashboard::*;
pub use invoice::*;
pub use report::*;
pub use user::*;
