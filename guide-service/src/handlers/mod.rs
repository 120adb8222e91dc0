//! HTTP handlers for the guide service.

pub mod generate;
pub mod health;
pub mod metrics;

pub use generate::generate;
pub use health::{health_check, readiness_check};
