//! guide-service: relays location-aware questions from the map frontend to
//! Gemini and returns the answer text.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
