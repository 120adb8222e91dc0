pub mod metrics;
pub mod providers;

pub use providers::gemini::GeminiRelayClient;
pub use providers::{RelayClient, RelayError};
