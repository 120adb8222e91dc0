//! Relay client abstraction and implementations.
//!
//! A relay client forwards a composed prompt to a generative-language
//! provider and hands back the answer text. Failures are typed so the HTTP
//! layer can choose a status; each failure's `Display` is the descriptive
//! text returned to the frontend.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single relay call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// Transport failure, timeout, non-2xx status or unparseable body.
    #[error("Error while communicating with Gemini: {0}")]
    Communication(String),

    /// `candidates` missing, not an array, or empty.
    #[error("No candidates returned by Gemini.")]
    NoCandidates,

    /// `parts` of the first candidate missing, not an array, or empty.
    #[error("No parts found in the response.")]
    NoParts,

    /// Client cannot make calls at all (e.g. empty API key).
    #[error("Relay client not configured: {0}")]
    NotConfigured(String),
}

impl RelayError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Communication(_) => "communication",
            RelayError::NoCandidates => "no_candidates",
            RelayError::NoParts => "no_parts",
            RelayError::NotConfigured(_) => "not_configured",
        }
    }
}

/// Forwards composed prompts to a provider.
#[async_trait]
pub trait RelayClient: Send + Sync {
    /// Send `prompt` to the provider and return the extracted answer text.
    async fn relay(&self, prompt: &str) -> Result<String, RelayError>;

    /// Report whether the client is able to make calls. Never contacts the provider.
    async fn health_check(&self) -> Result<(), RelayError>;

    /// Provider name used in metrics labels.
    fn provider(&self) -> &'static str;
}
