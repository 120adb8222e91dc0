//! Mock relay client for testing.

use super::{RelayClient, RelayError};
use async_trait::async_trait;
use std::sync::Mutex;

/// Returns a canned outcome and remembers every prompt it was asked to relay.
pub struct MockRelayClient {
    outcome: Result<String, RelayError>,
    prompts: Mutex<Vec<String>>,
}

impl MockRelayClient {
    /// Answers every prompt with `answer`.
    pub fn answering(answer: impl Into<String>) -> Self {
        Self {
            outcome: Ok(answer.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fails every prompt with `error`.
    pub fn failing(error: RelayError) -> Self {
        Self {
            outcome: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RelayClient for MockRelayClient {
    async fn relay(&self, prompt: &str) -> Result<String, RelayError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        self.outcome.clone()
    }

    async fn health_check(&self) -> Result<(), RelayError> {
        match &self.outcome {
            Err(RelayError::NotConfigured(reason)) => {
                Err(RelayError::NotConfigured(reason.clone()))
            }
            _ => Ok(()),
        }
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}
