//! Gemini relay client.
//!
//! Posts the composed prompt as a single text part to the configured
//! `generateContent` endpoint and extracts
//! `candidates[0].content.parts[0].text` from the reply.

use super::{RelayClient, RelayError};
use crate::config::GeminiSettings;
use crate::services::metrics;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde_json::Value;
use service_core::error::AppError;
use service_core::observability::TracedClientExt;
use std::error::Error as _;
use std::time::{Duration, Instant};

const PROVIDER: &str = "gemini";

/// Relay client backed by the Gemini HTTP API.
pub struct GeminiRelayClient {
    settings: GeminiSettings,
    client: Client,
}

impl GeminiRelayClient {
    pub fn new(settings: GeminiSettings) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::InternalError(anyhow::Error::new(e).context("Failed to create HTTP client"))
            })?;

        Ok(Self { settings, client })
    }

    async fn send(&self, request: &GenerateContentRequest<'_>) -> Result<String, RelayError> {
        let response = self
            .client
            .traced_post(&self.settings.url)
            .query(&[("key", self.settings.api_key.expose_secret())])
            .json(request)
            .send()
            .await
            .map_err(describe_transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(describe_transport_error)?;

        tracing::debug!(status = %status, body = %body, "Gemini response received");

        if !status.is_success() {
            return Err(RelayError::Communication(describe_status(status, &body)));
        }

        extract_answer(&body)
    }
}

#[async_trait]
impl RelayClient for GeminiRelayClient {
    async fn relay(&self, prompt: &str) -> Result<String, RelayError> {
        let request = GenerateContentRequest::from_prompt(prompt);

        tracing::debug!(prompt_len = prompt.len(), "Sending request to Gemini API");

        let started = Instant::now();
        let result = self.send(&request).await;
        metrics::record_provider_latency(PROVIDER, started.elapsed().as_secs_f64());

        result
    }

    async fn health_check(&self) -> Result<(), RelayError> {
        if self.settings.api_key.expose_secret().is_empty() {
            return Err(RelayError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        reqwest::Url::parse(&self.settings.url).map_err(|e| {
            RelayError::NotConfigured(format!("Gemini URL '{}' is invalid: {}", self.settings.url, e))
        })?;

        Ok(())
    }

    fn provider(&self) -> &'static str {
        PROVIDER
    }
}

/// Pull the answer out of a provider response body.
///
/// Every level is checked before it is used; the body is untrusted.
pub fn extract_answer(body: &str) -> Result<String, RelayError> {
    let root: Value =
        serde_json::from_str(body).map_err(|e| RelayError::Communication(e.to_string()))?;

    let candidate = root
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .ok_or(RelayError::NoCandidates)?;

    let part = candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .and_then(|parts| parts.first())
        .ok_or(RelayError::NoParts)?;

    Ok(match part.get("text") {
        Some(Value::String(text)) => text.clone(),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => scalar.to_string(),
        _ => String::new(),
    })
}

/// Describe a transport failure without the request URL, which carries the API key.
fn describe_transport_error(err: reqwest::Error) -> RelayError {
    let err = err.without_url();
    let mut description = err.to_string();

    let mut source = err.source();
    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }

    RelayError::Communication(description)
}

fn describe_status(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body)
    }
}

// ============================================================================
// Gemini API request document
// ============================================================================

/// `{"contents":[{"parts":[{"text": ...}]}]}`
///
/// Serialization escapes quotes and control characters in the prompt.
#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    pub fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}
