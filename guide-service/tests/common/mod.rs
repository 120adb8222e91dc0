//! Shared setup for guide-service integration tests.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use guide_service::config::{
    Environment, ErrorStatusPolicy, GeminiSettings, GuideConfig, SecurityConfig,
};
use guide_service::services::providers::mock::MockRelayClient;
use guide_service::{build_router, AppState};
use secrecy::Secret;
use serde_json::Value;
use std::net::IpAddr;
use std::sync::Arc;

pub const TEST_API_KEY: &str = "test-api-key";
pub const GENERATE_CONTENT_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";
pub const FRONTEND_ORIGIN: &str = "http://localhost:5173";

/// Configuration pointing the relay at `gemini_base` (e.g. a wiremock server).
pub fn test_config(gemini_base: &str) -> GuideConfig {
    GuideConfig {
        common: service_core::config::Config {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 0,
        },
        environment: Environment::Dev,
        service_name: "guide-service".to_string(),
        log_level: "error".to_string(),
        otlp_endpoint: None,
        gemini: GeminiSettings {
            url: format!("{}{}", gemini_base, GENERATE_CONTENT_PATH),
            api_key: Secret::new(TEST_API_KEY.to_string()),
            timeout_seconds: 5,
            error_status: ErrorStatusPolicy::Compatible,
        },
        security: SecurityConfig {
            allowed_origins: vec![FRONTEND_ORIGIN.to_string()],
        },
    }
}

/// Router backed by a mock relay client.
pub fn mock_router(relay: Arc<MockRelayClient>, error_status: ErrorStatusPolicy) -> Router {
    let mut config = test_config("http://gemini.invalid");
    config.gemini.error_status = error_status;

    build_router(AppState::new(config, relay)).expect("Failed to build router")
}

pub fn generate_request(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/gemini/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

/// A local address nothing is listening on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
