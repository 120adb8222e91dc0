//! End-to-end tests: the real server on a random port, Gemini replaced by wiremock.

mod common;

use common::{test_config, FRONTEND_ORIGIN, GENERATE_CONTENT_PATH};
use guide_service::config::GuideConfig;
use guide_service::services::metrics::init_metrics;
use guide_service::startup::Application;
use reqwest::Client;
use secrecy::Secret;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Spawn the application on a random port and return the port number.
async fn spawn_app(config: GuideConfig) -> u16 {
    init_metrics();

    let app = Application::build(config)
        .await
        .expect("Failed to build application");
    let port = app.port();

    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    port
}

#[tokio::test]
async fn health_check_returns_ok() {
    let port = spawn_app(test_config("http://localhost:1")).await;

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/health", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "guide-service");
    assert_eq!(body["provider"], "gemini");
}

#[tokio::test]
async fn readiness_fails_without_api_key() {
    let mut config = test_config("http://localhost:1");
    config.gemini.api_key = Secret::new(String::new());
    let port = spawn_app(config).await;

    let response = Client::new()
        .get(format!("http://127.0.0.1:{}/ready", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn generate_relays_through_provider() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_CONTENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "Try the Musée d'Orsay."}]}}]
        })))
        .expect(1)
        .mount(&gemini)
        .await;

    let port = spawn_app(test_config(&gemini.uri())).await;

    let response = Client::new()
        .post(format!("http://127.0.0.1:{}/api/gemini/generate", port))
        .header("origin", FRONTEND_ORIGIN)
        .json(&json!({
            "latitude": 48.8566,
            "longitude": 2.3522,
            "radius": 5000,
            "prompt": "Any museum tips?"
        }))
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        FRONTEND_ORIGIN
    );
    assert_eq!(response.text().await.unwrap(), "Try the Musée d'Orsay.");

    let requests = gemini.received_requests().await.unwrap();
    let document: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        document["contents"][0]["parts"][0]["text"],
        "Latitude: 48.8566, Longitude: 2.3522, Radius: 5000 meters. Question: Any museum tips?"
    );
}

#[tokio::test]
async fn provider_outage_is_reported_in_body() {
    let port = spawn_app(test_config(&common::closed_port_url())).await;

    let response = Client::new()
        .post(format!("http://127.0.0.1:{}/api/gemini/generate", port))
        .json(&json!({
            "latitude": 10,
            "longitude": 20,
            "radius": 1000,
            "prompt": "Anything?"
        }))
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert!(response
        .text()
        .await
        .unwrap()
        .starts_with("Error while communicating with Gemini: "));
}

#[tokio::test]
async fn metrics_endpoint_exposes_relay_outcomes() {
    let gemini = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&gemini)
        .await;

    let port = spawn_app(test_config(&gemini.uri())).await;
    let client = Client::new();

    client
        .post(format!("http://127.0.0.1:{}/api/gemini/generate", port))
        .json(&json!({"latitude": 1, "longitude": 2, "radius": 3, "prompt": "x"}))
        .send()
        .await
        .expect("Failed to send request");

    let metrics = client
        .get(format!("http://127.0.0.1:{}/metrics", port))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .unwrap();

    assert!(metrics.contains("relay_requests_total"));
    assert!(metrics.contains("outcome=\"no_candidates\""));
}
