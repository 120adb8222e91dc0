//! Application startup and lifecycle management.
//!
//! Builds the HTTP router (relay endpoint, health, metrics) with its
//! middleware stack and runs it until a shutdown signal arrives.

use crate::config::GuideConfig;
use crate::handlers;
use crate::middleware::metrics_middleware;
use crate::services::{GeminiRelayClient, RelayClient};
use axum::{
    http::{HeaderValue, Method, Request},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    security_headers::security_headers_middleware,
    tracing::{request_id_middleware, REQUEST_ID_HEADER},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GuideConfig>,
    pub relay: Arc<dyn RelayClient>,
}

impl AppState {
    pub fn new(config: GuideConfig, relay: Arc<dyn RelayClient>) -> Self {
        Self {
            config: Arc::new(config),
            relay,
        }
    }
}

/// Build the application router.
///
/// Fails if a configured CORS origin is not a valid header value.
pub fn build_router(state: AppState) -> Result<Router, AppError> {
    let cors = cors_layer(&state.config.security.allowed_origins)?;

    let app = Router::new()
        .route("/api/gemini/generate", post(handlers::generate))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .route_layer(from_fn(metrics_middleware))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri().path(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors);

    Ok(app)
}

fn cors_layer(allowed_origins: &[String]) -> Result<CorsLayer, AppError> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the Gemini relay client.
    pub async fn build(config: GuideConfig) -> Result<Self, AppError> {
        let relay: Arc<dyn RelayClient> =
            Arc::new(GeminiRelayClient::new(config.gemini.clone())?);

        if let Err(e) = relay.health_check().await {
            tracing::warn!(error = %e, "Relay client is not fully configured");
        }

        tracing::info!(
            provider = relay.provider(),
            url = %config.gemini.url,
            "Initialized relay client"
        );

        Self::build_with_relay(config, relay).await
    }

    /// Build the application around an already constructed relay client.
    pub async fn build_with_relay(
        config: GuideConfig,
        relay: Arc<dyn RelayClient>,
    ) -> Result<Self, AppError> {
        // port 0 = random port for testing
        let addr = config.common.socket_addr();
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let router = build_router(AppState::new(config, relay))?;

        tracing::info!(port, "Guide service listening");

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
