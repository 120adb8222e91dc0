use guide_service::config::GuideConfig;
use guide_service::services::metrics::init_metrics;
use guide_service::startup::Application;
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = GuideConfig::load()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );
    init_metrics();

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        error_status = ?config.gemini.error_status,
        "Starting guide service"
    );

    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}
