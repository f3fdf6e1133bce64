use service_core::error::AppError;
use service_core::observability::{init_tracing, shutdown_tracing};
use story_service::config::StoryConfig;
use story_service::services::metrics::init_metrics;
use story_service::Application;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = StoryConfig::load()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    )
    .map_err(AppError::ConfigError)?;

    init_metrics()?;

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        provider = config.provider.kind.as_str(),
        "Starting story service"
    );

    let app = Application::build(config).await?;
    app.run_until_stopped().await?;

    tracing::info!("Service shutdown complete");
    shutdown_tracing();
    Ok(())
}
