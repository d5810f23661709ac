use receipt_service::config::ReceiptConfig;
use receipt_service::services::metrics::init_metrics;
use receipt_service::startup::Application;
use service_core::error::AppError;
use service_core::observability::init_tracing;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = ReceiptConfig::load()?;

    init_tracing("receipt-service", &config.common.log_level);
    init_metrics();

    tracing::info!(
        port = config.common.port,
        model = %config.google.model,
        "Starting receipt-service"
    );

    let application = Application::build(config).await?;
    application.run_until_stopped().await?;

    Ok(())
}
