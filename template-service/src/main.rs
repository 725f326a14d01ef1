use service_core::error::AppError;
use service_core::observability::init_tracing;
use template_service::config::TemplateConfig;
use template_service::services::init_metrics;
use template_service::startup::{shutdown_signal, Application};
use tokio::sync::oneshot;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Fail fast on invalid configuration.
    let config = TemplateConfig::from_env()?;

    init_tracing(
        &config.service_name,
        &config.log_level,
        config.otlp_endpoint.as_deref(),
    );
    init_metrics();

    tracing::info!(
        service = %config.service_name,
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.server.environment,
        server = ?config.server,
        database = ?config.database,
        cache = ?config.cache,
        "Starting template service"
    );

    let shutdown_timeout = config.server.shutdown_timeout;
    let app = Application::build(config).await?;

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(app.run_with_graceful_shutdown(async {
        let _ = stop_rx.await;
    }));

    tokio::select! {
        res = &mut server => {
            // Stopped on its own, before any signal.
            return res.map_err(|e| AppError::InternalError(e.into()))?;
        }
        _ = shutdown_signal() => {}
    }

    tracing::info!(
        timeout_secs = shutdown_timeout.as_secs(),
        "Draining in-flight requests"
    );
    let _ = stop_tx.send(());

    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(res) => res.map_err(|e| AppError::InternalError(e.into()))??,
        Err(_) => {
            tracing::error!(
                timeout_secs = shutdown_timeout.as_secs(),
                "Server forced to shutdown"
            );
            std::process::exit(1);
        }
    }

    tracing::info!("Service shutdown complete");
    Ok(())
}
