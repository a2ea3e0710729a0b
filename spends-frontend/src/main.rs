use dotenvy::dotenv;
use spends_core::observability::init_tracing;
use spends_frontend::config::get_configuration;
use spends_frontend::services::ApiClient;
use spends_frontend::startup::build_router;
use spends_frontend::AppState;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        &configuration.telemetry.service_name,
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    );

    spends_frontend::services::metrics::init_metrics();

    let api_client = ApiClient::new(&configuration.api).map_err(|e| {
        tracing::error!("Failed to build backend client: {}", e);
        anyhow::anyhow!("Failed to build backend client: {}", e)
    })?;
    info!(base_url = %api_client.base_url(), "Workflow backend configured");

    let state = AppState::new(Arc::new(api_client), &configuration);
    let app = build_router(state);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!("Starting spends-frontend on {}", address);
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
