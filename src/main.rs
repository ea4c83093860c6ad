use consult::config::AppConfig;
use consult::controller::Controller;
use consult::http::{build_router, AppState};
use consult::llm::gateways::OpenAIGateway;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    let gateway = Arc::new(OpenAIGateway::new());
    let controller = Controller::new(gateway, config.model.clone(), config.temperature);
    let state = AppState::new(controller, config.memory_budget);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, model = %config.model, "consult listening");

    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
