//! Mock agent: serves canned Chatdesk endpoints on `MOCK_AGENT_PORT`.

use tracing::info;

/// Port used when `MOCK_AGENT_PORT` is unset or invalid.
const DEFAULT_PORT: u16 = 8000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let port = std::env::var("MOCK_AGENT_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(addr = %listener.local_addr()?, "mock agent listening");

    axum::serve(listener, mock_agent::router()).await?;
    Ok(())
}
