use std::net::SocketAddr;

use tickr_server::config::ServerConfig;
use tickr_server::error::StartupError;
use tickr_server::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = ServerConfig::from_env()?;
    let tickr = tickr_server::build_tickr(&cfg)?;
    let connector = tickr.connector_name();
    let app = tickr_server::app(AppState::new(tickr));

    let addr: SocketAddr = format!("{}:{}", cfg.bind, cfg.port)
        .parse()
        .map_err(|e| StartupError::Config {
            var: "TICKR_BIND",
            msg: format!("{e}"),
        })?;

    tracing::info!(%addr, connector, "tickr listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received, gracefully stopping");
}
