//! HTTP front end for tickr.
//!
//! `GET /ticker/{symbol}?fromDate=YYYY-MM-DD&toDate=YYYY-MM-DD` returns the
//! daily history as a JSON array (204 when there is none); `GET /health`
//! reports liveness.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use tickr::{Tickr, TickrConnector};
use tickr_iex::{IexConfig, IexConnector};
use tickr_mock::MockConnector;
use tower_http::cors::CorsLayer;

use config::ServerConfig;
use error::StartupError;
use state::AppState;

/// Assemble the application router with permissive CORS.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Build the orchestrator with the connector selected by `cfg`.
pub fn build_tickr(cfg: &ServerConfig) -> Result<Tickr, StartupError> {
    let connector: Arc<dyn TickrConnector> = if cfg.use_mock {
        Arc::new(MockConnector::new())
    } else {
        let token = cfg.iex_token.clone().ok_or(StartupError::Config {
            var: "IEX_TOKEN",
            msg: "required unless TICKR_USE_MOCK is enabled".into(),
        })?;
        let iex = IexConfig::new(token)
            .with_base_url(cfg.iex_base_url.clone())
            .with_timeout(cfg.provider_timeout);
        Arc::new(IexConnector::new(iex)?)
    };
    Ok(Tickr::builder()
        .with_connector(connector)
        .config(cfg.tickr_config())
        .build()?)
}
