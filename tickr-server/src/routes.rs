use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

// ── Query params ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryParams {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

/// Routes served by the API.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ticker/{symbol}", get(ticker_history))
        .route("/health", get(health))
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// Accepts `YYYY-MM-DD` or a timestamp; any time of day is dropped.
fn parse_date_param(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
        .map(Some)
        .map_err(|_| ApiError::BadRequest(format!("invalid {name}: {raw}")))
}

async fn ticker_history(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(q): Query<HistoryParams>,
) -> Result<Response, ApiError> {
    let started = Instant::now();
    let from = parse_date_param("fromDate", q.from_date.as_deref())?;
    let to = parse_date_param("toDate", q.to_date.as_deref())?;

    let points = state.tickr.history_request(&symbol, from, to).await?;

    tracing::info!(
        symbol = %symbol,
        from = ?from,
        to = ?to,
        points = points.len(),
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        "served ticker history"
    );

    if points.is_empty() {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        Ok(axum::Json(points).into_response())
    }
}
