use std::sync::Arc;

use tickr::Tickr;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub tickr: Tickr,
}

impl AppState {
    pub fn new(tickr: Tickr) -> Arc<Self> {
        Arc::new(Self { tickr })
    }
}
