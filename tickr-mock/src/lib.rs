//! Mock connectors for tests and offline runs.
//!
//! [`MockConnector`] serves deterministic weekday bars for a handful of
//! well-known symbols. Two reserved symbols exercise error paths: `FAIL`
//! returns a connector error and `TIMEOUT` stalls long enough to trip a short
//! provider timeout.
//!
//! [`DynamicMockConnector`] defers every call to rules set at runtime through
//! its [`DynamicMockController`].

use std::time::Duration;

use async_trait::async_trait;
use tickr_core::connector::{HistoryProvider, TickrConnector};
use tickr_core::{DateRange, PricePoint, TickrError};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};

/// Simulated upstream latency for the `TIMEOUT` symbol.
pub const TIMEOUT_DELAY: Duration = Duration::from_millis(200);

/// Mock connector providing deterministic data from static fixtures.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockConnector;

impl MockConnector {
    /// Create the mock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn maybe_fail_or_timeout(symbol: &str, capability: &'static str) -> Result<(), TickrError> {
        match symbol {
            "FAIL" => Err(TickrError::connector(
                "tickr-mock",
                format!("forced failure: {capability}"),
            )),
            "TIMEOUT" => {
                tokio::time::sleep(TIMEOUT_DELAY).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl TickrConnector for MockConnector {
    fn name(&self) -> &'static str {
        "tickr-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }
}

#[async_trait]
impl HistoryProvider for MockConnector {
    async fn history(&self, symbol: &str, range: DateRange) -> Result<Vec<PricePoint>, TickrError> {
        let s = symbol.trim().to_ascii_uppercase();
        Self::maybe_fail_or_timeout(&s, "history").await?;
        fixtures::history::by_symbol(&s, range)
            .ok_or_else(|| TickrError::not_found(format!("history for {s}")))
    }
}
