use async_trait::async_trait;

use crate::{DateRange, PricePoint, TickrError};
pub use tickr_types::ConnectorKey;

/// Focused role trait for connectors that provide daily price history.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Fetch daily price points for `symbol` covering `range` (inclusive).
    ///
    /// Points are returned in the provider's native order; callers must not
    /// assume ascending or descending dates.
    async fn history(&self, symbol: &str, range: DateRange)
    -> Result<Vec<PricePoint>, TickrError>;
}

/// Primary connector interface implemented by every upstream data source.
///
/// Capabilities are discovered through the `as_*_provider` accessors so that
/// wrappers can forward only what the inner connector supports.
pub trait TickrConnector: Send + Sync {
    /// Stable connector name used in logs and error tags.
    fn name(&self) -> &'static str;

    /// Human-readable vendor label.
    fn vendor(&self) -> &'static str;

    /// Typed key derived from [`TickrConnector::name`].
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// History capability, if supported.
    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        None
    }
}
