use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tickr_core::{
    BoundaryPolicy, DateRange, PricePoint, RangeCache, RequestLimits, TickrConfig, TickrConnector,
    TickrError,
};

use crate::request::{self, HistoryQuery};

/// Serves daily price history for a symbol, reading through a shared
/// [`RangeCache`] in front of one upstream connector.
pub struct Tickr {
    connector: Arc<dyn TickrConnector>,
    cache: RangeCache,
    cfg: TickrConfig,
}

/// Builder for constructing a [`Tickr`] with custom configuration.
pub struct TickrBuilder {
    connector: Option<Arc<dyn TickrConnector>>,
    cache: Option<RangeCache>,
    cfg: TickrConfig,
}

impl Default for TickrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TickrBuilder {
    /// Create a new builder with default configuration and no connector.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connector: None,
            cache: None,
            cfg: TickrConfig::default(),
        }
    }

    /// Register the upstream connector. A later call replaces an earlier one.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn TickrConnector>) -> Self {
        self.connector = Some(c);
        self
    }

    /// Share an existing cache instead of starting from an empty one.
    #[must_use]
    pub fn with_cache(mut self, cache: RangeCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub const fn config(mut self, cfg: TickrConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Set the timeout applied to each upstream history call.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Choose how a covered range with a missing boundary point is handled.
    #[must_use]
    pub const fn boundary_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.cfg.boundary_policy = policy;
        self
    }

    /// Set request normalization limits.
    #[must_use]
    pub const fn limits(mut self, limits: RequestLimits) -> Self {
        self.cfg.limits = limits;
        self
    }

    /// Build the `Tickr` instance.
    ///
    /// # Errors
    /// Returns `TickrError::InvalidArg` if no connector was registered or the
    /// connector does not provide history.
    pub fn build(self) -> Result<Tickr, TickrError> {
        let connector = self
            .connector
            .ok_or_else(|| TickrError::InvalidArg("no connector registered".into()))?;
        if connector.as_history_provider().is_none() {
            return Err(TickrError::InvalidArg(format!(
                "connector {} does not provide history",
                connector.name()
            )));
        }
        Ok(Tickr {
            connector,
            cache: self.cache.unwrap_or_default(),
            cfg: self.cfg,
        })
    }
}

impl Tickr {
    /// Start building a new `Tickr` instance.
    #[must_use]
    pub fn builder() -> TickrBuilder {
        TickrBuilder::new()
    }

    /// The shared range cache.
    #[must_use]
    pub const fn cache(&self) -> &RangeCache {
        &self.cache
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &TickrConfig {
        &self.cfg
    }

    /// Name of the upstream connector.
    #[must_use]
    pub fn connector_name(&self) -> &'static str {
        self.connector.name()
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tickr::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, TickrError>
    where
        Fut: Future<Output = Result<T, TickrError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(TickrError::provider_timeout(connector_name, capability)))
    }

    async fn fetch(&self, symbol: &str, range: DateRange) -> Result<Vec<PricePoint>, TickrError> {
        let name = self.connector.name();
        let provider = self
            .connector
            .as_history_provider()
            .ok_or_else(|| TickrError::connector(name, "history not supported"))?;
        Self::provider_call_with_timeout(
            name,
            "history",
            self.cfg.provider_timeout,
            provider.history(symbol, range),
        )
        .await
    }

    /// Daily history for `symbol` over `range`.
    ///
    /// Served from the cache when `range` is fully covered (newest first);
    /// otherwise fetched upstream and returned in the provider's order while
    /// the result is cached in the background.
    ///
    /// # Errors
    /// Returns `TickrError::InvalidArg` for a blank symbol,
    /// `TickrError::ProviderTimeout` when the upstream call exceeds the
    /// configured timeout, any connector error unchanged, and
    /// `TickrError::BoundaryNotCached` under [`BoundaryPolicy::Fail`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tickr::core::history",
            skip(self),
            fields(connector = self.connector.name()),
        )
    )]
    pub async fn history(
        &self,
        symbol: &str,
        range: DateRange,
    ) -> Result<Vec<PricePoint>, TickrError> {
        let res = self
            .cache
            .get_or_add(symbol, range, || self.fetch(symbol, range))
            .await;
        match res {
            Err(TickrError::BoundaryNotCached { .. })
                if self.cfg.boundary_policy == BoundaryPolicy::Refetch =>
            {
                #[cfg(feature = "tracing")]
                tracing::info!("boundary missing from cache; refetching range");
                self.fetch(symbol, range).await
            }
            other => other,
        }
    }

    /// Normalize a request against today's market date and serve it.
    ///
    /// An empty vector is returned when the window contains no trading day.
    ///
    /// # Errors
    /// Validation failures from [`request::normalize`] and anything
    /// [`Tickr::history`] returns.
    pub async fn history_request(
        &self,
        symbol: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<PricePoint>, TickrError> {
        self.history_request_at(symbol, from, to, request::market_today())
            .await
    }

    /// [`Tickr::history_request`] with an explicit `today`.
    ///
    /// # Errors
    /// See [`Tickr::history_request`].
    pub async fn history_request_at(
        &self,
        symbol: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Vec<PricePoint>, TickrError> {
        match request::normalize(symbol, from, to, today, &self.cfg.limits)? {
            Some(HistoryQuery { symbol, range }) => self.history(&symbol, range).await,
            None => Ok(Vec::new()),
        }
    }

    /// Seed the cache with points for `symbol`.
    ///
    /// # Errors
    /// Returns `TickrError::InvalidArg` for a blank symbol.
    pub async fn warm(&self, symbol: &str, points: Vec<PricePoint>) -> Result<(), TickrError> {
        self.cache.save(symbol, points).await
    }
}
