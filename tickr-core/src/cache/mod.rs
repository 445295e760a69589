//! Per-symbol range cache.
//!
//! Each symbol owns a [`PointStore`] holding the fetched price points and a
//! [`CoverageSet`] recording which date intervals those points fully cover.
//! A request that falls entirely inside one covered interval is served from
//! memory; anything else (including a partial overlap) goes to the producer
//! supplied with the call, and the producer's result is merged back on a
//! detached task.
//!
//! Concurrency
//! -----------
//! Symbols are held behind their own `tokio::sync::RwLock`, so reads and
//! merges on one symbol are serialized while different symbols proceed in
//! parallel. The hit check and the slice run under a single read guard.
//!
//! There is no request coalescing: two concurrent misses for the same symbol
//! both invoke their producers.

mod coverage;
mod points;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Notify, RwLock};

pub use coverage::CoverageSet;
pub use points::PointStore;

use crate::{DateRange, PricePoint, TickrError};

#[derive(Debug, Default)]
struct SymbolCache {
    points: PointStore,
    coverage: CoverageSet,
}

/// Point-in-time copy of one symbol's cache state.
#[derive(Debug, Clone, Default)]
pub struct SymbolSnapshot {
    /// Stored points, ascending by date.
    pub points: Vec<PricePoint>,
    /// Covered intervals, ascending and disjoint.
    pub coverage: Vec<DateRange>,
}

#[derive(Default)]
struct PendingMerges {
    count: AtomicUsize,
    idle: Notify,
}

// Decrements the in-flight counter even if the merge task panics.
struct MergeGuard(Arc<PendingMerges>);

impl MergeGuard {
    fn enter(pending: &Arc<PendingMerges>) -> Self {
        pending.count.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(pending))
    }
}

impl Drop for MergeGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

#[derive(Default)]
struct Inner {
    symbols: RwLock<HashMap<String, Arc<RwLock<SymbolCache>>>>,
    pending: Arc<PendingMerges>,
}

/// Process-wide cache of daily price history, keyed by symbol.
///
/// Cloning is cheap and yields a handle to the same shared state.
#[derive(Clone, Default)]
pub struct RangeCache {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for RangeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangeCache")
            .field("pending_merges", &self.pending_merges())
            .finish_non_exhaustive()
    }
}

/// Cache key for a symbol: trimmed and upper-cased, matching the
/// case-insensitive identity of [`PricePoint`].
fn symbol_key(symbol: &str) -> Result<String, TickrError> {
    let key = symbol.trim();
    if key.is_empty() {
        return Err(TickrError::InvalidArg("symbol must not be empty".into()));
    }
    Ok(key.to_ascii_uppercase())
}

impl RangeCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `range` for `symbol` from memory, or fetch it with `producer`.
    ///
    /// On a hit the points dated `range.start()..=range.end()` are returned
    /// newest first and `producer` is never called. On a miss `producer` is
    /// awaited and its output is returned exactly as produced; a non-empty
    /// result is then merged into the cache on a detached task that outlives
    /// the caller.
    ///
    /// # Errors
    /// - `TickrError::InvalidArg` for a blank symbol.
    /// - `TickrError::BoundaryNotCached` when a covering interval exists but
    ///   the point for `range.start()` or `range.end()` is missing.
    /// - Any error returned by `producer`, unchanged; nothing is merged.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tickr::cache::get_or_add",
            skip_all,
            fields(symbol = %symbol, range = %range),
        )
    )]
    pub async fn get_or_add<F, Fut>(
        &self,
        symbol: &str,
        range: DateRange,
        producer: F,
    ) -> Result<Vec<PricePoint>, TickrError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<PricePoint>, TickrError>>,
    {
        let key = symbol_key(symbol)?;

        if let Some(hit) = self.lookup(&key, range).await {
            #[cfg(feature = "tracing")]
            log_hit(&hit);
            return hit;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("range cache miss; invoking producer");

        let points = producer().await?;
        if !points.is_empty() {
            self.spawn_merge(key, points.clone());
        }
        Ok(points)
    }

    /// Merge `data` into the cache for `symbol`.
    ///
    /// Points whose date is already stored are skipped. The interval from the
    /// earliest to the latest incoming date is added to the coverage set and
    /// coalesced with its neighbours. Empty input changes nothing.
    ///
    /// # Errors
    /// Returns `TickrError::InvalidArg` for a blank symbol.
    pub async fn save(&self, symbol: &str, data: Vec<PricePoint>) -> Result<(), TickrError> {
        let key = symbol_key(symbol)?;
        self.inner.merge(&key, data).await;
        Ok(())
    }

    /// Copy of the cached state for `symbol`, or `None` if nothing was saved.
    pub async fn snapshot(&self, symbol: &str) -> Option<SymbolSnapshot> {
        let key = symbol_key(symbol).ok()?;
        let entry = self.inner.symbols.read().await.get(&key).cloned()?;
        let guard = entry.read().await;
        Some(SymbolSnapshot {
            points: guard.points.iter().cloned().collect(),
            coverage: guard.coverage.intervals().to_vec(),
        })
    }

    /// Number of symbols with cached state.
    pub async fn symbol_count(&self) -> usize {
        self.inner.symbols.read().await.len()
    }

    /// Number of background merges that have not finished yet.
    #[must_use]
    pub fn pending_merges(&self) -> usize {
        self.inner.pending.count.load(Ordering::SeqCst)
    }

    /// Wait until every background merge spawned so far has completed.
    pub async fn settle(&self) {
        let pending = &self.inner.pending;
        loop {
            let notified = pending.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if pending.count.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    async fn lookup(
        &self,
        key: &str,
        range: DateRange,
    ) -> Option<Result<Vec<PricePoint>, TickrError>> {
        let entry = self.inner.symbols.read().await.get(key).cloned()?;
        let guard = entry.read().await;
        guard.coverage.covering(&range)?;
        Some(guard.points.slice_desc(key, range))
    }

    fn spawn_merge(&self, key: String, points: Vec<PricePoint>) {
        let inner = Arc::clone(&self.inner);
        let guard = MergeGuard::enter(&inner.pending);
        tokio::spawn(async move {
            let _guard = guard;
            inner.merge(&key, points).await;
        });
    }
}

#[cfg(feature = "tracing")]
fn log_hit(hit: &Result<Vec<PricePoint>, TickrError>) {
    match hit {
        Ok(points) => tracing::debug!(points = points.len(), "range cache hit"),
        Err(e) => tracing::warn!(error = %e, "covered range is missing a boundary point"),
    }
}

impl Inner {
    async fn entry(&self, key: &str) -> Arc<RwLock<SymbolCache>> {
        if let Some(existing) = self.symbols.read().await.get(key) {
            return Arc::clone(existing);
        }
        let mut map = self.symbols.write().await;
        Arc::clone(map.entry(key.to_string()).or_default())
    }

    async fn merge(&self, key: &str, data: Vec<PricePoint>) {
        let (Some(first), Some(last)) = (
            data.iter().map(|p| p.date).min(),
            data.iter().map(|p| p.date).max(),
        ) else {
            return;
        };
        let span = DateRange::day(first).span(&DateRange::day(last));

        let entry = self.entry(key).await;
        let mut guard = entry.write().await;
        let added = guard.points.merge(data);
        guard.coverage.insert(span);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            symbol = %key,
            range = %span,
            points_added = added,
            points_total = guard.points.len(),
            coverage_intervals = guard.coverage.len(),
            "merged points into range cache"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = added;
    }
}
