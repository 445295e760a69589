//! tickr-core
//!
//! Core types, traits, and utilities shared across the tickr workspace.
//!
//! - `connector`: the `TickrConnector` trait and the `HistoryProvider` capability.
//! - `cache`: the per-symbol range cache (point store + coverage set).
//! - `calendar`: business-day helpers for snapping and enumerating dates.
//!
//! Async runtime (Tokio)
//! ---------------------
//! The range cache guards each symbol with a `tokio::sync::RwLock` and merges
//! producer results on detached `tokio::spawn` tasks, so `RangeCache::get_or_add`
//! must be awaited under a Tokio 1.x runtime.
#![warn(missing_docs)]

/// Per-symbol range cache.
pub mod cache;
/// Business-day helpers.
pub mod calendar;
/// Connector capability traits and the primary `TickrConnector` interface.
pub mod connector;

pub use cache::{CoverageSet, PointStore, RangeCache, SymbolSnapshot};
pub use connector::{HistoryProvider, TickrConnector};
pub use tickr_types::*;
