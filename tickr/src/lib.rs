//! tickr serves daily stock price history through a per-symbol range cache.
//!
//! Overview
//! - A single upstream connector implementing the `tickr_core` contracts
//!   supplies history on a cache miss.
//! - Requests that fall entirely within an already fetched interval are
//!   answered from memory, newest first, without touching the upstream.
//! - Misses are returned in the provider's order as soon as the upstream
//!   responds; merging into the cache happens on a detached task.
//! - Inbound requests are normalized by [`request::normalize`]: default
//!   windows, a maximum span, and weekend endpoints snapped to trading days.
//!
//! Building an orchestrator:
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tickr::{BoundaryPolicy, Tickr};
//!
//! let tickr = Tickr::builder()
//!     .with_connector(Arc::new(tickr_mock::MockConnector::new()))
//!     .provider_timeout(Duration::from_secs(5))
//!     .boundary_policy(BoundaryPolicy::Refetch)
//!     .build()?;
//!
//! let points = tickr.history_request("AAPL", None, None).await?;
//! ```
#![warn(missing_docs)]

mod core;
/// Inbound request normalization.
pub mod request;

pub use crate::core::{Tickr, TickrBuilder};
pub use request::{HistoryQuery, market_today, normalize};
pub use tickr_core::*;
