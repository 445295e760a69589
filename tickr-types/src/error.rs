use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the tickr workspace.
///
/// This wraps argument validation errors, provider-tagged failures, not-found
/// conditions, timeouts, and the cache's boundary lookup failure.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TickrError {
    /// Issues with the returned or expected data (missing fields, bad payloads, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A resource or symbol could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "history for AAPL".
        what: String,
    },

    /// A provider call exceeded the configured timeout.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Capability label (e.g. "history").
        capability: String,
    },

    /// The coverage set reports a range as cached but the point dated at one of
    /// the requested boundaries is absent from the point store.
    #[error("requested boundary date {date} absent from cache for {symbol}")]
    BoundaryNotCached {
        /// Symbol whose cache was queried.
        symbol: String,
        /// The boundary date that has no stored point.
        date: NaiveDate,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl TickrError {
    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// Helper: build a `BoundaryNotCached` error.
    pub fn boundary_not_cached(symbol: impl Into<String>, date: NaiveDate) -> Self {
        Self::BoundaryNotCached {
            symbol: symbol.into(),
            date,
        }
    }

    /// Returns true if this error should be surfaced to users as actionable.
    ///
    /// A benign not-found is not actionable; neither is a boundary miss, which
    /// callers can recover from by fetching the range again.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !matches!(
            self,
            Self::NotFound { .. } | Self::BoundaryNotCached { .. }
        )
    }
}
