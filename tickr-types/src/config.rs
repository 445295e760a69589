//! Configuration types shared across the orchestrator and the HTTP layer.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// What the orchestrator does when the range cache reports a covered range
/// whose boundary date has no stored point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum BoundaryPolicy {
    /// Treat the lookup failure as a cache miss and fetch the range from the provider.
    #[default]
    Refetch,
    /// Surface `TickrError::BoundaryNotCached` to the caller.
    Fail,
}

impl core::str::FromStr for BoundaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "refetch" => Ok(Self::Refetch),
            "fail" => Ok(Self::Fail),
            other => Err(format!("unknown boundary policy: {other}")),
        }
    }
}

/// Limits applied when normalizing an inbound history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestLimits {
    /// Longest span a single request may cover, in (365.25-day) years.
    pub max_history_years: u32,
    /// Lookback used when the request omits a start date.
    pub default_lookback_years: u32,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_history_years: 4,
            default_lookback_years: 1,
        }
    }
}

/// Global configuration for the `Tickr` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickrConfig {
    /// Timeout applied to each upstream history call.
    pub provider_timeout: Duration,
    /// Handling of covered ranges whose boundary point is missing.
    pub boundary_policy: BoundaryPolicy,
    /// Request normalization limits.
    pub limits: RequestLimits,
}

impl Default for TickrConfig {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_secs(10),
            boundary_policy: BoundaryPolicy::Refetch,
            limits: RequestLimits::default(),
        }
    }
}
