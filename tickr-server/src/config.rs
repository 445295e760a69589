use std::env;
use std::time::Duration;

use tickr::{BoundaryPolicy, TickrConfig};
use tickr_iex::DEFAULT_BASE_URL;

use crate::error::StartupError;

/// Server configuration derived from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub provider_timeout: Duration,
    pub boundary_policy: BoundaryPolicy,
    /// Serve fixture data instead of calling IEX.
    pub use_mock: bool,
    /// IEX token; required unless `use_mock` is set.
    pub iex_token: Option<String>,
    pub iex_base_url: String,
}

fn str_or(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    lookup(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn opt_str(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parsed_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, StartupError> {
    match opt_str(lookup, name) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| StartupError::Config {
            var: name,
            msg: format!("cannot parse {raw:?}"),
        }),
    }
}

fn bool_or(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool {
    opt_str(lookup, name)
        .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes" | "y" | "on"))
        .unwrap_or(default)
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StartupError> {
        let defaults = TickrConfig::default();
        let timeout_ms = parsed_or(
            &lookup,
            "TICKR_PROVIDER_TIMEOUT_MS",
            u64::try_from(defaults.provider_timeout.as_millis()).unwrap_or(u64::MAX),
        )?;
        let cfg = Self {
            bind: str_or(&lookup, "TICKR_BIND", "0.0.0.0"),
            port: parsed_or(&lookup, "TICKR_PORT", 8080)?,
            provider_timeout: Duration::from_millis(timeout_ms),
            boundary_policy: parsed_or(&lookup, "TICKR_BOUNDARY_POLICY", defaults.boundary_policy)?,
            use_mock: bool_or(&lookup, "TICKR_USE_MOCK", false),
            iex_token: opt_str(&lookup, "IEX_TOKEN"),
            iex_base_url: str_or(&lookup, "IEX_BASE_URL", DEFAULT_BASE_URL),
        };
        if !cfg.use_mock && cfg.iex_token.is_none() {
            return Err(StartupError::Config {
                var: "IEX_TOKEN",
                msg: "required unless TICKR_USE_MOCK is enabled".into(),
            });
        }
        Ok(cfg)
    }

    /// Orchestrator settings derived from this configuration.
    #[must_use]
    pub fn tickr_config(&self) -> TickrConfig {
        TickrConfig {
            provider_timeout: self.provider_timeout,
            boundary_policy: self.boundary_policy,
            ..TickrConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_apply_in_mock_mode() {
        let cfg = ServerConfig::from_lookup(lookup(&[("TICKR_USE_MOCK", "true")])).unwrap();
        assert_eq!(cfg.bind, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.provider_timeout, Duration::from_secs(10));
        assert_eq!(cfg.boundary_policy, BoundaryPolicy::Refetch);
        assert_eq!(cfg.iex_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn overrides_are_read() {
        let cfg = ServerConfig::from_lookup(lookup(&[
            ("TICKR_BIND", "127.0.0.1"),
            ("TICKR_PORT", " 9090 "),
            ("TICKR_PROVIDER_TIMEOUT_MS", "250"),
            ("TICKR_BOUNDARY_POLICY", "FAIL"),
            ("IEX_TOKEN", "pk_live"),
            ("IEX_BASE_URL", "http://localhost:1234/v1"),
        ]))
        .unwrap();
        assert_eq!(cfg.bind, "127.0.0.1");
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.provider_timeout, Duration::from_millis(250));
        assert_eq!(cfg.boundary_policy, BoundaryPolicy::Fail);
        assert!(!cfg.use_mock);
        assert_eq!(cfg.iex_token.as_deref(), Some("pk_live"));
        assert_eq!(cfg.tickr_config().boundary_policy, BoundaryPolicy::Fail);
    }

    #[test]
    fn token_is_required_without_mock() {
        let err = ServerConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, StartupError::Config { var: "IEX_TOKEN", .. }));
    }

    #[test]
    fn bad_numbers_are_reported() {
        let err = ServerConfig::from_lookup(lookup(&[
            ("TICKR_USE_MOCK", "1"),
            ("TICKR_PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, StartupError::Config { var: "TICKR_PORT", .. }));
    }
}
