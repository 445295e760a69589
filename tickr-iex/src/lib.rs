//! tickr-iex
//!
//! Connector that implements `TickrConnector` on top of the IEX Cloud
//! `HISTORICAL_PRICES` dataset. One request is issued per history call:
//!
//! `GET {base}/data/CORE/HISTORICAL_PRICES/{symbol}?from=YYYY-MM-DD&to=YYYY-MM-DD&token=...`
//!
//! The response is a JSON array of daily rows; fields other than `symbol`,
//! `priceDate`, `open` and `close` are ignored.
#![warn(missing_docs)]

mod config;

pub use config::{DEFAULT_BASE_URL, IexConfig};

use async_trait::async_trait;
use reqwest::StatusCode;
use tickr_core::connector::{ConnectorKey, HistoryProvider, TickrConnector};
use tickr_core::{DateRange, PricePoint, TickrError};
use url::Url;

const DATE_FMT: &str = "%Y-%m-%d";

/// IEX Cloud connector.
#[derive(Clone)]
pub struct IexConnector {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for IexConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IexConnector")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl IexConnector {
    /// Static connector key used in logs and error tags.
    pub const KEY: ConnectorKey = ConnectorKey::new("tickr-iex");

    /// Build a connector with its own HTTP client.
    ///
    /// # Errors
    /// Returns `TickrError::InvalidArg` if the base URL does not parse and
    /// `TickrError::Other` if the HTTP client cannot be constructed.
    pub fn new(config: IexConfig) -> Result<Self, TickrError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TickrError::Other(format!("failed to build HTTP client: {e}")))?;
        Self::with_client(http, config)
    }

    /// Build a connector around an existing `reqwest::Client`.
    ///
    /// The client's own timeout settings apply; `config.timeout` is ignored.
    ///
    /// # Errors
    /// Returns `TickrError::InvalidArg` if the base URL does not parse.
    pub fn with_client(http: reqwest::Client, config: IexConfig) -> Result<Self, TickrError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| TickrError::InvalidArg(format!("invalid IEX base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TickrError::InvalidArg(format!(
                "invalid IEX base URL: {base_url}"
            )));
        }
        Ok(Self {
            http,
            base_url,
            token: config.token,
        })
    }

    /// URL for the historical prices of `symbol` over `range`.
    #[must_use]
    pub fn history_url(&self, symbol: &str, range: DateRange) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["data", "CORE", "HISTORICAL_PRICES", symbol]);
        }
        url.query_pairs_mut()
            .append_pair("from", &range.start().format(DATE_FMT).to_string())
            .append_pair("to", &range.end().format(DATE_FMT).to_string())
            .append_pair("token", &self.token);
        url
    }

    fn transport_error(e: reqwest::Error) -> TickrError {
        if e.is_timeout() {
            TickrError::provider_timeout(Self::KEY.as_str(), "history")
        } else {
            TickrError::connector(Self::KEY.as_str(), format!("request failed: {}", e.without_url()))
        }
    }

    fn decode(symbol: &str, body: &[u8]) -> Result<Vec<PricePoint>, TickrError> {
        let mut points: Vec<PricePoint> = serde_json::from_slice(body).map_err(|e| {
            TickrError::Data(format!("malformed historical prices for {symbol}: {e}"))
        })?;
        for p in &mut points {
            if p.symbol.is_empty() {
                p.symbol = symbol.to_string();
            }
        }
        Ok(points)
    }
}

impl TickrConnector for IexConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "IEX Cloud"
    }

    fn as_history_provider(&self) -> Option<&dyn HistoryProvider> {
        Some(self as &dyn HistoryProvider)
    }
}

#[async_trait]
impl HistoryProvider for IexConnector {
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "tickr_iex::history",
            skip_all,
            fields(symbol = %symbol, range = %range),
        )
    )]
    async fn history(&self, symbol: &str, range: DateRange) -> Result<Vec<PricePoint>, TickrError> {
        let url = self.history_url(symbol, range);
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(TickrError::not_found(format!("history for {symbol}")));
        }
        if !status.is_success() {
            #[cfg(feature = "tracing")]
            tracing::warn!(%status, "upstream returned non-success status");
            return Err(TickrError::connector(
                Self::KEY.as_str(),
                format!("HTTP {status} for {symbol}"),
            ));
        }

        let body = resp.bytes().await.map_err(Self::transport_error)?;
        let points = Self::decode(symbol, &body)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(points = points.len(), "fetched historical prices");

        Ok(points)
    }
}
