//! Daily price point for a single symbol.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One day of open/close prices for a symbol.
///
/// Two points are equal when they share a calendar date and their symbols match
/// case-insensitively; prices do not participate in identity. Series of points
/// are ordered by [`PricePoint::date`] ascending.
#[derive(Debug, Clone)]
pub struct PricePoint {
    /// Ticker symbol as reported by the provider.
    pub symbol: String,
    /// Trading date; any time-of-day component is discarded on ingestion.
    pub date: NaiveDate,
    /// Opening price.
    pub open: Decimal,
    /// Closing price.
    pub close: Decimal,
}

impl PricePoint {
    /// Build a point from its parts.
    pub fn new(symbol: impl Into<String>, date: NaiveDate, open: Decimal, close: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            open,
            close,
        }
    }

    /// Percentage change from open to close, `(close - open) / open * 100`.
    ///
    /// Returns `None` when `open` is zero.
    #[must_use]
    pub fn daily_return(&self) -> Option<Decimal> {
        (self.close - self.open)
            .checked_div(self.open)
            .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
    }

    /// True if both points describe the same symbol on the same date.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.date == other.date && self.symbol.eq_ignore_ascii_case(&other.symbol)
    }
}

impl PartialEq for PricePoint {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity(other)
    }
}

impl Eq for PricePoint {}

impl Hash for PricePoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.date.hash(state);
        for b in self.symbol.bytes() {
            state.write_u8(b.to_ascii_uppercase());
        }
    }
}

impl Serialize for PricePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PricePoint", 5)?;
        s.serialize_field("symbol", &self.symbol)?;
        s.serialize_field("priceDate", &self.date)?;
        s.serialize_field("open", &self.open.to_f64())?;
        s.serialize_field("close", &self.close.to_f64())?;
        s.serialize_field("dailyReturn", &self.daily_return().and_then(|r| r.to_f64()))?;
        s.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDate {
    Text(String),
    EpochMillis(i64),
}

fn parse_date<E: serde::de::Error>(raw: RawDate) -> Result<NaiveDate, E> {
    match raw {
        RawDate::Text(s) => {
            let s = s.trim();
            if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Ok(d);
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt.date_naive());
            }
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|dt| dt.date())
                .map_err(|_| E::custom(format!("unrecognized price date: {s}")))
        }
        RawDate::EpochMillis(ms) => DateTime::from_timestamp_millis(ms)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| E::custom(format!("price date out of range: {ms}"))),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePoint {
    #[serde(default)]
    symbol: String,
    price_date: RawDate,
    open: Decimal,
    close: Decimal,
}

impl<'de> Deserialize<'de> for PricePoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let w = WirePoint::deserialize(deserializer)?;
        let date = parse_date::<D::Error>(w.price_date)?;
        Ok(Self {
            symbol: w.symbol,
            date,
            open: w.open,
            close: w.close,
        })
    }
}
