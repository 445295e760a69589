//! Normalization of inbound history requests.
//!
//! Turns a symbol plus optional start/end dates into a validated
//! [`HistoryQuery`]: defaults are filled in, the span is bounded by
//! [`RequestLimits`], and weekend endpoints are moved onto the adjacent
//! trading day.

use chrono::{Months, NaiveDate, Utc};
use chrono_tz::America::New_York;
use tickr_core::calendar::{snap_end, snap_start};
use tickr_core::{DateRange, RequestLimits, TickrError};

const DAYS_IN_YEAR: f64 = 365.25;

/// A validated history request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    /// Trimmed symbol as supplied by the caller.
    pub symbol: String,
    /// Business-day adjusted range.
    pub range: DateRange,
}

/// Current calendar date at the US equity market (New York).
#[must_use]
pub fn market_today() -> NaiveDate {
    Utc::now().with_timezone(&New_York).date_naive()
}

fn years(n: u32) -> Months {
    Months::new(n.saturating_mul(12))
}

fn invalid(msg: impl Into<String>) -> TickrError {
    TickrError::InvalidArg(msg.into())
}

/// Validate and complete a history request relative to `today`.
///
/// Defaults: with neither bound the window is the last
/// `default_lookback_years` ending today; with only `to` the window starts
/// `default_lookback_years` earlier; with only `from` the window ends today,
/// or `max_history_years` after `from` when `from` is older than that.
///
/// Returns `Ok(None)` when the window holds no trading day, e.g. a request
/// for a single Saturday and Sunday.
///
/// # Errors
/// Returns `TickrError::InvalidArg` for a blank symbol, a span longer than
/// `max_history_years`, or `from` after `to`.
pub fn normalize(
    symbol: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
    limits: &RequestLimits,
) -> Result<Option<HistoryQuery>, TickrError> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Err(invalid("Ticker cannot be empty"));
    }

    let max_years = limits.max_history_years;
    let max_days = f64::from(max_years) * DAYS_IN_YEAR;
    let lookback = years(limits.default_lookback_years);

    let (from, to) = match (from, to) {
        (Some(from), Some(to)) => (from, to),
        (None, to) => {
            let to = to.unwrap_or(today);
            (to.checked_sub_months(lookback).unwrap_or(NaiveDate::MIN), to)
        }
        (Some(from), None) => {
            let age = (today - from).num_days() as f64;
            let to = if age > max_days {
                from.checked_add_months(years(max_years)).unwrap_or(today)
            } else {
                today
            };
            (from, to)
        }
    };

    if (to - from).num_days() as f64 > max_days {
        return Err(invalid(format!(
            "Max date range to pull is {max_years} years"
        )));
    }
    if from > to {
        return Err(invalid("From date must be earlier than the to date"));
    }

    let (from, to) = (snap_start(from), snap_end(to));
    if from > to {
        return Ok(None);
    }
    Ok(Some(HistoryQuery {
        symbol: symbol.to_string(),
        range: DateRange::new(from, to)?,
    }))
}
