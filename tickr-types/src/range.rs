//! Closed calendar date interval.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::TickrError;

/// Closed date interval `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting inverted bounds.
    ///
    /// # Errors
    /// Returns `TickrError::InvalidArg` when `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TickrError> {
        if start > end {
            return Err(TickrError::InvalidArg(format!(
                "range start {start} is after range end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Range covering a single day.
    #[must_use]
    pub const fn day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// First day of the range (inclusive).
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the range, counting both ends.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// True if `date` lies within the range.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// True if `other` lies entirely within this range.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True if the two ranges share a day or sit on consecutive days.
    #[must_use]
    pub fn touches(&self, other: &Self) -> bool {
        let after_self = self.end.succ_opt().unwrap_or(self.end);
        let after_other = other.end.succ_opt().unwrap_or(other.end);
        other.start <= after_self && self.start <= after_other
    }

    /// Smallest range covering both inputs.
    #[must_use]
    pub fn span(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[derive(Deserialize)]
struct RawRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawRange> for DateRange {
    type Error = TickrError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
