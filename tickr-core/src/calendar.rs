use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::DateRange;

/// True for Saturday and Sunday.
#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Move a range start that falls on a weekend forward to the next Monday.
#[must_use]
pub fn snap_start(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date.checked_add_days(Days::new(2)).unwrap_or(date),
        Weekday::Sun => date.checked_add_days(Days::new(1)).unwrap_or(date),
        _ => date,
    }
}

/// Move a range end that falls on a weekend back to the previous Friday.
#[must_use]
pub fn snap_end(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date.checked_sub_days(Days::new(1)).unwrap_or(date),
        Weekday::Sun => date.checked_sub_days(Days::new(2)).unwrap_or(date),
        _ => date,
    }
}

/// Weekdays within `range`, ascending. Exchange holidays are not modelled.
pub fn business_days(range: DateRange) -> impl Iterator<Item = NaiveDate> {
    range
        .start()
        .iter_days()
        .take_while(move |d| *d <= range.end())
        .filter(|d| !is_weekend(*d))
}
