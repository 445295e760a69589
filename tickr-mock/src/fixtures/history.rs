use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tickr_core::calendar::business_days;
use tickr_core::{DateRange, PricePoint};

/// Base price in cents for each symbol the mock knows about.
fn base_cents(s: &str) -> Option<i64> {
    match s {
        "AAPL" => Some(14_000),
        "MSFT" => Some(24_000),
        "GOOG" => Some(10_000),
        "TSLA" => Some(30_000),
        _ => None,
    }
}

/// Deterministic daily bars for every weekday in `range`, ascending.
///
/// Prices are a pure function of the symbol and the date, so overlapping
/// requests agree on every shared day.
pub fn by_symbol(s: &str, range: DateRange) -> Option<Vec<PricePoint>> {
    let base = base_cents(s)?;
    Some(
        business_days(range)
            .map(|date| bar(s, base, date))
            .collect(),
    )
}

fn bar(s: &str, base: i64, date: NaiveDate) -> PricePoint {
    // wobble within +/- 5 dollars, with open and close a day's step apart
    let step = i64::from(date.num_days_from_ce() % 11) - 5;
    let open = base + step * 100;
    let close = open + (step % 3) * 50;
    PricePoint::new(s, date, Decimal::new(open, 2), Decimal::new(close, 2))
}
