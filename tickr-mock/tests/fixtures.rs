use chrono::{Datelike, NaiveDate, Weekday};
use tickr_core::{DateRange, TickrError};
use tickr_mock::{MockConnector, TIMEOUT_DELAY};
use tickr_core::connector::TickrConnector;

fn d(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, month, day).unwrap()
}

#[tokio::test]
async fn known_symbol_yields_weekday_bars_in_range() {
    let mock = MockConnector::new();
    let hp = mock.as_history_provider().expect("history provider");
    // 2023-01-02 is a Monday; two full weeks
    let range = DateRange::new(d(1, 2), d(1, 15)).unwrap();
    let got = hp.history("AAPL", range).await.expect("history ok");

    assert_eq!(got.len(), 10);
    assert!(got.iter().all(|p| range.contains_date(p.date)));
    assert!(
        got.iter()
            .all(|p| !matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun))
    );
    assert!(got.windows(2).all(|w| w[0].date < w[1].date));
    assert!(got.iter().all(|p| p.symbol == "AAPL"));
}

#[tokio::test]
async fn overlapping_requests_agree_on_shared_days() {
    let mock = MockConnector::new();
    let hp = mock.as_history_provider().unwrap();
    let a = hp
        .history("MSFT", DateRange::new(d(2, 1), d(2, 20)).unwrap())
        .await
        .unwrap();
    let b = hp
        .history("msft", DateRange::new(d(2, 10), d(2, 28)).unwrap())
        .await
        .unwrap();
    for p in &b {
        if let Some(q) = a.iter().find(|q| q.date == p.date) {
            assert_eq!((p.open, p.close), (q.open, q.close));
        }
    }
}

#[tokio::test]
async fn reserved_symbols_exercise_error_paths() {
    let mock = MockConnector::new();
    let hp = mock.as_history_provider().unwrap();
    let range = DateRange::day(d(1, 3));

    let err = hp.history("FAIL", range).await.unwrap_err();
    assert!(matches!(err, TickrError::Connector { .. }));

    let err = hp.history("NOPE", range).await.unwrap_err();
    assert!(matches!(err, TickrError::NotFound { .. }));
}

#[tokio::test(start_paused = true)]
async fn timeout_symbol_stalls() {
    let mock = MockConnector::new();
    let hp = mock.as_history_provider().unwrap();
    let started = tokio::time::Instant::now();
    let got = hp.history("TIMEOUT", DateRange::day(d(1, 3))).await;
    assert!(started.elapsed() >= TIMEOUT_DELAY);
    assert!(matches!(got, Err(TickrError::NotFound { .. })));
}
