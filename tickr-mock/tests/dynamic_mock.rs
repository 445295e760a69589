use chrono::NaiveDate;
use rust_decimal::Decimal;
use tickr_core::{DateRange, PricePoint, TickrError};
use tickr_mock::{DynamicMockConnector, MockBehavior};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, day).unwrap()
}

fn range() -> DateRange {
    DateRange::new(d(2), d(6)).unwrap()
}

#[tokio::test]
async fn returns_configured_points() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    let points = vec![PricePoint::new("AAPL", d(3), Decimal::ONE, Decimal::TWO)];
    controller
        .set_history_behavior("aapl", MockBehavior::Return(points.clone()))
        .await;

    let hp = mock.as_history_provider().expect("history provider");
    let got = hp.history("AAPL", range()).await.expect("history ok");
    assert_eq!(got, points);
    assert_eq!(controller.history_calls().await, 1);
}

#[tokio::test]
async fn returns_configured_error() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    let err = TickrError::Other("boom".to_string());
    controller
        .set_history_behavior("MSFT", MockBehavior::Fail(err.clone()))
        .await;

    let hp = mock.as_history_provider().expect("history provider");
    let got = hp.history("MSFT", range()).await.expect_err("err");
    assert_eq!(got, err);
}

#[tokio::test]
async fn unknown_symbol_is_not_found() {
    let (mock, _controller) = DynamicMockConnector::new_with_controller("P0");
    let hp = mock.as_history_provider().expect("history provider");
    let err = hp.history("ZZZZ", range()).await.expect_err("err");
    assert!(matches!(err, TickrError::NotFound { .. }));
}

#[tokio::test]
async fn hang_never_resolves() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller.set_history_behavior("TSLA", MockBehavior::Hang).await;
    let hp = mock.as_history_provider().expect("history provider");
    let res = tokio::time::timeout(
        std::time::Duration::from_millis(50),
        hp.history("TSLA", range()),
    )
    .await;
    assert!(res.is_err(), "hang should not complete");
}

#[tokio::test]
async fn logs_requests_and_clears() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    let hp = mock.as_history_provider().expect("history provider");
    let _ = hp.history("aapl", range()).await;
    let _ = hp.history("MSFT", DateRange::day(d(4))).await;

    let reqs = controller.history_requests().await;
    assert_eq!(
        reqs,
        vec![
            ("AAPL".to_string(), range()),
            ("MSFT".to_string(), DateRange::day(d(4))),
        ]
    );

    controller.clear_all_behaviors().await;
    assert_eq!(controller.history_calls().await, 0);
}
