use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Days, Local, NaiveDate};
use rust_decimal::Decimal;
use tickr_core::{DateRange, PricePoint, RangeCache, TickrError};

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn ago(days: u64) -> NaiveDate {
    today().checked_sub_days(Days::new(days)).unwrap()
}

fn range(from: NaiveDate, to: NaiveDate) -> DateRange {
    DateRange::new(from, to).unwrap()
}

fn pt(symbol: &str, date: NaiveDate) -> PricePoint {
    PricePoint::new(symbol, date, Decimal::new(100, 0), Decimal::new(105, 0))
}

fn series(symbol: &str, days_ago: &[u64]) -> Vec<PricePoint> {
    days_ago.iter().map(|d| pt(symbol, ago(*d))).collect()
}

fn dates(points: &[PricePoint]) -> Vec<NaiveDate> {
    points.iter().map(|p| p.date).collect()
}

async fn unreachable_producer() -> Result<Vec<PricePoint>, TickrError> {
    panic!("producer must not be called on a cache hit")
}

#[tokio::test]
async fn cold_miss_returns_producer_result_exactly() {
    let cache = RangeCache::new();
    let calls = AtomicUsize::new(0);
    let produced = series("AAPL", &[3, 1, 2]);
    let expected = produced.clone();

    let out = cache
        .get_or_add("AAPL", range(ago(3), ago(1)), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(produced)
        })
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    // native producer order, not re-sorted
    assert_eq!(dates(&out), dates(&expected));
}

#[tokio::test]
async fn saved_range_suppresses_producer() {
    let cache = RangeCache::new();
    cache.save("MSFT", series("MSFT", &[3, 2, 1])).await.unwrap();

    let out = cache
        .get_or_add("MSFT", range(ago(3), ago(2)), unreachable_producer)
        .await
        .unwrap();
    assert_eq!(dates(&out), vec![ago(2), ago(3)]);
}

#[tokio::test]
async fn overlapping_saves_coalesce_and_serve_descending_hit() {
    let cache = RangeCache::new();
    cache.save("TSLA", series("TSLA", &[1, 2, 3])).await.unwrap();
    cache.save("TSLA", series("TSLA", &[3, 4, 5])).await.unwrap();

    let snap = cache.snapshot("TSLA").await.unwrap();
    assert_eq!(snap.coverage, vec![range(ago(5), ago(1))]);
    assert_eq!(snap.points.len(), 5);

    let calls = AtomicUsize::new(0);
    let out = cache
        .get_or_add("TSLA", range(ago(4), ago(2)), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        })
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(dates(&out), vec![ago(2), ago(3), ago(4)]);
}

#[tokio::test]
async fn miss_result_is_merged_for_later_hits() {
    let cache = RangeCache::new();
    let r = range(ago(10), ago(8));

    let first = cache
        .get_or_add("AAPL", r, || async { Ok(series("AAPL", &[10, 9, 8])) })
        .await
        .unwrap();
    assert_eq!(dates(&first), vec![ago(10), ago(9), ago(8)]);

    cache.settle().await;
    assert_eq!(cache.pending_merges(), 0);

    let second = cache.get_or_add("AAPL", r, unreachable_producer).await.unwrap();
    assert_eq!(dates(&second), vec![ago(8), ago(9), ago(10)]);
}

#[tokio::test]
async fn duplicate_dates_are_stored_once() {
    let cache = RangeCache::new();
    cache.save("AAPL", series("AAPL", &[2, 1])).await.unwrap();
    let mut dup = pt("aapl", ago(1));
    dup.close = Decimal::new(999, 0);
    cache.save("AAPL", vec![dup]).await.unwrap();

    let snap = cache.snapshot("AAPL").await.unwrap();
    assert_eq!(snap.points.len(), 2);
    let kept = snap.points.iter().find(|p| p.date == ago(1)).unwrap();
    assert_eq!(kept.close, Decimal::new(105, 0));
}

#[tokio::test]
async fn empty_save_changes_nothing() {
    let cache = RangeCache::new();
    cache.save("AAPL", Vec::new()).await.unwrap();
    assert!(cache.snapshot("AAPL").await.is_none());
    assert_eq!(cache.symbol_count().await, 0);

    cache.save("AAPL", series("AAPL", &[2, 1])).await.unwrap();
    let before = cache.snapshot("AAPL").await.unwrap();
    cache.save("AAPL", Vec::new()).await.unwrap();
    let after = cache.snapshot("AAPL").await.unwrap();
    assert_eq!(before.points, after.points);
    assert_eq!(before.coverage, after.coverage);
}

#[tokio::test]
async fn empty_producer_result_is_returned_and_not_cached() {
    let cache = RangeCache::new();
    let out = cache
        .get_or_add("AAPL", range(ago(5), ago(4)), || async { Ok(Vec::new()) })
        .await
        .unwrap();
    assert!(out.is_empty());
    assert_eq!(cache.pending_merges(), 0);
    assert!(cache.snapshot("AAPL").await.is_none());
}

#[tokio::test]
async fn symbols_are_isolated() {
    let cache = RangeCache::new();
    cache.save("AAPL", series("AAPL", &[3, 2, 1])).await.unwrap();

    let calls = AtomicUsize::new(0);
    let out = cache
        .get_or_add("MSFT", range(ago(3), ago(1)), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(series("MSFT", &[3]))
        })
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(out.len(), 1);
    assert!(out.iter().all(|p| p.symbol == "MSFT"));
}

#[tokio::test]
async fn symbol_lookup_ignores_case_and_whitespace() {
    let cache = RangeCache::new();
    cache.save("tsla", series("tsla", &[2, 1])).await.unwrap();
    let out = cache
        .get_or_add(" TSLA ", range(ago(2), ago(1)), unreachable_producer)
        .await
        .unwrap();
    assert_eq!(out.len(), 2);
}

#[tokio::test]
async fn blank_symbol_is_rejected() {
    let cache = RangeCache::new();
    let err = cache
        .get_or_add("  ", range(ago(2), ago(1)), unreachable_producer)
        .await
        .unwrap_err();
    assert!(matches!(err, TickrError::InvalidArg(_)));
    assert!(matches!(
        cache.save("", series("X", &[1])).await,
        Err(TickrError::InvalidArg(_))
    ));
}

#[tokio::test]
async fn partial_overlap_is_a_full_miss() {
    let cache = RangeCache::new();
    cache.save("AAPL", series("AAPL", &[5, 4, 3])).await.unwrap();

    let calls = AtomicUsize::new(0);
    let out = cache
        .get_or_add("AAPL", range(ago(4), ago(1)), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(series("AAPL", &[4, 3, 2, 1]))
        })
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(out.len(), 4);

    cache.settle().await;
    let snap = cache.snapshot("AAPL").await.unwrap();
    assert_eq!(snap.coverage, vec![range(ago(5), ago(1))]);
}

#[tokio::test]
async fn covered_range_with_missing_boundary_reports_typed_error() {
    let cache = RangeCache::new();
    // gap at 2 days ago, but coverage spans 3..=1
    cache.save("AAPL", series("AAPL", &[3, 1])).await.unwrap();

    let err = cache
        .get_or_add("AAPL", range(ago(3), ago(2)), unreachable_producer)
        .await
        .unwrap_err();
    assert_eq!(err, TickrError::boundary_not_cached("AAPL", ago(2)));
    assert!(!err.is_actionable());
}

#[tokio::test]
async fn producer_error_propagates_and_nothing_is_merged() {
    let cache = RangeCache::new();
    let err = cache
        .get_or_add("AAPL", range(ago(3), ago(1)), || async {
            Err(TickrError::connector("mock", "upstream down"))
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TickrError::Connector { .. }));
    assert_eq!(cache.pending_merges(), 0);
    assert!(cache.snapshot("AAPL").await.is_none());
}

#[tokio::test]
async fn merge_completes_after_caller_handle_is_dropped() {
    let cache = RangeCache::new();
    let caller = cache.clone();
    let task = tokio::spawn(async move {
        caller
            .get_or_add("AAPL", range(ago(3), ago(1)), || async {
                Ok(series("AAPL", &[3, 2, 1]))
            })
            .await
    });
    let out = task.await.unwrap().unwrap();
    assert_eq!(out.len(), 3);

    cache.settle().await;
    let snap = cache.snapshot("AAPL").await.unwrap();
    assert_eq!(snap.points.len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_on_one_symbol_coalesce() {
    let cache = RangeCache::new();
    let mut handles = Vec::new();
    for chunk in 0..20u64 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            let start = chunk * 3 + 1;
            let days: Vec<u64> = (start..start + 3).collect();
            cache.save("AAPL", series("AAPL", &days)).await.unwrap();
        }));
    }
    for h in futures::future::join_all(handles).await {
        h.unwrap();
    }

    let snap = cache.snapshot("AAPL").await.unwrap();
    assert_eq!(snap.points.len(), 60);
    assert_eq!(snap.coverage, vec![range(ago(60), ago(1))]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_misses_all_invoke_producer_and_settle() {
    let cache = RangeCache::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::new();
    for symbol in ["AAPL", "MSFT", "TSLA", "AAPL", "MSFT", "TSLA"] {
        let cache = cache.clone();
        let calls = Arc::clone(&calls);
        handles.push(tokio::spawn(async move {
            cache
                .get_or_add(symbol, range(ago(3), ago(1)), || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                    Ok(series(symbol, &[3, 2, 1]))
                })
                .await
        }));
    }
    for h in futures::future::join_all(handles).await {
        let out = h.unwrap().unwrap();
        assert_eq!(out.len(), 3);
    }
    // Misses may overlap; each one that missed went to its producer.
    assert!(calls.load(Ordering::SeqCst) >= 3);

    cache.settle().await;
    assert_eq!(cache.symbol_count().await, 3);
    for symbol in ["AAPL", "MSFT", "TSLA"] {
        let snap = cache.snapshot(symbol).await.unwrap();
        assert_eq!(snap.points.len(), 3);
        assert_eq!(snap.coverage.len(), 1);
    }
}

#[tokio::test]
async fn settle_returns_immediately_when_idle() {
    let cache = RangeCache::new();
    tokio::time::timeout(std::time::Duration::from_secs(1), cache.settle())
        .await
        .unwrap();
}
