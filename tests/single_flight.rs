mod support;

use std::time::Duration;

use ltcx_rs::error::{Error, UpstreamError};
use ltcx_rs::market_data::sort::SortCriterion;

use support::{default_tickers, harness_with, FakeTickers};

#[tokio::test(start_paused = true)]
async fn concurrent_identical_requests_fetch_once() {
    let h = harness_with(FakeTickers::new(default_tickers()).with_delay(Duration::from_millis(500)), None);

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = h.service.clone();
            tokio::spawn(async move { service.snapshot(None, true).await })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(h.tickers.calls(), 1);
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(results[0].len(), 3);
}

#[tokio::test(start_paused = true)]
async fn snapshot_expires_after_ttl() {
    let h = harness_with(FakeTickers::new(default_tickers()), None);

    h.service.snapshot(None, true).await.unwrap();
    tokio::time::advance(Duration::from_secs(179)).await;
    h.service.snapshot(None, true).await.unwrap();
    assert_eq!(h.tickers.calls(), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    h.service.snapshot(None, true).await.unwrap();
    assert_eq!(h.tickers.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn each_query_shape_has_its_own_entry() {
    let h = harness_with(FakeTickers::new(default_tickers()), None);

    let by_volume = h.service.snapshot(None, true).await.unwrap();
    let by_price = h.service.snapshot(Some(SortCriterion::Price), true).await.unwrap();
    let by_price_asc = h.service.snapshot(Some(SortCriterion::Price), false).await.unwrap();
    h.service.snapshot(Some(SortCriterion::Price), true).await.unwrap();

    assert_eq!(h.tickers.calls(), 3);
    assert_eq!(by_volume[0].exchange, "Binance");
    assert_eq!(by_price[0].exchange, "Kraken");
    assert_eq!(by_price_asc[0].exchange, "Bybit");
    assert_eq!(h.service.cached_entries(), 3);
}

#[tokio::test(start_paused = true)]
async fn cancelled_request_leaves_nothing_cached() {
    let h = harness_with(FakeTickers::new(default_tickers()).with_delay(Duration::from_secs(1)), None);

    let service = h.service.clone();
    let pending = tokio::spawn(async move { service.snapshot(None, true).await });
    tokio::time::sleep(Duration::from_millis(10)).await;
    pending.abort();
    assert!(pending.await.unwrap_err().is_cancelled());

    let records = h.service.snapshot(None, true).await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(h.tickers.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn concurrent_requests_share_an_upstream_failure() {
    let failing = FakeTickers::failing(UpstreamError::Transport {
        provider: "fake",
        message: "operation timed out".into(),
        timeout: true,
    })
    .with_delay(Duration::from_secs(10));
    let h = harness_with(failing, None);

    let started = tokio::time::Instant::now();
    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = h.service.clone();
            tokio::spawn(async move { service.snapshot(None, true).await })
        })
        .collect();

    for handle in handles {
        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err.root(), Error::Upstream(e) if e.is_timeout()));
    }
    assert_eq!(h.tickers.calls(), 1);
    assert!(started.elapsed() < Duration::from_secs(11));

    // The failure is not cached for later requests
    let _ = h.service.snapshot(None, true).await;
    assert_eq!(h.tickers.calls(), 2);
}
