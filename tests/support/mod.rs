#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use ltcx_rs::error::UpstreamError;
use ltcx_rs::market_data::adapters::{HistorySource, OrderBookSource, SpotPriceSource, TickerSource};
use ltcx_rs::market_data::aggregator::{COINGECKO_DEPTH_ESTIMATE, COINMARKETCAP_DEPTH_ESTIMATE};
use ltcx_rs::market_data::order_book::OrderBook;
use ltcx_rs::market_data::service::MarketService;
use ltcx_rs::market_data::store::RecordStore;
use ltcx_rs::market_data::types::{PairFilter, PriceSample, RawTicker};

pub fn ticker(exchange: &str, target: &str, last: Decimal, volume: Decimal, spread: Option<Decimal>) -> RawTicker {
    RawTicker {
        exchange: exchange.to_string(),
        market_id: Some(exchange.to_lowercase()),
        base: "LTC".to_string(),
        target: target.to_string(),
        last,
        volume_usd: volume,
        spread_percentage: spread,
        icon: None,
    }
}

pub fn default_tickers() -> Vec<RawTicker> {
    vec![
        ticker("Kraken", "USDT", dec!(84.2), dec!(500000), Some(dec!(0.05))),
        ticker("Binance", "USDT", dec!(84.1), dec!(2000000), Some(dec!(0.01))),
        ticker("Coinbase", "USD", dec!(84.3), dec!(900000), Some(dec!(0.02))),
        ticker("Bybit", "USDT", dec!(84.0), dec!(1000000), None),
    ]
}

/// Ticker source that counts calls and can be slowed down or made to fail.
pub struct FakeTickers {
    pub tickers: Vec<RawTicker>,
    pub calls: AtomicUsize,
    pub delay: Duration,
    pub fail_with: Option<UpstreamError>,
}

impl FakeTickers {
    pub fn new(tickers: Vec<RawTicker>) -> Self {
        Self { tickers, calls: AtomicUsize::new(0), delay: Duration::ZERO, fail_with: None }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(error: UpstreamError) -> Self {
        Self { fail_with: Some(error), ..Self::new(Vec::new()) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TickerSource for FakeTickers {
    fn provider(&self) -> &'static str {
        "fake"
    }

    async fn fetch_tickers(&self, _filter: &PairFilter) -> Result<Vec<RawTicker>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(self.tickers.clone()),
        }
    }
}

pub struct FakeBook(pub OrderBook);

#[async_trait]
impl OrderBookSource for FakeBook {
    fn provider(&self) -> &'static str {
        "fake-book"
    }

    async fn fetch_order_book(&self, _symbol: &str) -> Result<OrderBook, UpstreamError> {
        Ok(self.0.clone())
    }
}

pub struct FakeSpot(pub Decimal);

#[async_trait]
impl SpotPriceSource for FakeSpot {
    async fn fetch_spot_price(&self) -> Result<Decimal, UpstreamError> {
        Ok(self.0)
    }
}

#[derive(Default)]
pub struct FakeHistory {
    pub samples: Vec<PriceSample>,
    pub calls: AtomicUsize,
}

#[async_trait]
impl HistorySource for FakeHistory {
    async fn fetch_history(&self, _days: u32) -> Result<Vec<PriceSample>, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.samples.clone())
    }
}

/// With a spot of 100: +2% depth 306, -2% depth 298.
pub fn sample_book() -> OrderBook {
    OrderBook::new(
        vec![(dec!(100), dec!(2)), (dec!(98), dec!(1)), (dec!(97), dec!(5))],
        vec![(dec!(102), dec!(3)), (dec!(105), dec!(1))],
    )
}

pub struct Harness {
    pub service: Arc<MarketService>,
    pub store: Arc<RecordStore>,
    pub tickers: Arc<FakeTickers>,
    pub history: Arc<FakeHistory>,
}

pub fn harness_with(tickers: FakeTickers, alternative: Option<Arc<dyn TickerSource>>) -> Harness {
    let store = Arc::new(RecordStore::new());
    let tickers = Arc::new(tickers);
    let history = Arc::new(FakeHistory {
        // 2024-03-23T00:00Z and 12:00Z, then 2024-03-24T00:00Z
        samples: vec![
            PriceSample { timestamp_ms: 1_711_152_000_000, price: dec!(80.111) },
            PriceSample { timestamp_ms: 1_711_195_200_000, price: dec!(81.5) },
            PriceSample { timestamp_ms: 1_711_238_400_000, price: dec!(82.25) },
        ],
        calls: AtomicUsize::new(0),
    });

    let primary: Arc<dyn TickerSource> = tickers.clone();
    let mut builder = MarketService::builder(
        PairFilter::new("LTC", "USDT"),
        Arc::clone(&store),
        (primary, COINGECKO_DEPTH_ESTIMATE),
        Arc::new(FakeSpot(dec!(100))),
        history.clone(),
    )
    .depth_venue("binance", Arc::new(FakeBook(sample_book())), "LTCUSDT");
    if let Some(alt) = alternative {
        builder = builder.alternative(alt, COINMARKETCAP_DEPTH_ESTIMATE);
    }

    Harness { service: Arc::new(builder.build()), store, tickers, history }
}

pub fn harness() -> Harness {
    harness_with(FakeTickers::new(default_tickers()), None)
}
