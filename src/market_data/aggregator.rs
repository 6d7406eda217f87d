use std::sync::Arc;

use ahash::AHashSet;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, instrument};

use crate::error::UpstreamError;
use crate::market_data::adapters::TickerSource;
use crate::market_data::store::RecordStore;
use crate::market_data::types::{exchange_key, DepthSource, ExchangeRecord, PairFilter, Provenance, RawTicker};

/// Stand-in volume percentage when the upstream omits the spread.
pub const DEFAULT_VOLUME_PERCENTAGE: Decimal = dec!(1.00);

/// Depth approximated as fixed fractions of 24h volume.
///
/// This is not an order-book walk; records built with it are tagged
/// `DepthSource::VolumeEstimate`. Real depth comes from `OrderBook::compute_depth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthEstimate {
    pub plus_fraction: Decimal,
    pub minus_fraction: Decimal,
}

pub const COINGECKO_DEPTH_ESTIMATE: DepthEstimate = DepthEstimate { plus_fraction: dec!(0.06), minus_fraction: dec!(0.05) };
pub const COINMARKETCAP_DEPTH_ESTIMATE: DepthEstimate = DepthEstimate { plus_fraction: dec!(0.05), minus_fraction: dec!(0.04) };

impl DepthEstimate {
    pub fn apply(&self, volume: Decimal) -> (Decimal, Decimal) {
        (volume * self.plus_fraction, volume * self.minus_fraction)
    }
}

/// Turn provider tickers into records. Ids are the 1-based upstream position.
pub fn live_records(tickers: Vec<RawTicker>, pair_label: &str, estimate: DepthEstimate) -> Vec<ExchangeRecord> {
    tickers
        .into_iter()
        .enumerate()
        .map(|(i, ticker)| {
            let (depth_plus, depth_minus) = estimate.apply(ticker.volume_usd);
            let (volume_percentage, provenance) = match ticker.spread_percentage {
                Some(spread) => (spread, Provenance::Live),
                None => (DEFAULT_VOLUME_PERCENTAGE, Provenance::LiveDefaultSpread),
            };
            ExchangeRecord {
                id: i as u64 + 1,
                exchange: ticker.exchange,
                pair: pair_label.to_string(),
                price: ticker.last,
                volume_24h: ticker.volume_usd,
                depth_plus_2pct: depth_plus,
                depth_minus_2pct: depth_minus,
                depth_source: DepthSource::VolumeEstimate,
                volume_percentage,
                provenance,
                icon: ticker.icon,
            }
        })
        .collect()
}

/// Merges a live ticker source with the custom record store.
pub struct Aggregator {
    source: Arc<dyn TickerSource>,
    store: Arc<RecordStore>,
    estimate: DepthEstimate,
}

impl Aggregator {
    pub fn new(source: Arc<dyn TickerSource>, store: Arc<RecordStore>, estimate: DepthEstimate) -> Self {
        Self { source, store, estimate }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Live records for `filter` only, one per venue (first ticker wins).
    pub async fn live_snapshot(&self, filter: &PairFilter) -> Result<Vec<ExchangeRecord>, UpstreamError> {
        let mut seen = AHashSet::new();
        let tickers: Vec<RawTicker> = self
            .source
            .fetch_tickers(filter)
            .await?
            .into_iter()
            .filter(|t| filter.matches(t) && seen.insert(exchange_key(&t.exchange)))
            .collect();
        Ok(live_records(tickers, &filter.label(), self.estimate))
    }

    /// Live records merged with every custom record, unsorted. A custom record
    /// replaces the live record of the same venue.
    ///
    /// Live ids are `1..=L` (upstream position). Custom records follow as
    /// `L+1..` in store order, so ids never collide within one snapshot.
    /// Any upstream failure aborts the whole snapshot.
    #[instrument(skip(self), fields(provider = self.source.provider()))]
    pub async fn build_snapshot(&self, filter: &PairFilter) -> Result<Vec<ExchangeRecord>, UpstreamError> {
        let live = self.live_snapshot(filter).await?;
        let live_total = live.len() as u64;

        let mut custom = self.store.list();
        custom.sort_by_key(|r| r.id);
        for (i, record) in custom.iter_mut().enumerate() {
            record.id = live_total + i as u64 + 1;
        }

        let overridden: AHashSet<String> = custom.iter().map(ExchangeRecord::key).collect();
        let mut records: Vec<ExchangeRecord> = live.into_iter().filter(|r| !overridden.contains(&r.key())).collect();
        let kept = records.len();
        records.extend(custom);

        debug!(live = kept, custom = records.len() - kept, "Built merged snapshot");
        Ok(records)
    }
}
