// Service facade: derives cache keys, picks TTLs and orchestrates adapters,
// aggregator and sort engine for each query shape.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;
use tracing::{info, instrument};

use crate::error::{Error, Result, UpstreamError};
use crate::market_data::adapters::{HistorySource, OrderBookSource, SpotPriceSource, TickerSource};
use crate::market_data::aggregator::{Aggregator, DepthEstimate};
use crate::market_data::cache::TtlCache;
use crate::market_data::history;
use crate::market_data::sort::{sort_records, SortCriterion};
use crate::market_data::store::RecordStore;
use crate::market_data::types::{DepthReport, ExchangeRecord, PairFilter, PriceHistory};

/// How many records the alternative-provider listing returns.
pub const ALT_SNAPSHOT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    Merged,
    Alternative,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    pub kind: SnapshotKind,
    pub criterion: Option<SortCriterion>,
    pub descending: bool,
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            SnapshotKind::Merged => "exchanges",
            SnapshotKind::Alternative => "exchanges_alt",
        };
        let criterion = self.criterion.map_or("default", SortCriterion::as_str);
        write!(f, "{}:{}:{}", kind, criterion, self.descending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryKey {
    pub days: u32,
    pub daily_close: bool,
}

impl fmt::Display for HistoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "price_history:{}:{}", self.days, self.daily_close)
    }
}

/// Per-venue order book source plus the symbol it trades the asset under.
pub struct DepthVenue {
    pub source: Arc<dyn OrderBookSource>,
    pub symbol: String,
}

pub struct MarketService {
    pair: PairFilter,
    aggregator: Aggregator,
    alternative: Option<Aggregator>,
    venues: AHashMap<String, DepthVenue>,
    spot: Arc<dyn SpotPriceSource>,
    history_source: Arc<dyn HistorySource>,
    snapshots: TtlCache<SnapshotKey, Arc<Vec<ExchangeRecord>>, UpstreamError>,
    histories: TtlCache<HistoryKey, Arc<PriceHistory>, UpstreamError>,
    snapshot_ttl: Duration,
}

pub struct MarketServiceBuilder {
    pair: PairFilter,
    store: Arc<RecordStore>,
    primary: Arc<dyn TickerSource>,
    primary_estimate: DepthEstimate,
    alternative: Option<(Arc<dyn TickerSource>, DepthEstimate)>,
    venues: AHashMap<String, DepthVenue>,
    spot: Arc<dyn SpotPriceSource>,
    history_source: Arc<dyn HistorySource>,
    snapshot_ttl: Duration,
}

impl MarketServiceBuilder {
    pub fn alternative(mut self, source: Arc<dyn TickerSource>, estimate: DepthEstimate) -> Self {
        self.alternative = Some((source, estimate));
        self
    }

    pub fn depth_venue(mut self, name: &str, source: Arc<dyn OrderBookSource>, symbol: &str) -> Self {
        self.venues.insert(name.to_lowercase(), DepthVenue { source, symbol: symbol.to_string() });
        self
    }

    pub fn snapshot_ttl(mut self, ttl: Duration) -> Self {
        self.snapshot_ttl = ttl;
        self
    }

    pub fn build(self) -> MarketService {
        let alternative = self
            .alternative
            .map(|(source, estimate)| Aggregator::new(source, Arc::clone(&self.store), estimate));
        MarketService {
            pair: self.pair,
            aggregator: Aggregator::new(self.primary, self.store, self.primary_estimate),
            alternative,
            venues: self.venues,
            spot: self.spot,
            history_source: self.history_source,
            snapshots: TtlCache::new("snapshots"),
            histories: TtlCache::new("price_history"),
            snapshot_ttl: self.snapshot_ttl,
        }
    }
}

impl MarketService {
    pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(180);

    pub fn builder(
        pair: PairFilter,
        store: Arc<RecordStore>,
        primary: (Arc<dyn TickerSource>, DepthEstimate),
        spot: Arc<dyn SpotPriceSource>,
        history_source: Arc<dyn HistorySource>,
    ) -> MarketServiceBuilder {
        MarketServiceBuilder {
            pair,
            store,
            primary: primary.0,
            primary_estimate: primary.1,
            alternative: None,
            venues: AHashMap::new(),
            spot,
            history_source,
            snapshot_ttl: Self::DEFAULT_SNAPSHOT_TTL,
        }
    }

    pub fn store(&self) -> &Arc<RecordStore> {
        self.aggregator.store()
    }

    pub fn pair(&self) -> &PairFilter {
        &self.pair
    }

    pub fn depth_venues(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.venues.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn cached_entries(&self) -> usize {
        self.snapshots.live_entries() + self.histories.live_entries()
    }

    /// Live tickers merged with custom records, sorted, ids assigned.
    #[instrument(skip(self))]
    pub async fn snapshot(&self, criterion: Option<SortCriterion>, descending: bool) -> Result<Arc<Vec<ExchangeRecord>>> {
        let key = SnapshotKey { kind: SnapshotKind::Merged, criterion, descending };
        self.snapshots
            .get_or_compute(&key, self.snapshot_ttl, || async {
                let mut records = self.aggregator.build_snapshot(&self.pair).await?;
                sort_records(&mut records, criterion, descending);
                Ok::<_, UpstreamError>(Arc::new(records))
            })
            .await
            .map_err(|e| Error::cache_compute(&key, e.into()))
    }

    /// Top records by volume from the alternative provider, live data only.
    #[instrument(skip(self))]
    pub async fn alternative_snapshot(&self) -> Result<Arc<Vec<ExchangeRecord>>> {
        let aggregator = self
            .alternative
            .as_ref()
            .ok_or_else(|| Error::Unavailable("alternative provider is not configured".into()))?;
        let key = SnapshotKey { kind: SnapshotKind::Alternative, criterion: None, descending: true };

        self.snapshots
            .get_or_compute(&key, self.snapshot_ttl, || async {
                let mut records = aggregator.live_snapshot(&self.pair).await?;
                sort_records(&mut records, None, true);
                records.truncate(ALT_SNAPSHOT_LIMIT);
                Ok::<_, UpstreamError>(Arc::new(records))
            })
            .await
            .map_err(|e| Error::cache_compute(&key, e.into()))
    }

    /// True ±2% order-book depth for one venue. Not cached.
    #[instrument(skip(self))]
    pub async fn depth(&self, exchange: &str) -> Result<DepthReport> {
        let venue = self
            .venues
            .get(&exchange.to_lowercase())
            .ok_or_else(|| Error::NotFound(format!("depth data for exchange {} is unavailable", exchange)))?;

        let (book, reference) = futures::try_join!(
            venue.source.fetch_order_book(&venue.symbol),
            self.spot.fetch_spot_price()
        )?;
        let depth = book.compute_depth(reference);
        info!(exchange, %reference, plus = %depth.plus, minus = %depth.minus, "Computed order book depth");

        Ok(DepthReport {
            exchange: exchange.to_string(),
            current_price: reference,
            plus_depth: depth.plus,
            minus_depth: depth.minus,
        })
    }

    /// Price history for `days` (clamped to 1..=90), cached by range.
    #[instrument(skip(self))]
    pub async fn history(&self, days: i64, daily_close: bool) -> Result<Arc<PriceHistory>> {
        let days = history::clamp_days(days);
        let key = HistoryKey { days, daily_close };

        self.histories
            .get_or_compute(&key, history::cache_ttl(days), || async {
                let samples = self.history_source.fetch_history(days).await?;
                Ok::<_, UpstreamError>(Arc::new(history::build_history(&samples, days, daily_close)))
            })
            .await
            .map_err(|e| Error::cache_compute(&key, e.into()))
    }
}
