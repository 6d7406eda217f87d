use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a record's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    Live,
    /// Live record whose upstream omitted the bid/ask spread; the volume
    /// percentage holds `DEFAULT_VOLUME_PERCENTAGE` instead of real data.
    LiveDefaultSpread,
    UserDefined,
    UserUpdated,
}

impl Provenance {
    pub fn is_custom(self) -> bool {
        matches!(self, Provenance::UserDefined | Provenance::UserUpdated)
    }
}

/// How the ±2% depth figures on a record were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepthSource {
    /// Fixed fraction of 24h volume, not an order-book walk.
    VolumeEstimate,
    UserSupplied,
}

// Canonical unit of output, numbers kept exact until rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRecord {
    pub id: u64,
    pub exchange: String,
    pub pair: String,
    pub price: Decimal,
    pub volume_24h: Decimal,
    pub depth_plus_2pct: Decimal,
    pub depth_minus_2pct: Decimal,
    pub depth_source: DepthSource,
    pub volume_percentage: Decimal,
    pub provenance: Provenance,
    pub icon: Option<String>,
}

impl ExchangeRecord {
    /// Case-folded exchange name used for keying.
    pub fn key(&self) -> String {
        exchange_key(&self.exchange)
    }
}

pub fn exchange_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Ticker as delivered by a provider, already converted to decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTicker {
    pub exchange: String,
    /// Provider-side market identifier (e.g. `"binance"`), used for icon lookup.
    pub market_id: Option<String>,
    pub base: String,
    pub target: String,
    pub last: Decimal,
    pub volume_usd: Decimal,
    /// `None` when the provider left the spread out.
    pub spread_percentage: Option<Decimal>,
    pub icon: Option<String>,
}

/// Quote filter applied to upstream tickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairFilter {
    pub base: String,
    pub quote: String,
}

impl PairFilter {
    pub fn new(base: &str, quote: &str) -> Self {
        Self { base: base.to_uppercase(), quote: quote.to_uppercase() }
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.base, self.quote)
    }

    pub fn matches(&self, ticker: &RawTicker) -> bool {
        ticker.target.eq_ignore_ascii_case(&self.quote)
    }
}

/// One historical sample as delivered upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceSample {
    pub timestamp_ms: i64,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricePoint {
    pub date: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceHistory {
    pub data: Vec<PricePoint>,
    pub currency: String,
    pub period: String,
}

/// True order-book depth around a reference price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthReport {
    pub exchange: String,
    pub current_price: Decimal,
    pub plus_depth: Decimal,
    pub minus_depth: Decimal,
}
