// CoinGecko REST adapter: tickers (+ exchange icons), spot price and price history

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use super::coingecko_types::{ExchangeInfo, MarketChartResponse, SimplePriceResponse, Ticker, TickersResponse};
use super::{get_json, HistorySource, SpotPriceSource, TickerSource};
use crate::error::UpstreamError;
use crate::market_data::normaliser::{NormaliseError, Normaliser};
use crate::market_data::types::{PairFilter, PriceSample, RawTicker};

pub const PROVIDER: &str = "coingecko";

pub struct CoinGeckoAdapter {
    pub client: reqwest::Client,
    pub coin_id: String, // e.g. "litecoin"
    pub api_url: String, // "https://api.coingecko.com/api/v3"
}

impl CoinGeckoAdapter {
    pub fn new(client: reqwest::Client, api_url: &str, coin_id: &str) -> Self {
        Self {
            client,
            coin_id: coin_id.to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_raw_tickers(&self) -> Result<TickersResponse, UpstreamError> {
        let request = self.client.get(format!("{}/coins/{}/tickers", self.api_url, self.coin_id));
        get_json(PROVIDER, request).await
    }

    /// Exchange id -> icon URL.
    async fn fetch_icons(&self) -> Result<HashMap<String, String>, UpstreamError> {
        let request = self
            .client
            .get(format!("{}/exchanges", self.api_url))
            .query(&[("per_page", "250")]);
        let exchanges: Vec<ExchangeInfo> = get_json(PROVIDER, request).await?;
        Ok(exchanges
            .into_iter()
            .filter_map(|ex| ex.image.map(|image| (ex.id, image)))
            .collect())
    }

    fn normalise_ticker(
        &self,
        norm: &Normaliser,
        ticker: Ticker,
        icons: &HashMap<String, String>,
    ) -> Result<RawTicker, UpstreamError> {
        let last = norm.decimal_from_json("last", &ticker.last)?;
        let volume_usd = match ticker.converted_volume.get("usd") {
            Some(v) => norm.decimal_from_f64("converted_volume.usd", *v)?,
            None => return Err(NormaliseError::Missing { field: "converted_volume.usd" }.into_upstream(PROVIDER)),
        };
        let spread_percentage = norm.optional_from_f64("bid_ask_spread_percentage", ticker.bid_ask_spread_percentage)?;
        let icon = ticker.market.identifier.as_ref().and_then(|id| icons.get(id)).cloned();

        Ok(RawTicker {
            exchange: ticker.market.name.unwrap_or_else(|| "Unknown".to_string()),
            market_id: ticker.market.identifier,
            base: ticker.base,
            target: ticker.target,
            last,
            volume_usd,
            spread_percentage,
            icon,
        })
    }
}

fn samples_from_chart(norm: &Normaliser, chart: MarketChartResponse) -> Result<Vec<PriceSample>, UpstreamError> {
    chart
        .prices
        .into_iter()
        .map(|[ts, price]| {
            if !ts.is_finite() {
                return Err(NormaliseError::NotFinite { field: "prices.timestamp" }.into_upstream(PROVIDER));
            }
            Ok(PriceSample {
                timestamp_ms: ts as i64,
                price: norm.decimal_from_f64("prices.price", price)?,
            })
        })
        .collect()
}

#[async_trait::async_trait]
impl TickerSource for CoinGeckoAdapter {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(skip(self), fields(provider = PROVIDER, coin = %self.coin_id))]
    async fn fetch_tickers(&self, filter: &PairFilter) -> Result<Vec<RawTicker>, UpstreamError> {
        // Icons are optional enrichment; only the ticker call can fail the fetch
        let (response, icons) = futures::join!(self.fetch_raw_tickers(), self.fetch_icons());
        let response = response?;
        let icons = icons.unwrap_or_else(|e| {
            warn!(error = %e, "Icon lookup failed, continuing without icons");
            HashMap::new()
        });

        let normaliser = Normaliser::new(PROVIDER);
        let total = response.tickers.len();
        let mut tickers = Vec::new();
        for ticker in response.tickers {
            if !ticker.target.eq_ignore_ascii_case(&filter.quote) {
                continue;
            }
            tickers.push(self.normalise_ticker(&normaliser, ticker, &icons)?);
        }

        debug!(
            coin = response.name.as_deref().unwrap_or(&self.coin_id),
            total,
            matched = tickers.len(),
            icons = icons.len(),
            "Fetched tickers"
        );
        Ok(tickers)
    }
}

#[async_trait::async_trait]
impl SpotPriceSource for CoinGeckoAdapter {
    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_spot_price(&self) -> Result<Decimal, UpstreamError> {
        let request = self
            .client
            .get(format!("{}/simple/price", self.api_url))
            .query(&[("ids", self.coin_id.as_str()), ("vs_currencies", "usd")]);
        let prices: SimplePriceResponse = get_json(PROVIDER, request).await?;

        let usd = prices
            .get(&self.coin_id)
            .and_then(|quotes| quotes.get("usd"))
            .copied()
            .ok_or_else(|| NormaliseError::Missing { field: "usd" }.into_upstream(PROVIDER))?;
        Normaliser::new(PROVIDER).decimal_from_f64("usd", usd)
    }
}

#[async_trait::async_trait]
impl HistorySource for CoinGeckoAdapter {
    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_history(&self, days: u32) -> Result<Vec<PriceSample>, UpstreamError> {
        // No `interval`: the upstream picks a granularity from the range
        let request = self
            .client
            .get(format!("{}/coins/{}/market_chart", self.api_url, self.coin_id))
            .query(&[("vs_currency", "usd".to_string()), ("days", days.to_string())]);
        let chart: MarketChartResponse = get_json(PROVIDER, request).await?;

        let samples = samples_from_chart(&Normaliser::new(PROVIDER), chart)?;
        debug!(days, samples = samples.len(), "Fetched price history");
        Ok(samples)
    }
}
