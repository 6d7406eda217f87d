// CoinMarketCap Pro adapter: alternative ticker source, needs an API key

use tracing::{debug, instrument};

use super::coinmarketcap_types::{MarketPair, MarketPairsResponse};
use super::{get_json, TickerSource};
use crate::error::UpstreamError;
use crate::market_data::normaliser::{NormaliseError, Normaliser};
use crate::market_data::types::{PairFilter, RawTicker};

pub const PROVIDER: &str = "coinmarketcap";
const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

pub struct CoinMarketCapAdapter {
    pub client: reqwest::Client,
    pub api_url: String, // "https://pro-api.coinmarketcap.com"
    api_key: String,
}

impl CoinMarketCapAdapter {
    pub fn new(client: reqwest::Client, api_url: &str, api_key: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

fn normalise_pair(norm: &Normaliser, pair: MarketPair) -> Result<RawTicker, UpstreamError> {
    let usd = pair
        .quote
        .get("USD")
        .ok_or_else(|| NormaliseError::Missing { field: "quote.USD" }.into_upstream(PROVIDER))?;
    let price = usd
        .price
        .ok_or_else(|| NormaliseError::Missing { field: "quote.USD.price" }.into_upstream(PROVIDER))?;
    let volume = usd
        .volume_24h
        .ok_or_else(|| NormaliseError::Missing { field: "quote.USD.volume_24h" }.into_upstream(PROVIDER))?;

    Ok(RawTicker {
        exchange: pair.exchange.name,
        market_id: pair.exchange.slug,
        base: pair.market_pair_base.symbol,
        target: pair.market_pair_quote.symbol,
        last: norm.decimal_from_f64("quote.USD.price", price)?,
        volume_usd: norm.decimal_from_f64("quote.USD.volume_24h", volume)?,
        // Not reported by this endpoint
        spread_percentage: None,
        icon: None,
    })
}

#[async_trait::async_trait]
impl TickerSource for CoinMarketCapAdapter {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_tickers(&self, filter: &PairFilter) -> Result<Vec<RawTicker>, UpstreamError> {
        let request = self
            .client
            .get(format!("{}/v1/cryptocurrency/market-pairs/latest", self.api_url))
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("symbol", filter.base.as_str()), ("convert", "USD")]);
        let response: MarketPairsResponse = get_json(PROVIDER, request).await?;

        let normaliser = Normaliser::new(PROVIDER);
        let total = response.data.market_pairs.len();
        let tickers = response
            .data
            .market_pairs
            .into_iter()
            .filter(|pair| pair.market_pair_quote.symbol.eq_ignore_ascii_case(&filter.quote))
            .map(|pair| normalise_pair(&normaliser, pair))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(total, matched = tickers.len(), "Fetched market pairs");
        Ok(tickers)
    }
}
