// Binance spot REST adapter: order book snapshots for the depth endpoint

use tracing::{debug, instrument};

use super::binance_types::DepthResponse;
use super::{get_json, OrderBookSource};
use crate::error::UpstreamError;
use crate::market_data::normaliser::Normaliser;
use crate::market_data::order_book::OrderBook;

pub const PROVIDER: &str = "binance";

pub struct BinanceAdapter {
    pub client: reqwest::Client,
    pub api_url: String, // "https://api.binance.com"
    pub depth_limit: u32,
}

impl BinanceAdapter {
    pub fn new(client: reqwest::Client, api_url: &str) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            depth_limit: 100,
        }
    }

    // Convert [price, qty] string pairs, keeping the venue's ordering
    fn norm_side(&self, norm: &Normaliser, side: &[[String; 2]]) -> Result<Vec<(rust_decimal::Decimal, rust_decimal::Decimal)>, UpstreamError> {
        side.iter().map(|lvl| norm.level(lvl)).collect()
    }
}

#[async_trait::async_trait]
impl OrderBookSource for BinanceAdapter {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    #[instrument(skip(self), fields(provider = PROVIDER))]
    async fn fetch_order_book(&self, symbol: &str) -> Result<OrderBook, UpstreamError> {
        let request = self
            .client
            .get(format!("{}/api/v3/depth", self.api_url))
            .query(&[("symbol", symbol.to_string()), ("limit", self.depth_limit.to_string())]);

        let depth: DepthResponse = get_json(PROVIDER, request).await?;

        let normaliser = Normaliser::new(PROVIDER);
        let bids = self.norm_side(&normaliser, &depth.bids)?;
        let asks = self.norm_side(&normaliser, &depth.asks)?;
        debug!(
            last_update_id = depth.last_update_id,
            bids = bids.len(),
            asks = asks.len(),
            "Fetched order book"
        );
        Ok(OrderBook::new(bids, asks))
    }
}
