// Shared traits for upstream market-data providers

use std::time::Duration;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{Error, UpstreamError};
use crate::market_data::order_book::OrderBook;
use crate::market_data::types::{PairFilter, PriceSample, RawTicker};

#[async_trait::async_trait]
pub trait TickerSource: Send + Sync {
    fn provider(&self) -> &'static str;

    /// Tickers for the configured asset whose quote matches `filter`.
    async fn fetch_tickers(&self, filter: &PairFilter) -> Result<Vec<RawTicker>, UpstreamError>;
}

#[async_trait::async_trait]
pub trait OrderBookSource: Send + Sync {
    fn provider(&self) -> &'static str;

    async fn fetch_order_book(&self, symbol: &str) -> Result<OrderBook, UpstreamError>;
}

#[async_trait::async_trait]
pub trait HistorySource: Send + Sync {
    /// Chronological `(timestamp, price)` samples covering the last `days` days.
    async fn fetch_history(&self, days: u32) -> Result<Vec<PriceSample>, UpstreamError>;
}

#[async_trait::async_trait]
pub trait SpotPriceSource: Send + Sync {
    async fn fetch_spot_price(&self) -> Result<Decimal, UpstreamError>;
}

/// Shared HTTP client with a bounded request timeout.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, Error> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("ltcx-rs/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(Error::HttpClient)
}

/// Send a prepared request and decode a 2xx JSON body.
/// Anything else becomes an `UpstreamError` carrying status and body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    provider: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, UpstreamError> {
    metrics::counter!("ltcx_upstream_requests_total", "provider" => provider).increment(1);

    let result = async {
        let response = request.send().await.map_err(|e| UpstreamError::from_reqwest(provider, e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| UpstreamError::from_reqwest(provider, e))?;

        if !status.is_success() {
            return Err(UpstreamError::Status { provider, status: status.as_u16(), body });
        }
        serde_json::from_str::<T>(&body).map_err(|e| UpstreamError::Payload { provider, message: e.to_string() })
    }
    .await;

    if let Err(ref e) = result {
        metrics::counter!("ltcx_upstream_errors_total", "provider" => provider).increment(1);
        warn!(provider, error = %e, retryable = e.is_retryable(), "Upstream request failed");
    }
    result
}

pub mod binance;
pub mod binance_types;
pub mod coingecko;
pub mod coingecko_types;
pub mod coinmarketcap;
pub mod coinmarketcap_types;
