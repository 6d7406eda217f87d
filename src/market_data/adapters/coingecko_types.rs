use std::collections::HashMap;

// Source: GET /api/v3/coins/{id}/tickers
#[derive(Debug, serde::Deserialize)]
pub struct TickersResponse {
    #[serde(default)]
    pub name: Option<String>,
    pub tickers: Vec<Ticker>,
}

#[derive(Debug, serde::Deserialize)]
pub struct Ticker {
    pub base: String,
    pub target: String,
    #[serde(default)]
    pub market: Market,
    pub last: serde_json::Value, // number, occasionally a string
    #[serde(default)]
    pub converted_volume: HashMap<String, f64>, // "usd" -> 24h volume
    #[serde(default)]
    pub bid_ask_spread_percentage: Option<f64>,
    // we ignore the other fields for now
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct Market {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
}

// Source: GET /api/v3/exchanges
#[derive(Debug, serde::Deserialize)]
pub struct ExchangeInfo {
    pub id: String,
    #[serde(default)]
    pub image: Option<String>,
}

// Source: GET /api/v3/simple/price?ids={id}&vs_currencies=usd
// e.g. {"litecoin": {"usd": 84.12}}
pub type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

// Source: GET /api/v3/coins/{id}/market_chart?vs_currency=usd&days={n}
#[derive(Debug, serde::Deserialize)]
pub struct MarketChartResponse {
    #[serde(default)]
    pub prices: Vec<[f64; 2]>, // [timestamp_ms, price]
}
