use std::collections::HashMap;

// Source: GET /v1/cryptocurrency/market-pairs/latest?symbol=LTC&convert=USD
#[derive(Debug, serde::Deserialize)]
pub struct MarketPairsResponse {
    pub data: MarketPairsData,
}

#[derive(Debug, serde::Deserialize)]
pub struct MarketPairsData {
    #[serde(default)]
    pub market_pairs: Vec<MarketPair>,
}

#[derive(Debug, serde::Deserialize)]
pub struct MarketPair {
    pub exchange: PairExchange,
    pub market_pair_base: PairCurrency,
    pub market_pair_quote: PairCurrency,
    pub quote: HashMap<String, PairQuote>, // "USD" -> quote
}

#[derive(Debug, serde::Deserialize)]
pub struct PairExchange {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct PairCurrency {
    #[serde(alias = "currency_symbol")]
    pub symbol: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct PairQuote {
    pub price: Option<f64>,
    pub volume_24h: Option<f64>,
}
