// Source: GET https://api.binance.com/api/v3/depth?symbol=LTCUSDT&limit=100
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthResponse {
    pub last_update_id: u64,
    pub bids: Vec<[String; 2]>, // [price, qty], best (highest) first
    pub asks: Vec<[String; 2]>, // [price, qty], best (lowest) first
}
