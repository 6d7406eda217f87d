use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::format;
use crate::market_data::sort::SortCriterion;
use crate::market_data::types::{DepthReport, DepthSource, ExchangeRecord, PriceHistory, Provenance};

pub const STATUS_SUCCESS: &str = "success";

/// Record as rendered to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeView {
    pub id: u64,
    pub exchange: String,
    pub pair: String,
    pub price: String,
    pub plus_two_percent_depth: String,
    pub minus_two_percent_depth: String,
    pub volume24h: String,
    pub volume_percentage: String,
    pub last_updated: Provenance,
    pub depth_source: DepthSource,
    pub icon: Option<String>,
}

impl From<&ExchangeRecord> for ExchangeView {
    fn from(record: &ExchangeRecord) -> Self {
        ExchangeView {
            id: record.id,
            exchange: record.exchange.clone(),
            pair: record.pair.clone(),
            price: format::price(record.price),
            plus_two_percent_depth: format::usd_floor(record.depth_plus_2pct),
            minus_two_percent_depth: format::usd_floor(record.depth_minus_2pct),
            volume24h: format::usd_floor(record.volume_24h),
            volume_percentage: format::percentage(record.volume_percentage),
            last_updated: record.provenance,
            depth_source: record.depth_source,
            icon: record.icon.clone(),
        }
    }
}

pub fn views(records: &[ExchangeRecord]) -> Vec<ExchangeView> {
    records.iter().map(ExchangeView::from).collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthView {
    pub exchange: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_price: Decimal,
    #[serde(rename = "plus2PercentDepth")]
    pub plus_depth: String,
    #[serde(rename = "minus2PercentDepth")]
    pub minus_depth: String,
}

impl From<DepthReport> for DepthView {
    fn from(report: DepthReport) -> Self {
        DepthView {
            exchange: report.exchange,
            current_price: report.current_price,
            plus_depth: format::usd_floor(report.plus_depth),
            minus_depth: format::usd_floor(report.minus_depth),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn success(data: T) -> Self {
        DataResponse { status: STATUS_SUCCESS, data }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ExchangeView>,
}

impl MessageResponse {
    pub fn success(message: String) -> Self {
        MessageResponse { status: STATUS_SUCCESS, message, data: None }
    }

    pub fn with_data(mut self, data: ExchangeView) -> Self {
        self.data = Some(data);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse<'a> {
    pub status: &'static str,
    #[serde(flatten)]
    pub history: &'a PriceHistory,
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub path: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

fn default_descending() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangesQuery {
    pub sort_by: Option<SortCriterion>,
    #[serde(default = "default_descending")]
    pub descending: bool,
}

fn default_days() -> i64 {
    30
}

fn default_daily_close() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_days")]
    pub days: i64,
    #[serde(default = "default_daily_close")]
    pub daily_close: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record() -> ExchangeRecord {
        ExchangeRecord {
            id: 3,
            exchange: "Binance".into(),
            pair: "LTC/USDT".into(),
            price: dec!(84.12345),
            volume_24h: dec!(1234567.9),
            depth_plus_2pct: dec!(74074.07),
            depth_minus_2pct: dec!(61728.39),
            depth_source: DepthSource::VolumeEstimate,
            volume_percentage: dec!(0.0119),
            provenance: Provenance::LiveDefaultSpread,
            icon: None,
        }
    }

    #[test]
    fn test_exchange_view_rendering() {
        let json = serde_json::to_value(ExchangeView::from(&record())).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["price"], "84.1235");
        assert_eq!(json["volume24h"], "$1,234,567");
        assert_eq!(json["plusTwoPercentDepth"], "$74,074");
        assert_eq!(json["minusTwoPercentDepth"], "$61,728");
        assert_eq!(json["volumePercentage"], "0.01%");
        assert_eq!(json["lastUpdated"], "live-default-spread");
        assert_eq!(json["depthSource"], "volume-estimate");
        assert!(json["icon"].is_null());
    }

    #[test]
    fn test_depth_view_rendering() {
        let view = DepthView::from(DepthReport {
            exchange: "binance".into(),
            current_price: dec!(100),
            plus_depth: dec!(306),
            minus_depth: dec!(298.5),
        });
        let json = serde_json::to_value(view).unwrap();
        assert_eq!(json["currentPrice"], serde_json::json!(100.0));
        assert_eq!(json["plus2PercentDepth"], "$306");
        assert_eq!(json["minus2PercentDepth"], "$298");
    }

    #[test]
    fn test_query_defaults() {
        let q: ExchangesQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(q.sort_by.is_none());
        assert!(q.descending);

        let h: HistoryQuery = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(h.days, 30);
        assert!(h.daily_close);
    }
}
