use axum::{extract::State, Json};

use crate::api::models::{EndpointInfo, ServiceInfo};
use crate::api::state::AppState;

pub async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    let pair = state.service.pair().label();
    Json(ServiceInfo {
        name: "LTC Exchange API",
        version: env!("CARGO_PKG_VERSION"),
        description: format!("Exchange, depth and price data for {}", pair),
        endpoints: vec![
            EndpointInfo { path: "/api/ltc-exchanges", description: "Exchanges trading the pair, merged with custom entries" },
            EndpointInfo { path: "/api/ltc-exchanges-cmc", description: "Top exchanges by volume from CoinMarketCap" },
            EndpointInfo { path: "/api/ltc-depth/{exchange}", description: "Order book depth within 2% of the spot price" },
            EndpointInfo { path: "/api/ltc-price-history", description: "Price history for charting" },
            EndpointInfo { path: "/api/custom-exchanges", description: "Manage user-defined exchange entries" },
        ],
    })
}
