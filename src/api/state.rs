use std::sync::Arc;

use crate::market_data::service::MarketService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MarketService>,
}

impl AppState {
    pub fn new(service: Arc<MarketService>) -> Self {
        Self { service }
    }
}
