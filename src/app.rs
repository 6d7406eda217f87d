// Wires configured adapters into a MarketService

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::Result;
use crate::market_data::adapters::binance::{self, BinanceAdapter};
use crate::market_data::adapters::coingecko::CoinGeckoAdapter;
use crate::market_data::adapters::coinmarketcap::CoinMarketCapAdapter;
use crate::market_data::adapters::{http_client, TickerSource};
use crate::market_data::aggregator::{COINGECKO_DEPTH_ESTIMATE, COINMARKETCAP_DEPTH_ESTIMATE};
use crate::market_data::service::MarketService;
use crate::market_data::store::RecordStore;
use crate::market_data::types::PairFilter;

pub fn build_service(settings: &Settings, store: Arc<RecordStore>) -> Result<MarketService> {
    let client = http_client(settings.upstream.timeout())?;
    let pair = PairFilter::new(&settings.asset.base, &settings.asset.quote);

    let coingecko = Arc::new(CoinGeckoAdapter::new(
        client.clone(),
        &settings.upstream.coingecko_url,
        &settings.asset.coin_id,
    ));
    let binance = Arc::new(BinanceAdapter::new(client.clone(), &settings.upstream.binance_url));
    let primary: Arc<dyn TickerSource> = coingecko.clone();

    let mut builder = MarketService::builder(
        pair,
        store,
        (primary, COINGECKO_DEPTH_ESTIMATE),
        coingecko.clone(),
        coingecko,
    )
    .depth_venue(binance::PROVIDER, binance, &settings.asset.binance_symbol)
    .snapshot_ttl(settings.cache.snapshot_ttl());

    match settings.upstream.coinmarketcap_key() {
        Some(key) => {
            let cmc = CoinMarketCapAdapter::new(client, &settings.upstream.coinmarketcap_url, key);
            builder = builder.alternative(Arc::new(cmc), COINMARKETCAP_DEPTH_ESTIMATE);
        }
        None => warn!("No CoinMarketCap API key configured, alternative listing disabled"),
    }

    let service = builder.build();
    info!(pair = %service.pair().label(), venues = ?service.depth_venues(), "Market service ready");
    Ok(service)
}
