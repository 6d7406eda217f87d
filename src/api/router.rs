use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{custom, depth, exchanges, history, info};
use crate::api::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/custom-exchanges",
            get(custom::list_custom_exchanges).post(custom::create_custom_exchange),
        )
        .route(
            "/custom-exchanges/:name",
            patch(custom::update_custom_exchange).delete(custom::delete_custom_exchange),
        )
        .route("/ltc-exchanges", get(exchanges::list_exchanges))
        .route("/ltc-exchanges-cmc", get(exchanges::list_alternative_exchanges))
        .route("/ltc-depth/:exchange", get(depth::get_depth))
        .route("/ltc-price-history", get(history::get_price_history));

    Router::new()
        .route("/", get(info::service_info))
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
