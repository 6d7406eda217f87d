// HTTP surface over the market-data service
pub mod error;
pub mod format;
pub mod handlers;
pub mod models;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
