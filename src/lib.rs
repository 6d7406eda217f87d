pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod market_data;
pub mod telemetry;

pub use error::{Error, Result};
