// Service configuration.
//
// Layered as: built-in defaults, then an optional TOML file, then
// `LTCX_<SECTION>__<KEY>` environment variables.

use std::path::Path;
use std::time::Duration;

use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;

use crate::error::{Error, Result};

pub const ENV_PREFIX: &str = "LTCX";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub asset: AssetConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

/// Which asset and quote currency the service tracks.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    #[serde(default = "default_coin_id")]
    pub coin_id: String,
    #[serde(default = "default_base")]
    pub base: String,
    #[serde(default = "default_quote")]
    pub quote: String,
    #[serde(default = "default_binance_symbol")]
    pub binance_symbol: String,
}

fn default_coin_id() -> String {
    "litecoin".to_string()
}

fn default_base() -> String {
    "LTC".to_string()
}

fn default_quote() -> String {
    "USDT".to_string()
}

fn default_binance_symbol() -> String {
    "LTCUSDT".to_string()
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            coin_id: default_coin_id(),
            base: default_base(),
            quote: default_quote(),
            binance_symbol: default_binance_symbol(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_coingecko_url")]
    pub coingecko_url: String,
    #[serde(default = "default_binance_url")]
    pub binance_url: String,
    #[serde(default = "default_coinmarketcap_url")]
    pub coinmarketcap_url: String,
    /// Without a key the CoinMarketCap listing answers 503.
    #[serde(default)]
    pub coinmarketcap_api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_coingecko_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_binance_url() -> String {
    "https://api.binance.com".to_string()
}

fn default_coinmarketcap_url() -> String {
    "https://pro-api.coinmarketcap.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            coingecko_url: default_coingecko_url(),
            binance_url: default_binance_url(),
            coinmarketcap_url: default_coinmarketcap_url(),
            coinmarketcap_api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured key, ignoring blank values.
    pub fn coinmarketcap_key(&self) -> Option<&str> {
        self.coinmarketcap_api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_snapshot_ttl_secs")]
    pub snapshot_ttl_secs: u64,
}

fn default_snapshot_ttl_secs() -> u64 {
    180
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { snapshot_ttl_secs: default_snapshot_ttl_secs() }
    }
}

impl CacheConfig {
    pub fn snapshot_ttl(&self) -> Duration {
        Duration::from_secs(self.snapshot_ttl_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level() }
    }
}

impl Settings {
    /// Load settings. A missing file is not an error; the environment always applies.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let loader = ConfigLoader::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).prefix_separator("_").separator("__"))
            .build()?;

        let settings: Settings = loader.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.upstream.timeout_secs == 0 {
            return Err(Error::Validation("upstream.timeout_secs must be positive".into()));
        }
        if self.cache.snapshot_ttl_secs == 0 {
            return Err(Error::Validation("cache.snapshot_ttl_secs must be positive".into()));
        }
        if self.asset.base.trim().is_empty() || self.asset.quote.trim().is_empty() {
            return Err(Error::Validation("asset.base and asset.quote must be set".into()));
        }
        Ok(())
    }
}
