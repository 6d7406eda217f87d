// Market data module entrypoint
pub mod adapters;   // provider fetchers (CoinGecko, Binance, CoinMarketCap)
pub mod aggregator; // live tickers + custom records -> snapshot
pub mod cache;      // TTL cache with single-flight computation
pub mod history;    // price-history shaping
pub mod normaliser; // provider numbers -> Decimal
pub mod order_book; // ±2% depth walk
pub mod service;    // facade used by the HTTP layer
pub mod sort;       // sort/query engine
pub mod store;      // user-defined records
pub mod types;
