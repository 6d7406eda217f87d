// In-memory store of user-defined exchange records.
//
// Records are keyed by case-folded exchange name. The store is an owned
// instance shared through `Arc`; nothing else mutates the map.

use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::market_data::types::{exchange_key, DepthSource, ExchangeRecord, Provenance};

pub const DEFAULT_PAIR: &str = "LTC/USDT";

fn default_pair() -> String {
    DEFAULT_PAIR.to_string()
}

/// Payload for creating or replacing a custom record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRecordInput {
    pub exchange: String,
    #[serde(default = "default_pair")]
    pub pair: String,
    pub price: Decimal,
    pub plus_two_percent_depth: Decimal,
    pub minus_two_percent_depth: Decimal,
    pub volume24h: Decimal,
    pub volume_percentage: Decimal,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Partial update; only `Some` fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRecordPatch {
    pub pair: Option<String>,
    pub price: Option<Decimal>,
    pub plus_two_percent_depth: Option<Decimal>,
    pub minus_two_percent_depth: Option<Decimal>,
    pub volume24h: Option<Decimal>,
    pub volume_percentage: Option<Decimal>,
    pub icon: Option<String>,
}

fn check_non_negative(field: &str, value: Decimal) -> Result<()> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(Error::Validation(format!("{} must not be negative", field)));
    }
    Ok(())
}

impl CustomRecordInput {
    pub fn validate(&self) -> Result<()> {
        if self.exchange.trim().is_empty() {
            return Err(Error::Validation("exchange name must not be empty".into()));
        }
        if self.pair.trim().is_empty() {
            return Err(Error::Validation("pair must not be empty".into()));
        }
        check_non_negative("price", self.price)?;
        check_non_negative("plusTwoPercentDepth", self.plus_two_percent_depth)?;
        check_non_negative("minusTwoPercentDepth", self.minus_two_percent_depth)?;
        check_non_negative("volume24h", self.volume24h)?;
        check_non_negative("volumePercentage", self.volume_percentage)
    }

    fn into_record(self, id: u64) -> ExchangeRecord {
        ExchangeRecord {
            id,
            exchange: self.exchange.trim().to_string(),
            pair: self.pair,
            price: self.price,
            volume_24h: self.volume24h,
            depth_plus_2pct: self.plus_two_percent_depth,
            depth_minus_2pct: self.minus_two_percent_depth,
            depth_source: DepthSource::UserSupplied,
            volume_percentage: self.volume_percentage,
            provenance: Provenance::UserDefined,
            icon: self.icon,
        }
    }
}

impl CustomRecordPatch {
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.pair, Some(p) if p.trim().is_empty()) {
            return Err(Error::Validation("pair must not be empty".into()));
        }
        let numbers = [
            ("price", self.price),
            ("plusTwoPercentDepth", self.plus_two_percent_depth),
            ("minusTwoPercentDepth", self.minus_two_percent_depth),
            ("volume24h", self.volume24h),
            ("volumePercentage", self.volume_percentage),
        ];
        for (field, value) in numbers {
            if let Some(v) = value {
                check_non_negative(field, v)?;
            }
        }
        Ok(())
    }

    /// Merge into `record` in one pass and stamp it user-updated.
    /// Returns the names of the fields that were written.
    pub fn apply(self, record: &mut ExchangeRecord) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if let Some(pair) = self.pair {
            record.pair = pair;
            changed.push("pair");
        }
        let numeric = [
            ("price", self.price, &mut record.price),
            ("plusTwoPercentDepth", self.plus_two_percent_depth, &mut record.depth_plus_2pct),
            ("minusTwoPercentDepth", self.minus_two_percent_depth, &mut record.depth_minus_2pct),
            ("volume24h", self.volume24h, &mut record.volume_24h),
            ("volumePercentage", self.volume_percentage, &mut record.volume_percentage),
        ];
        for (field, value, slot) in numeric {
            if let Some(v) = value {
                *slot = v;
                changed.push(field);
            }
        }
        if let Some(icon) = self.icon {
            record.icon = Some(icon);
            changed.push("icon");
        }

        record.provenance = Provenance::UserUpdated;
        changed
    }
}

pub struct RecordStore {
    records: RwLock<AHashMap<String, ExchangeRecord>>,
    next_id: AtomicU64,
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(AHashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Insert or replace. A replaced record keeps its stored id.
    pub fn put(&self, input: CustomRecordInput) -> ExchangeRecord {
        let key = exchange_key(&input.exchange);
        let mut records = self.records.write();
        let id = match records.get(&key) {
            Some(existing) => existing.id,
            None => self.next_id.fetch_add(1, Ordering::Relaxed),
        };
        let record = input.into_record(id);
        let replaced = records.insert(key.clone(), record.clone()).is_some();
        info!(exchange = %record.exchange, key = %key, replaced, "Stored custom exchange");
        record
    }

    pub fn get(&self, name: &str) -> Result<ExchangeRecord> {
        self.records
            .read()
            .get(&exchange_key(name))
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    pub fn patch(&self, name: &str, patch: CustomRecordPatch) -> Result<ExchangeRecord> {
        let mut records = self.records.write();
        let record = records.get_mut(&exchange_key(name)).ok_or_else(|| not_found(name))?;
        let changed = patch.apply(record);
        info!(exchange = %record.exchange, ?changed, "Updated custom exchange");
        Ok(record.clone())
    }

    pub fn delete(&self, name: &str) -> Result<ExchangeRecord> {
        let removed = self.records.write().remove(&exchange_key(name)).ok_or_else(|| not_found(name))?;
        info!(exchange = %removed.exchange, "Deleted custom exchange");
        Ok(removed)
    }

    /// All records in no particular order.
    pub fn list(&self) -> Vec<ExchangeRecord> {
        let records: Vec<_> = self.records.read().values().cloned().collect();
        debug!(count = records.len(), "Listed custom exchanges");
        records
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(name: &str) -> Error {
    Error::NotFound(format!("exchange {} not found", name))
}
