use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use tracing::trace;

use crate::market_data::types::ExchangeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    Id,
    Price,
    Volume,
    #[serde(alias = "depthPlus")]
    PlusDepth,
    #[serde(alias = "depthMinus")]
    MinusDepth,
    Exchange,
}

impl SortCriterion {
    pub fn as_str(self) -> &'static str {
        match self {
            SortCriterion::Id => "id",
            SortCriterion::Price => "price",
            SortCriterion::Volume => "volume",
            SortCriterion::PlusDepth => "plus_depth",
            SortCriterion::MinusDepth => "minus_depth",
            SortCriterion::Exchange => "exchange",
        }
    }

    fn compare(self, a: &ExchangeRecord, b: &ExchangeRecord) -> Ordering {
        match self {
            SortCriterion::Id => a.id.cmp(&b.id),
            SortCriterion::Price => a.price.cmp(&b.price),
            SortCriterion::Volume => a.volume_24h.cmp(&b.volume_24h),
            SortCriterion::PlusDepth => a.depth_plus_2pct.cmp(&b.depth_plus_2pct),
            SortCriterion::MinusDepth => a.depth_minus_2pct.cmp(&b.depth_minus_2pct),
            SortCriterion::Exchange => a.exchange.to_lowercase().cmp(&b.exchange.to_lowercase()),
        }
    }
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order `records` in place.
///
/// With no criterion the records are ordered by volume, highest first, and
/// `descending` is ignored. Equal keys keep their incoming relative order in
/// both directions. Unless sorting by `id`, ids are rewritten to `1..=N` in
/// the final order.
pub fn sort_records(records: &mut [ExchangeRecord], criterion: Option<SortCriterion>, descending: bool) {
    let (key, descending) = match criterion {
        Some(c) => (c, descending),
        None => (SortCriterion::Volume, true),
    };

    if descending {
        records.sort_by(|a, b| key.compare(b, a));
    } else {
        records.sort_by(|a, b| key.compare(a, b));
    }

    if key != SortCriterion::Id {
        for (i, record) in records.iter_mut().enumerate() {
            record.id = i as u64 + 1;
        }
    }
    trace!(criterion = %key, descending, count = records.len(), "Sorted records");
}
