// Price-history shaping: range clamping, daily-close bucketing, period
// labels and the cache lifetime policy per range.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::market_data::types::{PriceHistory, PricePoint, PriceSample};

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 90;
pub const CURRENCY: &str = "USD";

pub fn clamp_days(days: i64) -> u32 {
    days.clamp(MIN_DAYS as i64, MAX_DAYS as i64) as u32
}

pub fn period_label(days: u32) -> String {
    match days {
        0..=1 => "24 hours".to_string(),
        2..=7 => "7 days".to_string(),
        8..=30 => "1 month".to_string(),
        n => format!("{} days", n),
    }
}

/// Longer ranges change slowly, so they are cached longer.
pub fn cache_ttl(days: u32) -> Duration {
    const HOUR: u64 = 60 * 60;
    if days >= 30 {
        Duration::from_secs(12 * HOUR)
    } else if days >= 7 {
        Duration::from_secs(6 * HOUR)
    } else {
        Duration::from_secs(HOUR)
    }
}

fn sample_date(sample: &PriceSample) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(sample.timestamp_ms).map(|dt| dt.date_naive())
}

fn point(date: NaiveDate, price: Decimal) -> PricePoint {
    PricePoint {
        date: format!("{}/{}", date.month(), date.day()),
        price: price.round_dp(2),
    }
}

/// Shape upstream samples into chart points (UTC calendar days).
///
/// With `daily_close` every day collapses to its last sample and at most
/// `days` of the most recent days are kept. Otherwise every sample is
/// returned in input order. Samples with out-of-range timestamps are skipped.
pub fn build_points(samples: &[PriceSample], days: u32, daily_close: bool) -> Vec<PricePoint> {
    if !daily_close {
        return samples
            .iter()
            .filter_map(|s| sample_date(s).map(|date| point(date, s.price)))
            .collect();
    }

    let mut closes: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for sample in samples {
        if let Some(date) = sample_date(sample) {
            // Later samples overwrite earlier ones of the same day
            closes.insert(date, sample.price);
        }
    }

    let skip = closes.len().saturating_sub(days as usize);
    closes.into_iter().skip(skip).map(|(date, price)| point(date, price)).collect()
}

pub fn build_history(samples: &[PriceSample], days: u32, daily_close: bool) -> PriceHistory {
    PriceHistory {
        data: build_points(samples, days, daily_close),
        currency: CURRENCY.to_string(),
        period: period_label(days),
    }
}
