// Convert wire numbers (strings or JSON floats) into exact decimals.
// Providers disagree on encoding: Binance quotes strings, CoinGecko floats.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::error::UpstreamError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormaliseError {
    #[error("field `{field}` is not a number: {raw:?}")]
    NotANumber { field: &'static str, raw: String },

    #[error("field `{field}` is not finite")]
    NotFinite { field: &'static str },

    #[error("field `{field}` is missing")]
    Missing { field: &'static str },
}

impl NormaliseError {
    pub fn into_upstream(self, provider: &'static str) -> UpstreamError {
        UpstreamError::Payload { provider, message: self.to_string() }
    }
}

pub struct Normaliser {
    pub provider: &'static str,
}

impl Normaliser {
    pub fn new(provider: &'static str) -> Self {
        Self { provider }
    }

    pub fn decimal_from_str(&self, field: &'static str, s: &str) -> Result<Decimal, UpstreamError> {
        let trimmed = s.trim();
        // Scientific notation shows up on tiny sizes from some venues
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| NormaliseError::NotANumber { field, raw: s.to_string() }.into_upstream(self.provider))
    }

    pub fn decimal_from_f64(&self, field: &'static str, v: f64) -> Result<Decimal, UpstreamError> {
        if !v.is_finite() {
            return Err(NormaliseError::NotFinite { field }.into_upstream(self.provider));
        }
        Decimal::from_f64(v).ok_or_else(|| {
            NormaliseError::NotANumber { field, raw: v.to_string() }.into_upstream(self.provider)
        })
    }

    /// JSON values that may be a number or a numeric string.
    pub fn decimal_from_json(&self, field: &'static str, v: &serde_json::Value) -> Result<Decimal, UpstreamError> {
        match v {
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) => self.decimal_from_f64(field, f),
                None => Err(NormaliseError::NotANumber { field, raw: n.to_string() }.into_upstream(self.provider)),
            },
            serde_json::Value::String(s) => self.decimal_from_str(field, s),
            serde_json::Value::Null => Err(NormaliseError::Missing { field }.into_upstream(self.provider)),
            other => Err(NormaliseError::NotANumber { field, raw: other.to_string() }.into_upstream(self.provider)),
        }
    }

    pub fn optional_from_f64(&self, field: &'static str, v: Option<f64>) -> Result<Option<Decimal>, UpstreamError> {
        v.map(|f| self.decimal_from_f64(field, f)).transpose()
    }

    /// Book level `[price, size]` as two strings.
    pub fn level(&self, level: &[String; 2]) -> Result<(Decimal, Decimal), UpstreamError> {
        let price = self.decimal_from_str("price", &level[0])?;
        let size = self.decimal_from_str("size", &level[1])?;
        Ok((price, size))
    }
}
