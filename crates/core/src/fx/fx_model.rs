use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    #[serde(serialize_with = "serialize_decimal_6")]
    pub rate: Decimal,
    /// Where the rate came from (provider name, or "FALLBACK")
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

impl ExchangeRate {
    pub const FALLBACK_SOURCE: &'static str = "FALLBACK";
    pub const IDENTITY_SOURCE: &'static str = "IDENTITY";

    pub fn new(from: &str, to: &str, rate: Decimal, source: &str) -> Self {
        Self {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            rate,
            source: source.to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a pair key in the format "EUR/TND".
    pub fn pair_key(from: &str, to: &str) -> String {
        format!("{}/{}", from, to)
    }

    pub fn is_fallback(&self) -> bool {
        self.source == Self::FALLBACK_SOURCE
    }
}

/// ISO 4217 style check: exactly three ASCII letters.
pub fn is_valid_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

fn serialize_decimal_6<S>(decimal: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let rounded = decimal.round_dp(6);
    serializer.serialize_str(&rounded.to_string())
}
