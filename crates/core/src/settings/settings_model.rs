//! Pricing settings domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LABOR_EXCHANGE_RATE, DEFAULT_LABOR_FROM_CURRENCY, DEFAULT_LABOR_TO_CURRENCY,
    DEFAULT_MARGIN_RATE, DEFAULT_SUPPLY_EXCHANGE_RATE, DEFAULT_SUPPLY_FROM_CURRENCY,
    DEFAULT_SUPPLY_TO_CURRENCY, DEFAULT_VAT_RATE, DEFAULT_WEEKEND_MULTIPLIER,
};
use crate::errors::{QuoteError, Result};

/// A conversion direction together with the rate used when no live rate is available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyPair {
    pub from: String,
    pub to: String,
    pub fallback_rate: Decimal,
}

impl CurrencyPair {
    pub fn new(from: &str, to: &str, fallback_rate: Decimal) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            fallback_rate,
        }
    }
}

/// Compiled-in pricing defaults, overridable by the composition root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSettings {
    pub vat_rate: Decimal,
    pub default_margin_rate: Decimal,
    pub weekend_multiplier: Decimal,
    pub supply_currency: CurrencyPair,
    pub labor_currency: CurrencyPair,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            vat_rate: DEFAULT_VAT_RATE,
            default_margin_rate: DEFAULT_MARGIN_RATE,
            weekend_multiplier: DEFAULT_WEEKEND_MULTIPLIER,
            supply_currency: CurrencyPair::new(
                DEFAULT_SUPPLY_FROM_CURRENCY,
                DEFAULT_SUPPLY_TO_CURRENCY,
                DEFAULT_SUPPLY_EXCHANGE_RATE,
            ),
            labor_currency: CurrencyPair::new(
                DEFAULT_LABOR_FROM_CURRENCY,
                DEFAULT_LABOR_TO_CURRENCY,
                DEFAULT_LABOR_EXCHANGE_RATE,
            ),
        }
    }
}

impl QuoteSettings {
    /// Rejects settings that would make every quote unpriceable.
    pub fn validate(&self) -> Result<()> {
        if self.vat_rate < Decimal::ZERO {
            return Err(QuoteError::InvalidInput(format!(
                "VAT rate cannot be negative: {}",
                self.vat_rate
            ))
            .into());
        }
        if self.default_margin_rate < Decimal::ZERO || self.default_margin_rate >= Decimal::ONE {
            return Err(QuoteError::InvalidMarginRate(self.default_margin_rate.to_string()).into());
        }
        if self.weekend_multiplier < Decimal::ZERO {
            return Err(QuoteError::InvalidInput(format!(
                "Weekend multiplier cannot be negative: {}",
                self.weekend_multiplier
            ))
            .into());
        }
        for pair in [&self.supply_currency, &self.labor_currency] {
            if pair.fallback_rate < Decimal::ZERO {
                return Err(QuoteError::InvalidInput(format!(
                    "Fallback rate {}/{} cannot be negative",
                    pair.from, pair.to
                ))
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_are_valid() {
        let settings = QuoteSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.vat_rate, dec!(0.19));
        assert_eq!(settings.supply_currency.from, "EUR");
        assert_eq!(settings.labor_currency.fallback_rate, dec!(1));
    }

    #[test]
    fn test_rejects_full_margin() {
        let settings = QuoteSettings {
            default_margin_rate: dec!(1),
            ..QuoteSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_vat() {
        let settings = QuoteSettings {
            vat_rate: dec!(-0.1),
            ..QuoteSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(QuoteSettings::default()).unwrap();
        assert!(json.get("vatRate").is_some());
        assert!(json["supplyCurrency"].get("fallbackRate").is_some());
    }
}
