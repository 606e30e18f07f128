use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::fx_errors::FxError;
use super::fx_model::{is_valid_currency_code, ExchangeRate};
use super::fx_traits::{ExchangeRateProviderTrait, FxServiceTrait};
use crate::errors::Result;
use crate::settings::CurrencyPair;

#[derive(Clone)]
pub struct FxService {
    provider: Arc<dyn ExchangeRateProviderTrait>,
}

impl FxService {
    pub fn new(provider: Arc<dyn ExchangeRateProviderTrait>) -> Self {
        Self { provider }
    }

    fn validate_pair(from: &str, to: &str) -> Result<()> {
        for code in [from, to] {
            if !is_valid_currency_code(code) {
                return Err(FxError::InvalidCurrencyCode(code.to_string()).into());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl FxServiceTrait for FxService {
    async fn get_latest_exchange_rate(&self, from: &str, to: &str) -> Result<ExchangeRate> {
        Self::validate_pair(from, to)?;

        if from.eq_ignore_ascii_case(to) {
            return Ok(ExchangeRate::new(
                from,
                to,
                Decimal::ONE,
                ExchangeRate::IDENTITY_SOURCE,
            ));
        }

        let rate = self.provider.get_exchange_rate(from, to).await?;
        if rate.rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(format!(
                "{} returned {} for {}",
                rate.source,
                rate.rate,
                ExchangeRate::pair_key(from, to)
            ))
            .into());
        }

        log::debug!(
            "Fetched {} = {} from {}",
            ExchangeRate::pair_key(from, to),
            rate.rate,
            rate.source
        );
        Ok(rate)
    }

    async fn rate_or_fallback(&self, pair: &CurrencyPair) -> ExchangeRate {
        match self.get_latest_exchange_rate(&pair.from, &pair.to).await {
            Ok(live) => live,
            Err(e) => {
                log::warn!(
                    "No live rate for {} ({}). Using fallback rate {}",
                    ExchangeRate::pair_key(&pair.from, &pair.to),
                    e,
                    pair.fallback_rate
                );
                ExchangeRate::new(
                    &pair.from,
                    &pair.to,
                    pair.fallback_rate,
                    ExchangeRate::FALLBACK_SOURCE,
                )
            }
        }
    }
}
