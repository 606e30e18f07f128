use async_trait::async_trait;

use super::fx_model::ExchangeRate;
use crate::errors::Result;
use crate::settings::CurrencyPair;

/// Source of live exchange rates (remote API, market data feed, ...).
#[async_trait]
pub trait ExchangeRateProviderTrait: Send + Sync {
    async fn get_exchange_rate(&self, from: &str, to: &str) -> Result<ExchangeRate>;
}

/// Trait defining the contract for FX service operations.
#[async_trait]
pub trait FxServiceTrait: Send + Sync {
    /// Latest live rate for a pair, tagged with its provider's source.
    /// Identical currencies always yield 1.
    async fn get_latest_exchange_rate(&self, from: &str, to: &str) -> Result<ExchangeRate>;

    /// Live rate for the pair, or the pair's fallback rate when the provider
    /// fails or returns an unusable rate. Never fails.
    async fn rate_or_fallback(&self, pair: &CurrencyPair) -> ExchangeRate;
}
