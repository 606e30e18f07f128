use async_trait::async_trait;

use devis_core::errors::{Error, PersistenceError, Result};
use devis_core::fx::{ExchangeRate, ExchangeRateProviderTrait, FxError};

use crate::client::ApiClient;
use crate::dto::ExchangeRateResponse;

/// Source tag when the API does not name its own.
const API_RATE_SOURCE: &str = "API";

#[async_trait]
impl ExchangeRateProviderTrait for ApiClient {
    async fn get_exchange_rate(&self, from: &str, to: &str) -> Result<ExchangeRate> {
        let response: ExchangeRateResponse = self
            .get_with_query("/exchange-rates", &[("from", from), ("to", to)])
            .await
            .map_err(|e| match e {
                Error::Persistence(PersistenceError::NotFound(_)) => {
                    Error::from(FxError::RateNotFound(ExchangeRate::pair_key(from, to)))
                }
                Error::Persistence(other) => Error::from(FxError::FetchError(other.to_string())),
                other => other,
            })?;
        let source = response.source.as_deref().unwrap_or(API_RATE_SOURCE);
        Ok(ExchangeRate::new(from, to, response.rate, source))
    }
}
