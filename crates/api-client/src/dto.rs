//! Wire types that have no counterpart in the core models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConfirmQuoteRequest<'a> {
    pub confirmed: bool,
    pub reference_number: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExchangeRateResponse {
    pub rate: Decimal,
    #[serde(default)]
    pub source: Option<String>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorResponse {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}
