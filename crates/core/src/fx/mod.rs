//! FX (Foreign Exchange) module - exchange-rate models, services, and traits.

mod fx_errors;
mod fx_model;
mod fx_service;
mod fx_traits;

pub use fx_errors::FxError;
pub use fx_model::{is_valid_currency_code, ExchangeRate};
pub use fx_service::FxService;
pub use fx_traits::{ExchangeRateProviderTrait, FxServiceTrait};
