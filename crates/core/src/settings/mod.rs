//! Settings module - pricing configuration shared by the quote engine.

mod settings_model;

pub use settings_model::{CurrencyPair, QuoteSettings};
