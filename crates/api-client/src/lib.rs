//! Devis API client - HTTP persistence for the devis quote engine.
//!
//! [`ApiClient`] implements the core persistence traits against the remote
//! REST API:
//! - [`devis_core::quotes::QuotePersistenceTrait`]
//! - [`devis_core::clients::ClientRepositoryTrait`]
//! - [`devis_core::fx::ExchangeRateProviderTrait`]

mod client;
mod clients;
mod dto;
mod fx;
mod quotes;

pub use client::{ApiClient, DEFAULT_API_URL};
