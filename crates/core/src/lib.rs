//! Devis Core - Domain entities, services, and traits.
//!
//! This crate contains the pricing and versioning logic for HVAC quotes.
//! It is transport-agnostic and defines traits that are implemented by the
//! `devis-api-client` crate.

pub mod clients;
pub mod constants;
pub mod errors;
pub mod events;
pub mod fx;
pub mod ids;
pub mod quotes;
pub mod settings;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
