//! Quote persistence traits.
//!
//! The quote store talks to the remote quote API only through this trait,
//! so the HTTP client and test doubles are interchangeable.
//!
//! # Design Notes
//!
//! - Every method is async: each call is one request/response round trip
//! - No call is retried and no sequence of calls is atomic. Creating a
//!   quote then its items is several independent requests
//! - Implementations report failures as [`crate::errors::PersistenceError`]

use async_trait::async_trait;

use super::model::{LaborItem, Quote, SupplyItem};
use crate::errors::Result;

/// Remote storage interface for quotes and their line items.
#[async_trait]
pub trait QuotePersistenceTrait: Send + Sync {
    /// Fetches a quote with its items. A missing quote is `PersistenceError::NotFound`.
    async fn get_quote_by_id(&self, quote_id: &str) -> Result<Quote>;

    /// Submits a quote record (header fields, rates, totals) and returns
    /// the record as stored by the server.
    async fn save_quote(&self, quote: &Quote) -> Result<Quote>;

    /// Attaches a supply line to an already saved quote.
    async fn create_supply_item(&self, quote_id: &str, item: &SupplyItem) -> Result<SupplyItem>;

    /// Attaches a labor line to an already saved quote.
    async fn create_labor_item(&self, quote_id: &str, item: &LaborItem) -> Result<LaborItem>;

    /// Sets the confirmation flag and external reference number.
    async fn confirm_quote(
        &self,
        quote_id: &str,
        confirmed: bool,
        reference_number: &str,
    ) -> Result<Quote>;

    async fn delete_quote(&self, quote_id: &str) -> Result<()>;
}
