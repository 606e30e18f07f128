//! Client repository and service traits.
//!
//! These traits define the contract for reference-entity operations without
//! any transport-specific types. The HTTP client crate implements the
//! repository.

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::clients_model::{Client, NewClient, NewSite, NewSplit, Site, Split};
use crate::errors::Result;

/// Trait defining the contract for client, site and split storage.
///
/// A duplicate client ID is reported as `PersistenceError::Conflict`.
#[async_trait]
pub trait ClientRepositoryTrait: Send + Sync {
    async fn list_clients(&self) -> Result<Vec<Client>>;

    /// Retrieves a client by its ID. A missing client is `PersistenceError::NotFound`.
    async fn get_client(&self, client_id: &str) -> Result<Client>;

    /// Stores a client whose ID was chosen by the caller.
    async fn create_client(&self, client: &Client) -> Result<Client>;

    async fn list_sites(&self, client_id: &str) -> Result<Vec<Site>>;

    async fn create_site(&self, new_site: &NewSite) -> Result<Site>;

    async fn list_splits(&self, site_id: &str) -> Result<Vec<Split>>;

    async fn create_split(&self, new_split: &NewSplit) -> Result<Split>;
}

/// Trait defining the contract for client service operations.
#[async_trait]
pub trait ClientServiceTrait: Send + Sync {
    /// Creates a client with the next sequential ID.
    async fn create_client(&self, new_client: NewClient) -> Result<Client>;

    async fn get_client(&self, client_id: &str) -> Result<Client>;

    async fn list_clients(&self) -> Result<Vec<Client>>;

    /// Creates a site under an existing client.
    async fn create_site(&self, new_site: NewSite) -> Result<Site>;

    async fn list_sites(&self, client_id: &str) -> Result<Vec<Site>>;

    async fn create_split(&self, new_split: NewSplit) -> Result<Split>;

    async fn list_splits(&self, site_id: &str) -> Result<Vec<Split>>;

    /// Margin rate to seed a new quote for this client.
    async fn margin_rate_for(&self, client_id: &str) -> Result<Decimal>;
}
