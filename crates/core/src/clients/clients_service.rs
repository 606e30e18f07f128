use async_trait::async_trait;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use super::clients_model::{Client, NewClient, NewSite, NewSplit, Site, Split};
use super::clients_traits::{ClientRepositoryTrait, ClientServiceTrait};
use crate::constants::CLIENT_ID_MAX_ATTEMPTS;
use crate::errors::{Error, PersistenceError, QuoteError, Result};
use crate::events::{DomainEvent, DomainEventSink, NoOpDomainEventSink};
use crate::ids::next_client_id;

/// Service for managing clients and their sites.
pub struct ClientService {
    repository: Arc<dyn ClientRepositoryTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl ClientService {
    pub fn new(repository: Arc<dyn ClientRepositoryTrait>) -> Self {
        Self {
            repository,
            event_sink: Arc::new(NoOpDomainEventSink),
        }
    }

    /// Sets the domain event sink for this service.
    pub fn with_event_sink(mut self, event_sink: Arc<dyn DomainEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    /// Fetches a client, reporting a miss as `QuoteError::NotFound`.
    async fn require_client(&self, client_id: &str) -> Result<Client> {
        self.repository
            .get_client(client_id)
            .await
            .map_err(|e| match e {
                Error::Persistence(PersistenceError::NotFound(_)) => {
                    Error::from(QuoteError::NotFound(format!("Client {} not found", client_id)))
                }
                other => other,
            })
    }
}

#[async_trait]
impl ClientServiceTrait for ClientService {
    /// Picks the next sequential ID from the current client list. When
    /// another writer took the same ID first the list is refetched and the
    /// creation retried, up to `CLIENT_ID_MAX_ATTEMPTS` times.
    async fn create_client(&self, new_client: NewClient) -> Result<Client> {
        new_client.validate()?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let existing_ids: Vec<String> = self
                .repository
                .list_clients()
                .await?
                .into_iter()
                .map(|client| client.id)
                .collect();
            let candidate = new_client.clone().into_client(next_client_id(&existing_ids));
            debug!("Creating client {} (attempt {})", candidate.id, attempt);

            match self.repository.create_client(&candidate).await {
                Ok(created) => {
                    info!("Created client {} ({})", created.id, created.name);
                    self.event_sink.emit(DomainEvent::client_created(&created.id));
                    return Ok(created);
                }
                Err(Error::Persistence(PersistenceError::Conflict(reason)))
                    if attempt < CLIENT_ID_MAX_ATTEMPTS =>
                {
                    warn!(
                        "Client ID {} already taken ({}), retrying",
                        candidate.id, reason
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_client(&self, client_id: &str) -> Result<Client> {
        self.require_client(client_id).await
    }

    async fn list_clients(&self) -> Result<Vec<Client>> {
        self.repository.list_clients().await
    }

    async fn create_site(&self, new_site: NewSite) -> Result<Site> {
        new_site.validate()?;
        self.require_client(&new_site.client_id).await?;
        let site = self.repository.create_site(&new_site).await?;
        debug!("Created site {} for client {}", site.id, site.client_id);
        Ok(site)
    }

    async fn list_sites(&self, client_id: &str) -> Result<Vec<Site>> {
        self.repository.list_sites(client_id).await
    }

    async fn create_split(&self, new_split: NewSplit) -> Result<Split> {
        new_split.validate()?;
        let split = self.repository.create_split(&new_split).await?;
        debug!("Created split {} for site {}", split.id, split.site_id);
        Ok(split)
    }

    async fn list_splits(&self, site_id: &str) -> Result<Vec<Split>> {
        self.repository.list_splits(site_id).await
    }

    async fn margin_rate_for(&self, client_id: &str) -> Result<Decimal> {
        let client = self.require_client(client_id).await?;
        if client.margin_rate < Decimal::ZERO || client.margin_rate >= Decimal::ONE {
            return Err(QuoteError::InvalidMarginRate(client.margin_rate.to_string()).into());
        }
        Ok(client.margin_rate)
    }
}
