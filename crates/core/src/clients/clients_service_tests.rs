//! Tests for ClientService: sequential IDs, conflict retry, and site ownership.

#[cfg(test)]
mod tests {
    use crate::clients::{
        Client, ClientRepositoryTrait, ClientService, ClientServiceTrait, NewClient, NewSite,
        NewSplit, Site, Split,
    };
    use crate::errors::{Error, PersistenceError, QuoteError, Result};
    use crate::events::MockDomainEventSink;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // =========================================================================
    // Mock repository
    // =========================================================================

    #[derive(Clone, Default)]
    struct MockClientRepository {
        clients: Arc<Mutex<Vec<Client>>>,
        sites: Arc<Mutex<Vec<Site>>>,
        splits: Arc<Mutex<Vec<Split>>>,
        /// Clients another writer inserts right before each create, simulating a race
        racing_inserts: Arc<Mutex<Vec<Client>>>,
        create_attempts: Arc<Mutex<usize>>,
    }

    impl MockClientRepository {
        fn with_clients(ids: &[&str]) -> Self {
            let repo = Self::default();
            for id in ids {
                repo.clients.lock().unwrap().push(client(id, "Existing"));
            }
            repo
        }

        fn race_with(&self, ids: &[&str]) {
            let mut racing = self.racing_inserts.lock().unwrap();
            for id in ids {
                racing.push(client(id, "Concurrent"));
            }
        }

        fn create_attempts(&self) -> usize {
            *self.create_attempts.lock().unwrap()
        }
    }

    fn client(id: &str, name: &str) -> Client {
        Client {
            id: id.to_string(),
            name: name.to_string(),
            margin_rate: dec!(0.2),
            email: None,
            phone: None,
            address: None,
        }
    }

    #[async_trait]
    impl ClientRepositoryTrait for MockClientRepository {
        async fn list_clients(&self) -> Result<Vec<Client>> {
            Ok(self.clients.lock().unwrap().clone())
        }

        async fn get_client(&self, client_id: &str) -> Result<Client> {
            self.clients
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == client_id)
                .cloned()
                .ok_or_else(|| PersistenceError::NotFound(format!("Client {}", client_id)).into())
        }

        async fn create_client(&self, new: &Client) -> Result<Client> {
            *self.create_attempts.lock().unwrap() += 1;
            let mut clients = self.clients.lock().unwrap();
            let mut racing = self.racing_inserts.lock().unwrap();
            if !racing.is_empty() {
                clients.push(racing.remove(0));
            }
            if clients.iter().any(|c| c.id == new.id) {
                return Err(PersistenceError::Conflict(format!("Client {} exists", new.id)).into());
            }
            clients.push(new.clone());
            Ok(new.clone())
        }

        async fn list_sites(&self, client_id: &str) -> Result<Vec<Site>> {
            Ok(self
                .sites
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.client_id == client_id)
                .cloned()
                .collect())
        }

        async fn create_site(&self, new_site: &NewSite) -> Result<Site> {
            let mut sites = self.sites.lock().unwrap();
            let site = Site {
                id: format!("site-{}", sites.len() + 1),
                client_id: new_site.client_id.clone(),
                name: new_site.name.clone(),
                address: new_site.address.clone(),
            };
            sites.push(site.clone());
            Ok(site)
        }

        async fn list_splits(&self, site_id: &str) -> Result<Vec<Split>> {
            Ok(self
                .splits
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.site_id == site_id)
                .cloned()
                .collect())
        }

        async fn create_split(&self, new_split: &NewSplit) -> Result<Split> {
            let mut splits = self.splits.lock().unwrap();
            let split = Split {
                id: format!("split-{}", splits.len() + 1),
                site_id: new_split.site_id.clone(),
                name: new_split.name.clone(),
            };
            splits.push(split.clone());
            Ok(split)
        }
    }

    fn new_client(name: &str) -> NewClient {
        NewClient {
            name: name.to_string(),
            margin_rate: dec!(0.25),
            email: Some("achats@example.tn".to_string()),
            phone: None,
            address: None,
        }
    }

    // =========================================================================
    // create_client
    // =========================================================================

    #[tokio::test]
    async fn test_first_client_gets_0001() {
        let repo = MockClientRepository::default();
        let service = ClientService::new(Arc::new(repo.clone()));

        let created = service.create_client(new_client("SOTETEL")).await.unwrap();

        assert_eq!(created.id, "0001");
        assert_eq!(created.margin_rate, dec!(0.25));
    }

    #[tokio::test]
    async fn test_client_ids_are_sequential() {
        let repo = MockClientRepository::with_clients(&["0001", "0007", "legacy"]);
        let sink = MockDomainEventSink::new();
        let service =
            ClientService::new(Arc::new(repo.clone())).with_event_sink(Arc::new(sink.clone()));

        let created = service.create_client(new_client("Tunisair")).await.unwrap();

        assert_eq!(created.id, "0008");
        assert_eq!(sink.kinds(), vec!["client_created"]);
    }

    #[tokio::test]
    async fn test_conflict_is_retried_with_fresh_ids() {
        let repo = MockClientRepository::with_clients(&["0001"]);
        repo.race_with(&["0002"]);
        let service = ClientService::new(Arc::new(repo.clone()));

        let created = service.create_client(new_client("Délice")).await.unwrap();

        assert_eq!(created.id, "0003");
        assert_eq!(repo.create_attempts(), 2);
    }

    #[tokio::test]
    async fn test_conflict_retries_are_bounded() {
        let repo = MockClientRepository::with_clients(&["0001"]);
        repo.race_with(&["0002", "0003", "0004", "0005"]);
        let service = ClientService::new(Arc::new(repo.clone()));

        let result = service.create_client(new_client("Délice")).await;

        assert!(matches!(
            result,
            Err(Error::Persistence(PersistenceError::Conflict(_)))
        ));
        assert_eq!(repo.create_attempts(), 3);
    }

    #[tokio::test]
    async fn test_invalid_client_is_not_sent() {
        let repo = MockClientRepository::default();
        let service = ClientService::new(Arc::new(repo.clone()));

        let result = service.create_client(new_client(" ")).await;

        assert!(result.is_err());
        assert_eq!(repo.create_attempts(), 0);
    }

    // =========================================================================
    // lookups, sites and splits
    // =========================================================================

    #[tokio::test]
    async fn test_margin_rate_for_client() {
        let repo = MockClientRepository::with_clients(&["0004"]);
        let service = ClientService::new(Arc::new(repo));

        assert_eq!(service.margin_rate_for("0004").await.unwrap(), dec!(0.2));
        assert!(matches!(
            service.margin_rate_for("0005").await,
            Err(Error::Quote(QuoteError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_site_requires_existing_client() {
        let repo = MockClientRepository::with_clients(&["0001"]);
        let service = ClientService::new(Arc::new(repo));

        let orphan = service
            .create_site(NewSite {
                client_id: "0099".to_string(),
                name: "Dépôt".to_string(),
                address: None,
            })
            .await;
        assert!(matches!(orphan, Err(Error::Quote(QuoteError::NotFound(_)))));

        let site = service
            .create_site(NewSite {
                client_id: "0001".to_string(),
                name: "Dépôt".to_string(),
                address: Some("Zone industrielle, Ben Arous".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(service.list_sites("0001").await.unwrap(), vec![site.clone()]);

        let split = service
            .create_split(NewSplit {
                site_id: site.id.clone(),
                name: "Salle serveurs".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(service.list_splits(&site.id).await.unwrap(), vec![split]);
    }
}
