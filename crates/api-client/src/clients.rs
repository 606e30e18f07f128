use async_trait::async_trait;
use log::info;

use devis_core::clients::{Client, ClientRepositoryTrait, NewSite, NewSplit, Site, Split};
use devis_core::errors::Result;

use crate::client::{segment, ApiClient};

#[async_trait]
impl ClientRepositoryTrait for ApiClient {
    async fn list_clients(&self) -> Result<Vec<Client>> {
        self.get("/clients").await
    }

    async fn get_client(&self, client_id: &str) -> Result<Client> {
        self.get(&format!("/clients/{}", segment(client_id))).await
    }

    async fn create_client(&self, client: &Client) -> Result<Client> {
        let stored: Client = self.post("/clients", client).await?;
        info!("[DevisApi] Stored client {}", stored.id);
        Ok(stored)
    }

    async fn list_sites(&self, client_id: &str) -> Result<Vec<Site>> {
        self.get(&format!("/clients/{}/sites", segment(client_id)))
            .await
    }

    async fn create_site(&self, new_site: &NewSite) -> Result<Site> {
        self.post(
            &format!("/clients/{}/sites", segment(&new_site.client_id)),
            new_site,
        )
        .await
    }

    async fn list_splits(&self, site_id: &str) -> Result<Vec<Split>> {
        self.get(&format!("/sites/{}/splits", segment(site_id))).await
    }

    async fn create_split(&self, new_split: &NewSplit) -> Result<Split> {
        self.post(
            &format!("/sites/{}/splits", segment(&new_split.site_id)),
            new_split,
        )
        .await
    }
}
