use async_trait::async_trait;
use log::{debug, info};

use devis_core::errors::Result;
use devis_core::quotes::{LaborItem, Quote, QuotePersistenceTrait, SupplyItem};

use crate::client::{segment, ApiClient};
use crate::dto::ConfirmQuoteRequest;

#[async_trait]
impl QuotePersistenceTrait for ApiClient {
    async fn get_quote_by_id(&self, quote_id: &str) -> Result<Quote> {
        self.get(&format!("/quotes/{}", segment(quote_id))).await
    }

    async fn save_quote(&self, quote: &Quote) -> Result<Quote> {
        let stored: Quote = self.post("/quotes", quote).await?;
        info!(
            "[DevisApi] Stored quote {} (version {})",
            stored.id, stored.version
        );
        Ok(stored)
    }

    async fn create_supply_item(&self, quote_id: &str, item: &SupplyItem) -> Result<SupplyItem> {
        let stored: SupplyItem = self
            .post(&format!("/quotes/{}/supplies", segment(quote_id)), item)
            .await?;
        debug!("[DevisApi] Stored supply item {} on {}", stored.id, quote_id);
        Ok(stored)
    }

    async fn create_labor_item(&self, quote_id: &str, item: &LaborItem) -> Result<LaborItem> {
        let stored: LaborItem = self
            .post(&format!("/quotes/{}/labor", segment(quote_id)), item)
            .await?;
        debug!("[DevisApi] Stored labor item {} on {}", stored.id, quote_id);
        Ok(stored)
    }

    async fn confirm_quote(
        &self,
        quote_id: &str,
        confirmed: bool,
        reference_number: &str,
    ) -> Result<Quote> {
        let body = ConfirmQuoteRequest {
            confirmed,
            reference_number,
        };
        self.patch(&format!("/quotes/{}/confirm", segment(quote_id)), &body)
            .await
    }

    async fn delete_quote(&self, quote_id: &str) -> Result<()> {
        self.delete(&format!("/quotes/{}", segment(quote_id))).await?;
        info!("[DevisApi] Deleted quote {}", quote_id);
        Ok(())
    }
}
