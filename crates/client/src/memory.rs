use async_trait::async_trait;
use chrono::Utc;
use stockdesk_core::domain::alert::{Alert, AlertId};
use stockdesk_core::domain::product::{Product, ProductDraft, ProductId, ProductPatch};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::alerts::AlertFeed;
use crate::catalog::{check_patch, validate_draft, CatalogStore};
use crate::error::ClientError;

/// Catalog kept in process memory, in insertion order.
#[derive(Default)]
pub struct InMemoryCatalogStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryCatalogStore {
    pub fn seeded(products: Vec<Product>) -> Self {
        Self { products: RwLock::new(products) }
    }

    pub async fn snapshot(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        Ok(self.snapshot().await)
    }

    async fn create_product(&self, draft: ProductDraft) -> Result<Product, ClientError> {
        validate_draft(&draft)?;
        let product = draft.into_product(ProductId(Uuid::new_v4().to_string()), Utc::now());
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, ClientError> {
        check_patch(&patch)?;
        let mut products = self.products.write().await;
        let product = products
            .iter_mut()
            .find(|product| &product.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("product {id}")))?;

        product.apply(patch);
        product.updated_at = Some(Utc::now());
        Ok(product.clone())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), ClientError> {
        let mut products = self.products.write().await;
        let index = products
            .iter()
            .position(|product| &product.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("product {id}")))?;
        products.remove(index);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryAlertFeed {
    alerts: RwLock<Vec<Alert>>,
}

impl InMemoryAlertFeed {
    pub fn new(alerts: Vec<Alert>) -> Self {
        Self { alerts: RwLock::new(alerts) }
    }

    pub async fn push(&self, alert: Alert) {
        self.alerts.write().await.push(alert);
    }
}

#[async_trait]
impl AlertFeed for InMemoryAlertFeed {
    async fn unread_alerts(&self) -> Result<Vec<Alert>, ClientError> {
        let alerts = self.alerts.read().await;
        let mut unread: Vec<Alert> = alerts.iter().filter(|alert| !alert.is_read).cloned().collect();
        unread.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(unread)
    }

    async fn mark_read(&self, id: &AlertId) -> Result<(), ClientError> {
        let mut alerts = self.alerts.write().await;
        let alert = alerts
            .iter_mut()
            .find(|alert| &alert.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("alert {id}")))?;
        alert.is_read = true;
        Ok(())
    }
}
