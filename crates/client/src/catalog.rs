use async_trait::async_trait;
use stockdesk_core::domain::product::{Product, ProductDraft, ProductId, ProductPatch};
use stockdesk_core::errors::DomainError;
use tracing::info;

use crate::api::{ApiClient, Auth};
use crate::error::ClientError;

/// Product catalog operations shared by the HTTP and in-memory stores.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError>;
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, ClientError>;
    async fn update_product(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, ClientError>;
    async fn delete_product(&self, id: &ProductId) -> Result<(), ClientError>;
}

pub struct HttpCatalogStore {
    api: ApiClient,
}

impl HttpCatalogStore {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CatalogStore for HttpCatalogStore {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        self.api.get_json("/products").await
    }

    async fn create_product(&self, draft: ProductDraft) -> Result<Product, ClientError> {
        validate_draft(&draft)?;
        let product: Product = self.api.post_json("/products", &draft, Auth::Required).await?;
        info!(
            event_name = "client.catalog.product_created",
            product_id = %product.id,
            stock = product.stock,
            "product created"
        );
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, ClientError> {
        check_patch(&patch)?;
        let product: Product = self.api.put_json(&product_path(id), &patch).await?;
        info!(event_name = "client.catalog.product_updated", product_id = %id, "product updated");
        Ok(product)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), ClientError> {
        self.api.delete(&product_path(id)).await?;
        info!(event_name = "client.catalog.product_deleted", product_id = %id, "product deleted");
        Ok(())
    }
}

fn product_path(id: &ProductId) -> String {
    format!("/products/{id}")
}

/// Re-runs the constructor checks; drafts built by hand can skip them.
pub(crate) fn validate_draft(draft: &ProductDraft) -> Result<(), DomainError> {
    ProductDraft::new(
        draft.name.as_str(),
        draft.brand.as_str(),
        draft.model.as_str(),
        draft.base_price,
        draft.stock,
    )
    .map(|_| ())
}

pub(crate) fn check_patch(patch: &ProductPatch) -> Result<(), DomainError> {
    if patch.is_empty() {
        return Err(DomainError::invalid("patch", "at least one field must be set"));
    }
    patch.validate()
}
