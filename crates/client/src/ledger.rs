use stockdesk_core::domain::dashboard::DashboardStats;
use stockdesk_core::domain::transaction::{NewTransaction, Transaction};
use tracing::info;

use crate::api::{ApiClient, Auth};
use crate::error::ClientError;

impl ApiClient {
    /// Most recent transactions, newest first.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, ClientError> {
        self.get_json("/transactions").await
    }

    pub async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> Result<Transaction, ClientError> {
        transaction.validate()?;
        let created: Transaction =
            self.post_json("/transactions", transaction, Auth::Required).await?;
        info!(
            event_name = "client.ledger.transaction_recorded",
            product_id = %created.product_id,
            kind = ?created.kind,
            quantity = created.quantity,
            "transaction recorded"
        );
        Ok(created)
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        self.get_json("/dashboard/stats").await
    }
}
