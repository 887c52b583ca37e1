use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::alert::Alert;
use crate::domain::product::{Product, ProductId, StockStatus};
use crate::domain::transaction::Transaction;
use crate::errors::DomainError;

pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

/// Totals as computed by the inventory API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_stock: u64,
    pub low_stock_count: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value: Decimal,
    pub total_products: u64,
    #[serde(default)]
    pub recent_transactions: Vec<Transaction>,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LowStockItem {
    pub product_id: ProductId,
    pub name: String,
    pub stock: u32,
    pub status: StockStatus,
}

/// Totals computed locally from a catalog snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CatalogSummary {
    pub total_products: usize,
    pub total_stock: u64,
    pub total_value: Decimal,
    pub low_stock_threshold: u32,
    pub low_stock: Vec<LowStockItem>,
}

impl CatalogSummary {
    /// Fails when the inventory value does not fit in a `Decimal`.
    pub fn from_products(
        products: &[Product],
        low_stock_threshold: u32,
    ) -> Result<Self, DomainError> {
        let total_stock = products.iter().map(|product| u64::from(product.stock)).sum();
        let total_value = products
            .iter()
            .try_fold(Decimal::ZERO, |total, product| {
                product.stock_value().and_then(|value| total.checked_add(value))
            })
            .ok_or_else(|| {
                DomainError::InvariantViolation(
                    "inventory value exceeds the representable range".to_owned(),
                )
            })?;
        let low_stock = products
            .iter()
            .filter(|product| product.stock < low_stock_threshold)
            .map(|product| LowStockItem {
                product_id: product.id.clone(),
                name: product.name.clone(),
                stock: product.stock,
                status: product.stock_status(low_stock_threshold),
            })
            .collect();

        Ok(Self {
            total_products: products.len(),
            total_stock,
            total_value,
            low_stock_threshold,
            low_stock,
        })
    }

    pub fn low_stock_count(&self) -> usize {
        self.low_stock.len()
    }
}
