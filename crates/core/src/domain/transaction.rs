use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;
use crate::domain::user::UserId;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Purchase,
    Adjustment,
}

impl TransactionKind {
    /// Signed effect on stock on hand. Adjustments are recorded without moving stock.
    pub fn stock_delta(self, quantity: u32) -> i64 {
        match self {
            Self::Sale => -i64::from(quantity),
            Self::Purchase => i64::from(quantity),
            Self::Adjustment => 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub product_id: ProductId,
    pub user_id: UserId,
    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub product_id: ProductId,
    #[serde(rename = "transaction_type")]
    pub kind: TransactionKind,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.quantity == 0 && self.kind != TransactionKind::Adjustment {
            return Err(DomainError::invalid("quantity", "must be greater than zero"));
        }
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(DomainError::invalid("price", "must not be negative"));
        }
        Ok(())
    }
}
