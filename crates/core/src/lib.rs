pub mod config;
pub mod domain;
pub mod errors;

pub use domain::alert::{Alert, AlertId, AlertKind};
pub use domain::dashboard::{
    CatalogSummary, DashboardStats, LowStockItem, DEFAULT_LOW_STOCK_THRESHOLD,
};
pub use domain::product::{Product, ProductDraft, ProductForm, ProductId, ProductPatch, StockStatus};
pub use domain::transaction::{NewTransaction, Transaction, TransactionId, TransactionKind};
pub use domain::user::{NewUser, Role, User, UserId};
pub use errors::DomainError;
