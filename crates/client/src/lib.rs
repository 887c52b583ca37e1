//! REST collaborators for the inventory dashboard.
//!
//! Everything here talks to the inventory API (or an in-memory stand-in) and
//! hands plain domain values back to the caller. Session state is an explicit
//! [`SessionContext`] value: it is created on login and torn down on logout,
//! and every authenticated call goes through the [`ApiClient`] it yields.

pub mod alerts;
pub mod api;
pub mod catalog;
pub mod error;
pub mod ledger;
pub mod memory;
pub mod session;
pub mod users;

pub use alerts::{AlertFeed, AlertPoller, AlertPollerHandle, HttpAlertFeed};
pub use api::ApiClient;
pub use catalog::{CatalogStore, HttpCatalogStore};
pub use error::ClientError;
pub use memory::{InMemoryAlertFeed, InMemoryCatalogStore};
pub use session::{Session, SessionContext};
