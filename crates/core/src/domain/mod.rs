pub mod alert;
pub mod dashboard;
pub mod product;
pub mod transaction;
pub mod user;
