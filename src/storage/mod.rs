pub mod alert_store;
mod database;
mod errors;
mod models;
pub mod transaction_store;

use crate::models::{Alert, Transaction};

pub use database::Database;
pub use errors::StorageError;

/// Read side consumed by reporting: the full accumulated history in storage order.
#[allow(async_fn_in_trait)]
pub trait ReportingView {
    async fn all_transactions(&self) -> Result<Vec<Transaction>, StorageError>;
    async fn all_alerts(&self) -> Result<Vec<Alert>, StorageError>;
}
