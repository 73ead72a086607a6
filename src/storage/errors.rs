use thiserror::Error;

use crate::types::TransactionId;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Persistence unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
    #[error("Amount [{value}] of transaction [{id:?}] cannot be represented")]
    InvalidAmount {
        id: Option<TransactionId>,
        value: String
    }
}
