//! Row types matching the `transactions` and `alerts` tables.

use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

use crate::models::{Alert, Transaction};
use crate::storage::StorageError;
use crate::types::{AlertId, TransactionId, UserId};

#[derive(Debug, sqlx::FromRow)]
pub struct TransactionRow {
    pub id: TransactionId,
    pub timestamp: String,
    pub amount: f64,
    pub merchant: String,
    pub user_id: UserId,
    pub category: Option<String>
}

#[derive(Debug, sqlx::FromRow)]
pub struct AlertRow {
    pub id: AlertId,
    pub transaction_id: Option<TransactionId>,
    pub reason: String,
    pub timestamp: String
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = StorageError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let amount = Decimal::from_f64(row.amount).ok_or_else(|| StorageError::InvalidAmount {
            id: Some(row.id),
            value: row.amount.to_string()
        })?;

        Ok(Self {
            id: Some(row.id),
            timestamp: row.timestamp,
            amount,
            merchant: row.merchant,
            user_id: row.user_id,
            category: row.category
        })
    }
}

impl From<AlertRow> for Alert {
    fn from(row: AlertRow) -> Self {
        Self {
            id: Some(row.id),
            transaction_id: row.transaction_id,
            reason: row.reason,
            timestamp: row.timestamp
        }
    }
}

/// Converts an amount to the `REAL` stored in SQLite.
pub fn to_real(transaction: &Transaction) -> Result<f64, StorageError> {
    transaction.amount.to_f64().ok_or_else(|| StorageError::InvalidAmount {
        id: transaction.id,
        value: transaction.amount.to_string()
    })
}
