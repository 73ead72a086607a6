use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::RecordError;
use crate::types::{TransactionId, UserId};

/// A single row of an uploaded CSV batch, before validation.
///
/// Every column is optional: empty cells and absent columns both deserialize
/// to `None`, which lets the validator decide what to keep.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<TransactionId>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub merchant: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub category: Option<String>
}

/// A validated card transaction.
///
/// `id` is `None` until the transaction store has assigned one.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Option<TransactionId>,
    /// ISO-like point in time; the first 10 characters identify the day.
    pub timestamp: String,
    pub amount: Decimal,
    pub merchant: String,
    pub user_id: UserId,
    pub category: Option<String>
}

impl TryFrom<RawRecord> for Transaction {
    type Error = RecordError;

    fn try_from(record: RawRecord) -> Result<Self, Self::Error> {
        let Some(timestamp) = record.timestamp else {
            return Err(RecordError::missing("timestamp"))
        };

        let Some(amount) = record.amount else {
            return Err(RecordError::missing("amount"))
        };

        let Some(merchant) = record.merchant else {
            return Err(RecordError::missing("merchant"))
        };

        let Some(user_id) = record.user_id else {
            return Err(RecordError::missing("user_id"))
        };

        Ok(Self {
            id: record.id,
            timestamp,
            amount,
            merchant,
            user_id,
            category: record.category
        })
    }
}
