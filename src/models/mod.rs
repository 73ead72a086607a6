mod alert;
mod errors;
mod transaction;

use tracing::debug;

pub use alert::Alert;
pub use errors::RecordError;
pub use transaction::{RawRecord, Transaction};

/// Keeps only the records carrying every required field, in their original order.
///
/// Incomplete records are dropped silently; this never fails.
pub fn validate(records: Vec<RawRecord>) -> Vec<Transaction> {
    records.into_iter()
        .enumerate()
        .filter_map(|(index, record)| match Transaction::try_from(record) {
            Ok(transaction) => Some(transaction),
            Err(error) => {
                debug!("Dropping record [{index}]: {error}");
                None
            }
        })
        .collect()
}
