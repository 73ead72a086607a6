//! Append-only persistence of validated transactions.
//!
//! Rows are only ever inserted. Appending the same batch twice stores it
//! twice: there is no deduplication.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::models::Transaction;
use crate::storage::models::{to_real, TransactionRow};
use crate::storage::StorageError;

/// Inserts every transaction as a new row and returns them with their stored ids.
///
/// A transaction that already carries an id keeps it; otherwise SQLite assigns one.
pub async fn append(connection: &mut SqliteConnection, batch: &[Transaction]) -> Result<Vec<Transaction>, StorageError> {
    let mut stored = Vec::with_capacity(batch.len());

    for transaction in batch {
        let amount = to_real(transaction)?;

        let id = sqlx::query(
            r#"
            INSERT INTO transactions (id, timestamp, amount, merchant, user_id, category)
            VALUES (?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(transaction.id)
        .bind(transaction.timestamp.as_str())
        .bind(amount)
        .bind(transaction.merchant.as_str())
        .bind(transaction.user_id)
        .bind(transaction.category.as_deref())
        .execute(&mut *connection)
        .await?
        .last_insert_rowid();

        stored.push(Transaction { id: Some(id), ..transaction.clone() });
    }

    debug!("Appended {} transaction(s)", stored.len());

    Ok(stored)
}

pub async fn all(connection: &mut SqliteConnection) -> Result<Vec<Transaction>, StorageError> {
    let rows = sqlx::query_as::<_, TransactionRow>(
        "SELECT id, timestamp, amount, merchant, user_id, category FROM transactions ORDER BY id"
    )
    .fetch_all(&mut *connection)
    .await?;

    rows.into_iter().map(Transaction::try_from).collect()
}

pub async fn count(connection: &mut SqliteConnection) -> Result<i64, StorageError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM transactions")
        .fetch_one(&mut *connection)
        .await?;

    Ok(count)
}
