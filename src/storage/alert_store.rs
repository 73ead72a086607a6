//! Append-only persistence of detector findings.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::models::Alert;
use crate::storage::models::AlertRow;
use crate::storage::StorageError;

/// Inserts every alert as a new row and returns them with their stored ids.
///
/// An empty slice touches nothing.
pub async fn append(connection: &mut SqliteConnection, alerts: &[Alert]) -> Result<Vec<Alert>, StorageError> {
    if alerts.is_empty() {
        return Ok(Vec::new())
    }

    let mut stored = Vec::with_capacity(alerts.len());

    for alert in alerts {
        let id = sqlx::query(
            r#"
            INSERT INTO alerts (id, transaction_id, reason, timestamp)
            VALUES (?, ?, ?, ?)
            "#
        )
        .bind(alert.id)
        .bind(alert.transaction_id)
        .bind(alert.reason.as_str())
        .bind(alert.timestamp.as_str())
        .execute(&mut *connection)
        .await?
        .last_insert_rowid();

        stored.push(Alert { id: Some(id), ..alert.clone() });
    }

    debug!("Appended {} alert(s)", stored.len());

    Ok(stored)
}

pub async fn all(connection: &mut SqliteConnection) -> Result<Vec<Alert>, StorageError> {
    let rows = sqlx::query_as::<_, AlertRow>(
        "SELECT id, transaction_id, reason, timestamp FROM alerts ORDER BY id"
    )
    .fetch_all(&mut *connection)
    .await?;

    Ok(rows.into_iter().map(Alert::from).collect())
}

pub async fn count(connection: &mut SqliteConnection) -> Result<i64, StorageError> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM alerts")
        .fetch_one(&mut *connection)
        .await?;

    Ok(count)
}
