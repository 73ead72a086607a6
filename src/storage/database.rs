use std::path::Path;

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Sqlite;
use tracing::{debug, info};

use crate::models::{Alert, Transaction};
use crate::storage::{alert_store, transaction_store, ReportingView, StorageError};

const CREATE_TRANSACTIONS: &str = r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT,
        amount REAL,
        merchant TEXT,
        user_id INTEGER,
        category TEXT
    )
"#;

const CREATE_ALERTS: &str = r#"
    CREATE TABLE IF NOT EXISTS alerts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        transaction_id INTEGER,
        reason TEXT,
        timestamp TEXT
    )
"#;

/// Handle to the SQLite file holding both append-only tables.
///
/// Opened once at the start of a run and released with `close` at its end.
/// The pool holds a single connection, so writes are serialized by SQLite
/// itself and a pooled connection must be returned before the next acquire.
pub struct Database {
    pool: SqlitePool
}

impl Database {
    /// Opens (creating if needed) the database file and ensures both tables exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(CREATE_TRANSACTIONS).execute(&pool).await?;
        sqlx::query(CREATE_ALERTS).execute(&pool).await?;

        info!("Database ready at {}", path.display());

        Ok(Self { pool })
    }

    /// Starts a SQLite transaction; dropping it without `commit` rolls back.
    pub async fn begin(&self) -> Result<sqlx::Transaction<'static, Sqlite>, StorageError> {
        Ok(self.pool.begin().await?)
    }

    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, StorageError> {
        Ok(self.pool.acquire().await?)
    }

    pub async fn close(self) {
        self.pool.close().await;
        debug!("Database closed");
    }
}

impl ReportingView for Database {
    async fn all_transactions(&self) -> Result<Vec<Transaction>, StorageError> {
        let mut connection = self.acquire().await?;
        transaction_store::all(&mut connection).await
    }

    async fn all_alerts(&self) -> Result<Vec<Alert>, StorageError> {
        let mut connection = self.acquire().await?;
        alert_store::all(&mut connection).await
    }
}
