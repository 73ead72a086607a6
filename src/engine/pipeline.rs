use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tokio::task::spawn_blocking;
use tracing::{info, warn};

use crate::detector::FraudDetector;
use crate::engine::PipelineError;
use crate::models::{validate, RawRecord};
use crate::report::{BatchReport, HistorySummary, RunReport};
use crate::storage::{alert_store, transaction_store, Database, ReportingView, StorageError};

/// Runs one upload through validation, persistence and detection, then reports.
pub struct Engine {
    detector: FraudDetector
}

impl Engine {
    pub fn new() -> Self {
        Self {
            detector: FraudDetector::new()
        }
    }

    pub fn with_detector(mut self, detector: FraudDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Ingests the batch at `path` when one is given, then summarizes the stored history.
    pub async fn run(&self, database: &Database, path: Option<&Path>) -> Result<RunReport, PipelineError> {
        let batch = match path {
            Some(path) => Some(self.ingest(database, path).await?),
            None => {
                info!("No batch supplied, reporting history only");
                None
            }
        };

        let transactions = database.all_transactions().await?;
        let alerts = database.all_alerts().await?;

        Ok(RunReport {
            batch,
            history: HistorySummary::build(&transactions, &alerts)
        })
    }

    /// Validates, stores and screens one CSV batch.
    ///
    /// Transactions are stored before detection so every alert carries the id
    /// of the row it refers to. Both inserts share one SQLite transaction: a
    /// failure anywhere leaves the database as it was.
    pub async fn ingest(&self, database: &Database, path: &Path) -> Result<BatchReport, PipelineError> {
        let records = read_batch(path.to_path_buf()).await?;
        let rows_read = records.len();

        let preview = BatchReport::preview(&records);
        let batch = validate(records);
        info!("Batch [{}]: {rows_read} rows read, {} dropped as incomplete", path.display(), rows_read - batch.len());

        let mut transaction = database.begin().await?;

        let stored = transaction_store::append(&mut transaction, &batch).await?;
        let detection = self.detector.detect(&stored);
        let alerts = alert_store::append(&mut transaction, &detection.alerts).await?;

        let total_transactions = transaction_store::count(&mut transaction).await?;
        let total_alerts = alert_store::count(&mut transaction).await?;

        transaction.commit().await.map_err(StorageError::from)?;

        match detection.threshold {
            Some(threshold) => info!("Threshold {threshold:.2}: {} suspicious transaction(s)", alerts.len()),
            None => info!("Batch too small for a threshold, detection skipped")
        }

        info!("Store now holds {total_transactions} transaction(s) and {total_alerts} alert(s)");

        Ok(BatchReport::build(rows_read, preview, &stored, detection, alerts))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_batch(path: PathBuf) -> Result<Vec<RawRecord>, PipelineError> {
    spawn_blocking(move || {
        let file = File::open(&path).map_err(|source| PipelineError::BatchUnreadable {
            path: path.clone(),
            source
        })?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let mut records = Vec::new();

        for (index, result) in reader.deserialize::<RawRecord>().enumerate() {
            match result {
                Ok(record) => records.push(record),
                Err(error) => warn!("Skipping unreadable row [{index}]: {error}")
            }
        }

        Ok(records)
    })
    .await?
}
