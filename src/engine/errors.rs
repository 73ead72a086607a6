use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tokio::task::JoinError;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Could not read batch at path [{}]: {source}", .path.display())]
    BatchUnreadable {
        path: PathBuf,
        source: io::Error
    },
    #[error("CSV ingestion task failed: {0}")]
    Ingestion(#[from] JoinError)
}
