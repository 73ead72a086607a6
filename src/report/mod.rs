mod summary;

pub use summary::{BatchReport, HistorySummary, RunReport};
