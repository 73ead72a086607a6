
use std::path::PathBuf;

use tracing::level_filters::LevelFilter;

use crate::detector::DEFAULT_SENSITIVITY;

/// Location of the SQLite file, relative to the working directory.
pub const DB_PATH: &str = "transactions.db";

#[derive(Debug, Clone)]
pub struct Config {
    /// The uploaded batch; `None` reports history only.
    pub input: Option<PathBuf>,
    pub log_level: LevelFilter,
    /// Standard deviations above the batch mean before an amount is flagged.
    pub sensitivity: f64,
    pub db_path: PathBuf
}

impl Config {
    /// Reads `[input.csv] [log_level] [sensitivity]` from the arguments following the program name.
    pub fn from_args<I: IntoIterator<Item = String>>(args: I) -> Self {
        let mut args = args.into_iter();
        let input = args.next().map(PathBuf::from);
        let log_level = args.next()
            .map(|level| parse_log_level(&level))
            .unwrap_or(LevelFilter::ERROR);
        let sensitivity = args.next()
            .map(|value| parse_sensitivity(&value))
            .unwrap_or(DEFAULT_SENSITIVITY);

        Self {
            input,
            log_level,
            sensitivity,
            db_path: PathBuf::from(DB_PATH)
        }
    }
}

pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

pub fn parse_sensitivity(value: &str) -> f64 {
    match value.parse::<f64>() {
        Ok(sensitivity) if sensitivity.is_finite() && sensitivity >= 0.0 => sensitivity,
        _ => {
            eprintln!("Invalid sensitivity '{}', defaulting to '{}'", value, DEFAULT_SENSITIVITY);
            DEFAULT_SENSITIVITY
        }
    }
}
