mod config;
mod detector;
mod engine;
mod models;
mod report;
mod storage;
mod types;

use std::io::{stderr, stdout, BufWriter};
use std::process::exit;
use std::time::Instant;

use anyhow::Result;
use tracing::error;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use crate::config::Config;
use crate::detector::FraudDetector;
use crate::engine::Engine;
use crate::report::RunReport;
use crate::storage::Database;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = Config::from_args(std::env::args().skip(1));

    setup_logging(config.log_level);

    if let Err(error) = run(&config).await {
        error!("{error:#}");
        eprintln!("Run failed: {error:#}");
        exit(1);
    }
}

async fn run(config: &Config) -> Result<()> {
    let database = Database::open(&config.db_path).await?;

    let timer = Instant::now();
    let engine = Engine::new()
        .with_detector(FraudDetector::new().with_sensitivity(config.sensitivity));
    let outcome = engine.run(&database, config.input.as_deref()).await;

    //NOTE: The database is released on every path, including a failed or absent batch
    database.close().await;

    let report = outcome?;
    info!("Run completed in: {:?}", timer.elapsed());

    write_report_to_stdout(&report)?;

    Ok(())
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the report, so logs go to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_report_to_stdout(report: &RunReport) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());
    report.render(&mut output)?;

    Ok(())
}
