use super::{Engine, PipelineError};

use anyhow::Result;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

use crate::detector::FraudDetector;
use crate::storage::{Database, ReportingView};

const HEADER: &str = "timestamp,amount,merchant,user_id,category";

fn create_temporary_csv(rows: &[&str]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;

    writeln!(file, "{HEADER}")?;

    for row in rows {
        writeln!(file, "{row}")?;
    }

    Ok(file)
}

fn outlier_rows() -> Vec<String> {
    let mut rows: Vec<String> = (1..=9)
        .map(|day| format!("2024-06-{day:02} 12:00:00,100,Grocer,{day},food"))
        .collect();
    rows.push("2024-06-10 03:14:00,10000,Jeweller,99,luxury".to_string());
    rows
}

async fn open_temporary_database() -> Result<(TempDir, Database)> {
    let directory = TempDir::new()?;
    let database = Database::open(directory.path().join("transactions.db")).await?;

    Ok((directory, database))
}

#[tokio::test]
async fn test_pipeline_stores_batch_and_links_alert_to_stored_row() -> Result<()> {
    let (_directory, database) = open_temporary_database().await?;
    let rows = outlier_rows();
    let file = create_temporary_csv(&rows.iter().map(String::as_str).collect::<Vec<_>>())?;

    let report = Engine::new().run(&database, Some(file.path())).await?;
    let batch = report.batch.ok_or_else(|| anyhow::anyhow!("Batch report missing"))?;

    assert_eq!(batch.rows_read, 10);
    assert_eq!(batch.rows_kept, 10);
    assert_eq!(batch.alerts.len(), 1);
    assert_eq!(report.history.total_transactions, 10);
    assert_eq!(report.history.total_alerts, 1);

    let stored = database.all_transactions().await?;
    let flagged = stored.iter()
        .find(|transaction| transaction.merchant == "Jeweller")
        .ok_or_else(|| anyhow::anyhow!("Flagged transaction missing"))?;

    assert_eq!(batch.alerts[0].transaction_id, flagged.id);
    assert_eq!(batch.alerts[0].timestamp, "2024-06-10 03:14:00");

    database.close().await;

    Ok(())
}

#[tokio::test]
async fn test_pipeline_drops_incomplete_rows_silently() -> Result<()> {
    let (_directory, database) = open_temporary_database().await?;
    let file = create_temporary_csv(&[
        "2024-01-01 10:00:00,12.00,Cafe,1,food",
        ",15.00,NoTimestamp,2,food",
        "2024-01-01 11:00:00,,NoAmount,3,",
        "2024-01-01 12:00:00,9.00,,4,",
        "2024-01-01 13:00:00,7.00,NoUser,,",
        "2024-01-02 09:00:00,20.00,Bakery,5"
    ])?;

    let report = Engine::new().run(&database, Some(file.path())).await?;
    let batch = report.batch.ok_or_else(|| anyhow::anyhow!("Batch report missing"))?;

    assert_eq!(batch.rows_read, 6);
    assert_eq!(batch.rows_kept, 2);
    assert_eq!(batch.rows_dropped(), 4);
    assert_eq!(report.history.total_transactions, 2);

    let stored = database.all_transactions().await?;
    assert_eq!(stored[0].merchant, "Cafe");
    assert_eq!(stored[1].merchant, "Bakery");
    assert!(stored[1].category.is_none());

    Ok(())
}

#[tokio::test]
async fn test_pipeline_skips_rows_that_fail_to_parse() -> Result<()> {
    let (_directory, database) = open_temporary_database().await?;
    let file = create_temporary_csv(&[
        "2024-01-01,12.00,Cafe,1,food",
        "2024-01-01,not-a-number,Broken,2,food",
        "2024-01-01,8.00,Bakery,3,food"
    ])?;

    let report = Engine::new().run(&database, Some(file.path())).await?;

    assert_eq!(report.history.total_transactions, 2);

    Ok(())
}

#[tokio::test]
async fn test_reuploading_a_batch_doubles_the_history() -> Result<()> {
    let (_directory, database) = open_temporary_database().await?;
    let rows = outlier_rows();
    let file = create_temporary_csv(&rows.iter().map(String::as_str).collect::<Vec<_>>())?;
    let engine = Engine::new();

    engine.run(&database, Some(file.path())).await?;
    let report = engine.run(&database, Some(file.path())).await?;

    assert_eq!(report.history.total_transactions, 20);
    assert_eq!(report.history.total_alerts, 2);

    Ok(())
}

#[tokio::test]
async fn test_detection_ignores_previously_stored_history() -> Result<()> {
    let (_directory, database) = open_temporary_database().await?;
    let engine = Engine::new();

    let large = create_temporary_csv(&[
        "2024-01-01,5000,A,1,",
        "2024-01-01,5000,B,1,",
        "2024-01-01,5000,C,1,"
    ])?;
    engine.run(&database, Some(large.path())).await?;

    let rows = outlier_rows();
    let file = create_temporary_csv(&rows.iter().map(String::as_str).collect::<Vec<_>>())?;
    let report = engine.run(&database, Some(file.path())).await?;
    let batch = report.batch.ok_or_else(|| anyhow::anyhow!("Batch report missing"))?;

    assert_eq!(batch.statistics.count, 10);
    assert_eq!(batch.alerts.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_empty_batch_adds_nothing_and_reports_history() -> Result<()> {
    let (_directory, database) = open_temporary_database().await?;
    let engine = Engine::new();

    let rows = outlier_rows();
    let first = create_temporary_csv(&rows.iter().map(String::as_str).collect::<Vec<_>>())?;
    engine.run(&database, Some(first.path())).await?;

    let empty = create_temporary_csv(&[",,,,"])?;
    let report = engine.run(&database, Some(empty.path())).await?;
    let batch = report.batch.ok_or_else(|| anyhow::anyhow!("Batch report missing"))?;

    assert_eq!(batch.rows_kept, 0);
    assert!(batch.alerts.is_empty());
    assert!(batch.threshold.is_none());
    assert_eq!(report.history.total_transactions, 10);
    assert_eq!(report.history.total_alerts, 1);

    Ok(())
}

#[tokio::test]
async fn test_run_without_batch_reports_history_only() -> Result<()> {
    let (_directory, database) = open_temporary_database().await?;

    let report = Engine::new().run(&database, None).await?;

    assert!(report.batch.is_none());
    assert_eq!(report.history.total_transactions, 0);

    Ok(())
}

#[tokio::test]
async fn test_missing_batch_file_fails_the_run() -> Result<()> {
    let (_directory, database) = open_temporary_database().await?;

    let result = Engine::new().run(&database, Some(Path::new("does-not-exist.csv"))).await;

    assert!(matches!(result, Err(PipelineError::BatchUnreadable { .. })));
    assert!(database.all_transactions().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_custom_sensitivity_flags_more_transactions() -> Result<()> {
    let (_directory, database) = open_temporary_database().await?;
    let file = create_temporary_csv(&[
        "2024-01-01,10,A,1,",
        "2024-01-01,10,B,1,",
        "2024-01-01,10,C,1,",
        "2024-01-01,10,D,1,",
        "2024-01-01,100,E,1,"
    ])?;

    let engine = Engine::new().with_detector(FraudDetector::new().with_sensitivity(1.0));
    let report = engine.run(&database, Some(file.path())).await?;

    assert_eq!(report.history.total_alerts, 1);

    Ok(())
}

fn create_temporary_csv_with_ids(rows: &[&str]) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;

    writeln!(file, "id,{HEADER}")?;

    for row in rows {
        writeln!(file, "{row}")?;
    }

    Ok(file)
}

#[tokio::test]
async fn test_clashing_ids_roll_back_the_whole_batch() -> Result<()> {
    let (_directory, database) = open_temporary_database().await?;
    let file = create_temporary_csv_with_ids(&[
        "1,2024-01-01 10:00:00,10.00,Cafe,1,food",
        "2,2024-01-01 11:00:00,20.00,Bakery,2,food",
        "1,2024-01-01 12:00:00,30.00,Grocer,3,food"
    ])?;

    let result = Engine::new().run(&database, Some(file.path())).await;

    assert!(matches!(result, Err(PipelineError::Storage(_))));
    assert!(database.all_transactions().await?.is_empty());
    assert!(database.all_alerts().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_explicit_ids_from_the_batch_are_kept() -> Result<()> {
    let (_directory, database) = open_temporary_database().await?;
    let file = create_temporary_csv_with_ids(&[
        "100,2024-01-01 10:00:00,10.00,Cafe,1,food",
        ",2024-01-01 11:00:00,20.00,Bakery,2,food",
        "250,2024-01-01 12:00:00,30.00,Grocer,3,food"
    ])?;

    Engine::new().run(&database, Some(file.path())).await?;

    let ids: Vec<_> = database.all_transactions().await?
        .iter()
        .map(|transaction| (transaction.id, transaction.merchant.clone()))
        .collect();

    assert_eq!(ids, vec![
        (Some(100), "Cafe".to_string()),
        (Some(101), "Bakery".to_string()),
        (Some(250), "Grocer".to_string())
    ]);

    Ok(())
}

#[tokio::test]
async fn test_preview_shows_rows_before_validation() -> Result<()> {
    let (_directory, database) = open_temporary_database().await?;
    let file = create_temporary_csv(&[
        "2024-01-01 10:00:00,12.00,Cafe,1,food",
        "2024-01-01 11:00:00,,NoAmount,3,"
    ])?;

    let report = Engine::default().run(&database, Some(file.path())).await?;
    let batch = report.batch.ok_or_else(|| anyhow::anyhow!("Batch report missing"))?;

    assert_eq!(batch.preview.len(), 2);
    assert_eq!(batch.preview[1].merchant.as_deref(), Some("NoAmount"));
    assert!(batch.preview[1].amount.is_none());
    assert_eq!(batch.rows_kept, 1);

    Ok(())
}
