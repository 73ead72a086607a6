use std::collections::{BTreeMap, HashMap};
use std::io::{self, Write};

use rust_decimal::Decimal;
use tracing::warn;

use crate::detector::Detection;
use crate::models::{Alert, RawRecord, Transaction};
use crate::types::{day_key, BatchStatistics};

const PREVIEW_ROWS: usize = 5;
const TOP_MERCHANTS: usize = 10;
const RECENT_ALERTS: usize = 10;

/// Everything shown for one run: the ingested batch, if any, then the stored history.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub batch: Option<BatchReport>,
    pub history: HistorySummary
}

impl RunReport {
    pub fn render<W: Write>(&self, output: &mut W) -> io::Result<()> {
        match &self.batch {
            Some(batch) => batch.render(output)?,
            None => writeln!(output, "No batch uploaded.")?
        }

        writeln!(output)?;
        self.history.render(output)
    }
}

/// Analysis of the batch ingested during this run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    /// The first rows of the upload as read, including rows later dropped.
    pub preview: Vec<RawRecord>,
    pub statistics: BatchStatistics,
    pub threshold: Option<f64>,
    pub alerts: Vec<Alert>,
    pub daily_totals: Vec<(String, Decimal)>,
    pub top_merchants: Vec<(String, usize)>
}

impl BatchReport {
    /// Copies the leading rows of an upload for display, before validation consumes it.
    pub fn preview(records: &[RawRecord]) -> Vec<RawRecord> {
        records.iter().take(PREVIEW_ROWS).cloned().collect()
    }

    pub fn build(rows_read: usize, preview: Vec<RawRecord>, transactions: &[Transaction], detection: Detection, alerts: Vec<Alert>) -> Self {
        Self {
            rows_read,
            rows_kept: transactions.len(),
            preview,
            statistics: detection.statistics,
            threshold: detection.threshold,
            alerts,
            daily_totals: daily_totals(transactions),
            top_merchants: top_merchants(transactions, TOP_MERCHANTS)
        }
    }

    pub fn rows_dropped(&self) -> usize {
        self.rows_read.saturating_sub(self.rows_kept)
    }

    pub fn render<W: Write>(&self, output: &mut W) -> io::Result<()> {
        writeln!(output, "Batch: {} rows read, {} kept, {} dropped", self.rows_read, self.rows_kept, self.rows_dropped())?;

        writeln!(output, "Preview:")?;
        writeln!(output, "id,timestamp,amount,merchant,user_id,category")?;
        for record in &self.preview {
            writeln!(
                output,
                "{},{},{},{},{},{}",
                optional(&record.id),
                optional(&record.timestamp),
                optional(&record.amount),
                optional(&record.merchant),
                optional(&record.user_id),
                optional(&record.category)
            )?;
        }

        match (self.threshold, self.statistics.mean, self.statistics.stddev) {
            (Some(threshold), Some(mean), Some(stddev)) => writeln!(
                output,
                "Threshold: {threshold:.2} (mean {mean:.2}, stddev {stddev:.2}, n={})",
                self.statistics.count
            )?,
            _ => writeln!(output, "Threshold: n/a (fewer than 2 transactions)")?
        }

        if self.alerts.is_empty() {
            writeln!(output, "No suspicious activity detected.")?;
        } else {
            writeln!(output, "Suspicious transactions detected: {}", self.alerts.len())?;
            write_alerts(output, &self.alerts)?;
        }

        writeln!(output, "Daily totals:")?;
        writeln!(output, "day,amount")?;
        for (day, amount) in &self.daily_totals {
            writeln!(output, "{day},{amount}")?;
        }

        writeln!(output, "Top merchants:")?;
        writeln!(output, "merchant,count")?;
        for (merchant, count) in &self.top_merchants {
            writeln!(output, "{merchant},{count}")?;
        }

        Ok(())
    }
}

/// Totals over everything stored so far, independent of the current batch.
#[derive(Debug, Clone)]
pub struct HistorySummary {
    pub total_transactions: usize,
    pub total_alerts: usize,
    pub recent_alerts: Vec<Alert>
}

impl HistorySummary {
    pub fn build(transactions: &[Transaction], alerts: &[Alert]) -> Self {
        Self {
            total_transactions: transactions.len(),
            total_alerts: alerts.len(),
            recent_alerts: recent_alerts(alerts, RECENT_ALERTS)
        }
    }

    pub fn render<W: Write>(&self, output: &mut W) -> io::Result<()> {
        writeln!(output, "Total Transactions: {}", self.total_transactions)?;
        writeln!(output, "Total Alerts: {}", self.total_alerts)?;

        if !self.recent_alerts.is_empty() {
            writeln!(output, "Recent alerts:")?;
            write_alerts(output, &self.recent_alerts)?;
        }

        output.flush()
    }
}

/// Sums amounts per calendar day, keyed by the first 10 characters of the timestamp.
///
/// A day whose total leaves the `Decimal` range is clamped to its bound.
pub fn daily_totals(transactions: &[Transaction]) -> Vec<(String, Decimal)> {
    let mut totals = BTreeMap::<String, Decimal>::new();

    for transaction in transactions {
        let day = day_key(&transaction.timestamp);
        let total = totals.entry(day.to_string()).or_default();

        *total = match total.checked_add(transaction.amount) {
            Some(sum) => sum,
            None => {
                warn!("Daily total for [{day}] overflowed, clamping at the Decimal limit");
                total.saturating_add(transaction.amount)
            }
        };
    }

    totals.into_iter().collect()
}

/// The `limit` most frequent merchants, most frequent first; ties keep first appearance.
pub fn top_merchants(transactions: &[Transaction], limit: usize) -> Vec<(String, usize)> {
    let mut positions = HashMap::<&str, usize>::new();
    let mut counts = Vec::<(String, usize)>::new();

    for transaction in transactions {
        match positions.get(transaction.merchant.as_str()) {
            Some(&position) => counts[position].1 += 1,
            None => {
                positions.insert(&transaction.merchant, counts.len());
                counts.push((transaction.merchant.clone(), 1));
            }
        }
    }

    counts.sort_by(|left, right| right.1.cmp(&left.1));
    counts.truncate(limit);
    counts
}

/// The `limit` latest alerts by timestamp, newest first; ties keep storage order.
pub fn recent_alerts(alerts: &[Alert], limit: usize) -> Vec<Alert> {
    let mut sorted = alerts.to_vec();
    sorted.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
    sorted.truncate(limit);
    sorted
}

fn write_alerts<W: Write>(output: &mut W, alerts: &[Alert]) -> io::Result<()> {
    writeln!(output, "id,transaction_id,reason,timestamp")?;

    for alert in alerts {
        writeln!(
            output,
            "{},{},{},{}",
            optional(&alert.id),
            optional(&alert.transaction_id),
            alert.reason,
            alert.timestamp
        )?;
    }

    Ok(())
}

fn optional<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(T::to_string).unwrap_or_default()
}
