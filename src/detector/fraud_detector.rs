use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use crate::models::{Alert, Transaction};
use crate::types::BatchStatistics;

pub const DEFAULT_SENSITIVITY: f64 = 2.0;

/// Outcome of running the detector over one batch.
#[derive(Debug, Clone)]
pub struct Detection {
    pub statistics: BatchStatistics,
    pub threshold: Option<f64>,
    /// Alerts in the same relative order as the transactions that raised them.
    pub alerts: Vec<Alert>
}

/// Flags transactions whose amount lies far above the rest of their batch.
///
/// The threshold is `mean + sensitivity * stddev` computed over the batch
/// handed to `detect` and nothing else, so every upload is judged on its own.
/// Batches of fewer than two transactions have no threshold and never alert.
pub struct FraudDetector {
    sensitivity: f64
}

impl FraudDetector {
    pub fn new() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY
        }
    }

    /// Sets how many standard deviations above the mean an amount must exceed.
    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn detect(&self, batch: &[Transaction]) -> Detection {
        let amounts: Vec<f64> = batch.iter()
            .filter_map(|transaction| transaction.amount.to_f64())
            .collect();

        let statistics = BatchStatistics::from_amounts(&amounts);
        let threshold = statistics.threshold(self.sensitivity);

        let Some(limit) = threshold else {
            debug!("Batch of {} transaction(s) is too small for a threshold", statistics.count);
            return Detection { statistics, threshold, alerts: Vec::new() }
        };

        let alerts = batch.iter()
            .filter_map(|transaction| {
                let amount = transaction.amount.to_f64()?;
                (amount > limit).then(|| Alert {
                    id: None,
                    transaction_id: transaction.id,
                    reason: format!("High amount: {amount:.2} (> {limit:.2})"),
                    timestamp: transaction.timestamp.clone()
                })
            })
            .collect();

        Detection { statistics, threshold, alerts }
    }
}

impl Default for FraudDetector {
    fn default() -> Self {
        Self::new()
    }
}
