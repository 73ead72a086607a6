/// Summary statistics over the amounts of a single batch.
///
/// `stddev` is the sample standard deviation (N-1 denominator) and is `None`
/// for batches with fewer than two amounts, where it is undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchStatistics {
    pub count: usize,
    pub mean: Option<f64>,
    pub stddev: Option<f64>
}

impl BatchStatistics {
    pub fn from_amounts(amounts: &[f64]) -> Self {
        let count = amounts.len();

        if count == 0 {
            return Self { count, mean: None, stddev: None }
        }

        let mean = amounts.iter().sum::<f64>() / count as f64;

        let stddev = if count < 2 {
            None
        } else {
            let squared_deviations: f64 = amounts.iter()
                .map(|amount| (amount - mean).powi(2))
                .sum();

            Some((squared_deviations / (count - 1) as f64).sqrt())
        };

        Self { count, mean: Some(mean), stddev }
    }

    /// `mean + sensitivity * stddev`, or `None` when the deviation is undefined.
    pub fn threshold(&self, sensitivity: f64) -> Option<f64> {
        match (self.mean, self.stddev) {
            (Some(mean), Some(stddev)) => Some(mean + sensitivity * stddev),
            _ => None
        }
    }
}
