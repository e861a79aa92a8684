use anyhow::Result;
use serde::{Deserialize, Serialize};

/// z-value of the two-sided 95% normal confidence interval.
pub const CONFIDENCE_95: f64 = 1.96;

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(thresholds: &[f64]) -> Option<f64> {
    if thresholds.is_empty() {
        return None;
    }
    Some(thresholds.iter().sum::<f64>() / thresholds.len() as f64)
}

/// Sample (Bessel-corrected) standard deviation around `mean`.
/// Not defined for fewer than two samples.
pub fn stddev(thresholds: &[f64], mean: f64) -> Option<f64> {
    if thresholds.len() < 2 {
        return None;
    }
    let sum_sq: f64 = thresholds.iter().map(|x| (x - mean) * (x - mean)).sum();
    Some((sum_sq / (thresholds.len() - 1) as f64).sqrt())
}

pub fn confidence_low(mean: f64, stddev: f64, count: usize) -> f64 {
    mean - CONFIDENCE_95 * stddev / (count as f64).sqrt()
}

pub fn confidence_high(mean: f64, stddev: f64, count: usize) -> f64 {
    mean + CONFIDENCE_95 * stddev / (count as f64).sqrt()
}

/// Summary statistics over a set of per-trial percolation thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdStats {
    pub count: usize,
    pub mean: f64,
    /// `None` for a single-trial run.
    pub stddev: Option<f64>,
    pub confidence_low: Option<f64>,
    pub confidence_high: Option<f64>,
}

impl ThresholdStats {
    pub fn from_thresholds(thresholds: &[f64]) -> Result<Self> {
        let mean = match mean(thresholds) {
            Some(m) => m,
            None => anyhow::bail!("Cannot compute statistics over zero trials."),
        };
        let count = thresholds.len();
        let stddev = stddev(thresholds, mean);

        Ok(ThresholdStats {
            count,
            mean,
            stddev,
            confidence_low: stddev.map(|s| confidence_low(mean, s, count)),
            confidence_high: stddev.map(|s| confidence_high(mean, s, count)),
        })
    }

    /// Both interval bounds, if the interval is defined.
    pub fn confidence_interval(&self) -> Option<(f64, f64)> {
        self.confidence_low.zip(self.confidence_high)
    }
}
