//! Reductions over terminal prices.
//!
//! Percentiles use linear interpolation between order statistics: for a sorted
//! sample `x[0..n]` and level `q` in percent, `rank = q / 100 * (n - 1)` and the
//! result interpolates between `x[floor(rank)]` and `x[ceil(rank)]`. This is the
//! conventional ("linear") definition, so `p5`/`p95` match spreadsheet and numpy
//! defaults.

use serde::{Deserialize, Serialize};

use crate::core::{Result, SimulationError};
use crate::math::returns::{sample_mean, sample_variance};

/// Read-only summary of a terminal-price sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminalDistributionSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (`n - 1`); zero for a single trial.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p95: f64,
}

/// Summarizes terminal prices into mean, spread, and 5th/95th percentiles.
///
/// # Errors
/// [`SimulationError::EmptyBatch`] for an empty slice and
/// [`SimulationError::InvalidParameter`] if any value is not finite.
pub fn summarize(terminals: &[f64]) -> Result<TerminalDistributionSummary> {
    let sorted = sorted_finite(terminals)?;
    let n = sorted.len();
    Ok(TerminalDistributionSummary {
        count: n,
        mean: sample_mean(&sorted),
        std_dev: sample_variance(&sorted).max(0.0).sqrt(),
        min: sorted[0],
        max: sorted[n - 1],
        p5: quantile_sorted(&sorted, 0.05),
        p95: quantile_sorted(&sorted, 0.95),
    })
}

/// Percentile `q` (in `[0, 100]`) of `values` with linear interpolation.
pub fn percentile(values: &[f64], q: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&q) {
        return Err(SimulationError::invalid("q", q, "percentile must be in [0, 100]"));
    }
    let sorted = sorted_finite(values)?;
    Ok(quantile_sorted(&sorted, q / 100.0))
}

fn sorted_finite(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(SimulationError::EmptyBatch);
    }
    if let Some(&bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(SimulationError::invalid("terminal", bad, "must be finite"));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

fn quantile_sorted(sample: &[f64], p: f64) -> f64 {
    if sample.len() == 1 {
        return sample[0];
    }

    let rank = p * (sample.len() as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sample[lo]
    } else {
        let w = rank - lo as f64;
        // rounding must not push the result past the upper order statistic
        (sample[lo] + w * (sample[hi] - sample[lo])).min(sample[hi])
    }
}

/// Sample moments of `ln(S_T / S_0)`, comparable with the analytic GBM log-moments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogReturnMoments {
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
}

impl LogReturnMoments {
    pub fn from_terminals(terminals: &[f64], s0: f64) -> Result<Self> {
        if terminals.is_empty() {
            return Err(SimulationError::EmptyBatch);
        }
        if !s0.is_finite() || s0 <= 0.0 {
            return Err(SimulationError::invalid("s0", s0, "must be finite and > 0"));
        }
        if let Some(&bad) = terminals.iter().find(|v| !v.is_finite() || **v <= 0.0) {
            return Err(SimulationError::invalid("terminal", bad, "must be finite and > 0"));
        }
        let logs: Vec<f64> = terminals.iter().map(|s| (s / s0).ln()).collect();
        Ok(Self {
            count: logs.len(),
            mean: sample_mean(&logs),
            variance: sample_variance(&logs),
        })
    }

    /// Standard error of `mean`.
    pub fn mean_std_error(&self) -> f64 {
        (self.variance / self.count as f64).sqrt()
    }
}
