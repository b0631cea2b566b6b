//! Return transforms and sample moments over price series.

use crate::core::{Result, SimulationError};

/// Computes log returns `ln(P_t / P_{t-1})`.
///
/// # Errors
/// [`SimulationError::InsufficientData`] for fewer than 2 prices and
/// [`SimulationError::InvalidParameter`] for any non-finite or non-positive price.
pub fn log_returns(prices: &[f64]) -> Result<Vec<f64>> {
    if prices.len() < 2 {
        return Err(SimulationError::InsufficientData {
            required: 2,
            found: prices.len(),
        });
    }
    if let Some(&bad) = prices.iter().find(|p| !p.is_finite() || **p <= 0.0) {
        return Err(SimulationError::invalid("price", bad, "must be finite and > 0"));
    }
    Ok(prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect())
}

pub fn sample_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Unbiased sample variance (`n - 1` denominator); zero for a single observation.
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = sample_mean(values);
    let ss = values
        .iter()
        .map(|x| {
            let d = x - mean;
            d * d
        })
        .sum::<f64>();
    ss / (values.len() as f64 - 1.0)
}

pub fn sample_std_dev(values: &[f64]) -> f64 {
    sample_variance(values).max(0.0).sqrt()
}
