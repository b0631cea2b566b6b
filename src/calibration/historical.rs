//! Annualized GBM drift and volatility from daily closes.
//!
//! With daily log returns `r_t = ln(P_t / P_{t-1})`:
//! - `μ = mean(r) · 252`
//! - `σ = std(r) · √252` (sample standard deviation, `n - 1`)
//! - `S0` is the most recent close.

use serde::{Deserialize, Serialize};

use crate::core::{Result, SimulationError, SimulationParameters, TRADING_DAYS_PER_YEAR};
use crate::market::PriceSeries;
use crate::math::returns::{log_returns, sample_mean, sample_std_dev};
use crate::models::Gbm;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GbmEstimate {
    pub mu: f64,
    pub sigma: f64,
    pub s0: f64,
    /// Number of log returns the estimate is based on.
    pub observations: usize,
}

impl GbmEstimate {
    pub fn model(&self) -> Result<Gbm> {
        Gbm::new(self.mu, self.sigma)
    }

    /// Daily-step simulation parameters over `horizon_days` trading days.
    pub fn parameters(&self, horizon_days: usize) -> Result<SimulationParameters> {
        SimulationParameters::daily(self.s0, self.mu, self.sigma, horizon_days)
    }
}

pub fn estimate_gbm_parameters(series: &PriceSeries) -> Result<GbmEstimate> {
    estimate_from_closes(&series.closes())
}

/// Like [`estimate_gbm_parameters`], annualizing with `periods_per_year` observations.
pub fn estimate_gbm_parameters_annualized(
    series: &PriceSeries,
    periods_per_year: f64,
) -> Result<GbmEstimate> {
    estimate_from_closes_annualized(&series.closes(), periods_per_year)
}

/// Estimates from a chronological slice of daily closes (at least two).
pub fn estimate_from_closes(closes: &[f64]) -> Result<GbmEstimate> {
    estimate_from_closes_annualized(closes, TRADING_DAYS_PER_YEAR)
}

/// Estimates from closes sampled `periods_per_year` times per year.
///
/// Use the same value that sets the simulation step, so the estimated `mu` and
/// `sigma` match the grid they are simulated on.
pub fn estimate_from_closes_annualized(closes: &[f64], periods_per_year: f64) -> Result<GbmEstimate> {
    if !periods_per_year.is_finite() || periods_per_year <= 0.0 {
        return Err(SimulationError::invalid(
            "periods_per_year",
            periods_per_year,
            "must be finite and > 0",
        ));
    }
    let returns = log_returns(closes)?;
    let mu = sample_mean(&returns) * periods_per_year;
    let sigma = sample_std_dev(&returns) * periods_per_year.sqrt();
    if !mu.is_finite() || !sigma.is_finite() {
        return Err(SimulationError::invalid(
            "closes",
            mu,
            "estimated drift or volatility is not finite",
        ));
    }
    Ok(GbmEstimate {
        mu,
        sigma,
        s0: closes[closes.len() - 1],
        observations: returns.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::fast_rng::{FastRng, RngKind};
    use approx::assert_relative_eq;

    #[test]
    fn constant_growth_has_zero_volatility() {
        let closes: Vec<f64> = (0..253).map(|i| 50.0 * (0.0004_f64 * i as f64).exp()).collect();
        let est = estimate_from_closes(&closes).unwrap();
        assert_relative_eq!(est.mu, 0.0004 * 252.0, epsilon = 1e-10);
        assert!(est.sigma < 1e-10);
        assert_eq!(est.s0, closes[252]);
        assert_eq!(est.observations, 252);
    }

    #[test]
    fn recovers_parameters_of_a_simulated_series() {
        let (mu, sigma) = (0.12, 0.3);
        let gbm = Gbm::new(mu, sigma).unwrap();
        let mut rng = FastRng::from_seed(RngKind::Pcg64, 8);
        let dt = 1.0 / 252.0;
        let mut closes = vec![100.0];
        for _ in 0..50_000 {
            let last = closes[closes.len() - 1];
            closes.push(gbm.step_exact(last, dt, rng.standard_normal()));
        }

        let est = estimate_from_closes(&closes).unwrap();
        // mean log return is mu - sigma^2 / 2 per year
        let drift_se = sigma / (50_000.0 * dt).sqrt();
        assert!((est.mu - (mu - 0.5 * sigma * sigma)).abs() < 4.0 * drift_se, "{est:?}");
        assert_relative_eq!(est.sigma, sigma, max_relative = 0.02);
    }

    #[test]
    fn annualization_follows_the_period_count() {
        let closes = [100.0, 101.0, 99.5, 102.3, 101.7, 103.0];
        let daily = estimate_from_closes(&closes).unwrap();
        let custom = estimate_from_closes_annualized(&closes, 260.0).unwrap();

        assert_eq!(daily, estimate_from_closes_annualized(&closes, TRADING_DAYS_PER_YEAR).unwrap());
        assert_relative_eq!(custom.mu, daily.mu * 260.0 / 252.0, max_relative = 1e-12);
        assert_relative_eq!(custom.sigma, daily.sigma * (260.0_f64 / 252.0).sqrt(), max_relative = 1e-12);
        assert_eq!(custom.s0, daily.s0);

        for bad in [0.0, -1.0, f64::NAN] {
            assert!(estimate_from_closes_annualized(&closes, bad).unwrap_err().is_invalid_parameter());
        }
    }

    #[test]
    fn needs_two_closes() {
        assert!(matches!(
            estimate_from_closes(&[100.0]),
            Err(SimulationError::InsufficientData { .. })
        ));
    }
}
