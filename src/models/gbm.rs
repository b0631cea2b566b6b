//! Geometric Brownian motion `dS = μ S dt + σ S dW`.
//!
//! The log-Euler step
//! `S_{t+dt} = S_t exp((μ - σ²/2) dt + σ √dt Z)` is exact in distribution for constant
//! coefficients, so no step-size correction is needed.
//!
//! Closed forms used to sanity-check simulation output:
//! - `E[ln(S_T / S_0)] = (μ - σ²/2) T`
//! - `Var[ln(S_T / S_0)] = σ² T`
//! - `E[S_T] = S_0 e^{μT}`
//! - `q`-quantile of `S_T` is `S_0 exp((μ - σ²/2) T + σ √T Φ⁻¹(q))`

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::core::{Result, SimulationError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gbm {
    pub mu: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(mu: f64, sigma: f64) -> Result<Self> {
        if !mu.is_finite() {
            return Err(SimulationError::invalid("mu", mu, "must be finite"));
        }
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(SimulationError::invalid("sigma", sigma, "must be finite and >= 0"));
        }
        Ok(Self { mu, sigma })
    }

    /// Deterministic part of the log increment over `dt`.
    #[inline]
    pub fn log_drift(&self, dt: f64) -> f64 {
        (self.mu - 0.5 * self.sigma * self.sigma) * dt
    }

    /// Scale of the Gaussian part of the log increment over `dt`.
    #[inline]
    pub fn log_diffusion(&self, dt: f64) -> f64 {
        self.sigma * dt.sqrt()
    }

    #[inline]
    pub fn step_exact(&self, s: f64, dt: f64, z: f64) -> f64 {
        s * self.log_diffusion(dt).mul_add(z, self.log_drift(dt)).exp()
    }

    pub fn log_return_mean(&self, horizon: f64) -> f64 {
        self.log_drift(horizon)
    }

    pub fn log_return_variance(&self, horizon: f64) -> f64 {
        self.sigma * self.sigma * horizon
    }

    pub fn expected_terminal(&self, s0: f64, horizon: f64) -> f64 {
        s0 * (self.mu * horizon).exp()
    }

    /// Analytic quantile of `S_T` for `q` in `(0, 1)`.
    pub fn terminal_quantile(&self, s0: f64, horizon: f64, q: f64) -> Result<f64> {
        if !(q > 0.0 && q < 1.0) {
            return Err(SimulationError::invalid("q", q, "must be in (0, 1)"));
        }
        let z = Normal::standard().inverse_cdf(q);
        Ok(s0 * self.log_diffusion(horizon).mul_add(z, self.log_drift(horizon)).exp())
    }
}
