use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimulationError};

/// Conventional number of trading days per year used for `dt` and annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Largest admissible number of points per path.
pub const MAX_TIMESTEPS: usize = 100_000_000;

/// Validated GBM inputs for one simulation run.
///
/// `horizon` and `dt` are in years. The number of points per path is
/// `floor(horizon / dt)`; index 0 is the initial price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// Initial price `S0`.
    pub s0: f64,
    /// Annualized drift.
    pub mu: f64,
    /// Annualized volatility.
    pub sigma: f64,
    /// Time horizon `T`.
    pub horizon: f64,
    /// Time step.
    pub dt: f64,
}

impl SimulationParameters {
    /// Builds and validates parameters.
    pub fn new(s0: f64, mu: f64, sigma: f64, horizon: f64, dt: f64) -> Result<Self> {
        let params = Self {
            s0,
            mu,
            sigma,
            horizon,
            dt,
        };
        params.validate()?;
        Ok(params)
    }

    /// Daily-step parameters for a horizon expressed in trading days.
    pub fn daily(s0: f64, mu: f64, sigma: f64, horizon_days: usize) -> Result<Self> {
        Self::new(
            s0,
            mu,
            sigma,
            horizon_days as f64 / TRADING_DAYS_PER_YEAR,
            1.0 / TRADING_DAYS_PER_YEAR,
        )
    }

    /// Checks the domain of every field and that at least one point fits in the horizon.
    pub fn validate(&self) -> Result<()> {
        if !self.s0.is_finite() || self.s0 <= 0.0 {
            return Err(SimulationError::invalid("s0", self.s0, "must be finite and > 0"));
        }
        if !self.mu.is_finite() {
            return Err(SimulationError::invalid("mu", self.mu, "must be finite"));
        }
        if !self.sigma.is_finite() || self.sigma < 0.0 {
            return Err(SimulationError::invalid(
                "sigma",
                self.sigma,
                "must be finite and >= 0",
            ));
        }
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(SimulationError::invalid(
                "horizon",
                self.horizon,
                "must be finite and > 0",
            ));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(SimulationError::invalid("dt", self.dt, "must be finite and > 0"));
        }
        let ratio = self.horizon / self.dt;
        if !ratio.is_finite() || ratio >= (MAX_TIMESTEPS + 1) as f64 {
            return Err(SimulationError::invalid(
                "dt",
                self.dt,
                "horizon / dt exceeds MAX_TIMESTEPS",
            ));
        }
        if self.timesteps() < 1 {
            return Err(SimulationError::invalid(
                "dt",
                self.dt,
                "horizon / dt must yield at least one timestep",
            ));
        }
        Ok(())
    }

    /// `floor(horizon / dt)`.
    ///
    /// Ratios within a few ulps of an integer snap to it, so `0.5 / (1/252)` is 126
    /// rather than 125.
    pub fn timesteps(&self) -> usize {
        let ratio = self.horizon / self.dt;
        if !ratio.is_finite() || ratio < 0.0 {
            return 0;
        }
        let nearest = ratio.round();
        if (ratio - nearest).abs() <= 1.0e-9 * nearest.max(1.0) {
            nearest as usize
        } else {
            ratio.floor() as usize
        }
    }

    /// Time actually covered by a path: `(timesteps - 1) * dt`.
    ///
    /// The first point is `S0`, so a path of `n` points spans `n - 1` increments.
    pub fn effective_horizon(&self) -> f64 {
        self.timesteps().saturating_sub(1) as f64 * self.dt
    }
}

/// How much of each simulated trajectory the coordinator keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Keep every full path. Memory grows with `trials * timesteps`.
    Full,
    /// Keep every terminal value and the full paths of the first `sample_paths` tasks.
    TerminalOnly { sample_paths: usize },
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::TerminalOnly { sample_paths: 10 }
    }
}

impl RetentionPolicy {
    /// Number of full paths retained for a batch of `trials`.
    pub fn retained_paths(self, trials: usize) -> usize {
        match self {
            Self::Full => trials,
            Self::TerminalOnly { sample_paths } => sample_paths.min(trials),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timesteps_follow_floor_of_horizon_over_dt() {
        let one_year = SimulationParameters::new(100.0, 0.05, 0.2, 1.0, 1.0 / 252.0).unwrap();
        assert_eq!(one_year.timesteps(), 252);

        let half_year = SimulationParameters::new(100.0, 0.05, 0.2, 0.5, 1.0 / 252.0).unwrap();
        assert_eq!(half_year.timesteps(), 126);

        let ragged = SimulationParameters::new(100.0, 0.05, 0.2, 1.0, 0.3).unwrap();
        assert_eq!(ragged.timesteps(), 3);
    }

    #[test]
    fn daily_constructor_matches_trading_day_grid() {
        for days in [1_usize, 5, 21, 63, 126, 252, 504, 1000] {
            let p = SimulationParameters::daily(50.0, 0.1, 0.3, days).unwrap();
            assert_eq!(p.timesteps(), days, "days={days}");
        }
    }

    #[test]
    fn rejects_out_of_domain_inputs() {
        let cases = [
            (0.0, 0.05, 0.2, 1.0, 0.01),
            (-5.0, 0.05, 0.2, 1.0, 0.01),
            (100.0, 0.05, -0.1, 1.0, 0.01),
            (100.0, 0.05, 0.2, 0.0, 0.01),
            (100.0, 0.05, 0.2, 1.0, 0.0),
            (100.0, 0.05, 0.2, 1.0, -0.01),
            (100.0, f64::NAN, 0.2, 1.0, 0.01),
            (f64::INFINITY, 0.05, 0.2, 1.0, 0.01),
            (100.0, 0.05, 0.2, 0.01, 1.0),
        ];
        for (s0, mu, sigma, t, dt) in cases {
            let err = SimulationParameters::new(s0, mu, sigma, t, dt).unwrap_err();
            assert!(err.is_invalid_parameter(), "{s0} {mu} {sigma} {t} {dt}: {err}");
        }
    }

    #[test]
    fn rejects_grids_longer_than_max_timesteps() {
        for (t, dt) in [(1.0e10, 1.0e-10), (1.0, 1.0e-300), (1.0e300, 1.0e-300)] {
            let err = SimulationParameters::new(100.0, 0.0, 0.1, t, dt).unwrap_err();
            assert!(err.is_invalid_parameter(), "{t} {dt}: {err}");
        }

        let at_cap = SimulationParameters::new(100.0, 0.0, 0.1, MAX_TIMESTEPS as f64, 1.0).unwrap();
        assert_eq!(at_cap.timesteps(), MAX_TIMESTEPS);
        assert!(SimulationParameters::new(100.0, 0.0, 0.1, MAX_TIMESTEPS as f64 + 1.0, 1.0).is_err());
    }

    #[test]
    fn zero_volatility_is_admissible() {
        assert!(SimulationParameters::new(100.0, 0.05, 0.0, 1.0, 1.0 / 252.0).is_ok());
    }

    #[test]
    fn effective_horizon_excludes_the_initial_point() {
        let p = SimulationParameters::daily(100.0, 0.0, 0.2, 252).unwrap();
        assert!((p.effective_horizon() - 251.0 / 252.0).abs() < 1.0e-15);
    }

    #[test]
    fn retention_clamps_samples_to_trial_count() {
        assert_eq!(RetentionPolicy::Full.retained_paths(7), 7);
        assert_eq!(RetentionPolicy::default().retained_paths(3), 3);
        assert_eq!(RetentionPolicy::default().retained_paths(1_000), 10);
        assert_eq!(
            RetentionPolicy::TerminalOnly { sample_paths: 0 }.retained_paths(1_000),
            0
        );
    }
}
