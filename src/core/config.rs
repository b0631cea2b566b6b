//! Run configuration loadable from JSON.
//!
//! ```rust
//! use gbmsim::core::SimulationConfig;
//!
//! let cfg: SimulationConfig = serde_json::from_str(r#"{ "trials": 5000, "seed": 7 }"#).unwrap();
//! assert_eq!(cfg.trials, 5000);
//! assert_eq!(cfg.horizon_days, 252);
//! cfg.validate().unwrap();
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SimulationError};
use crate::core::types::{RetentionPolicy, TRADING_DAYS_PER_YEAR};
use crate::math::fast_rng::RngKind;

/// Engine and horizon settings shared by the CLI and library callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub trials: usize,
    pub horizon_days: usize,
    pub trading_days_per_year: f64,
    pub seed: Option<u64>,
    /// Upper bound on worker threads; `None` uses every available core.
    pub max_workers: Option<usize>,
    pub rng_kind: RngKind,
    pub retention: RetentionPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 250_000,
            horizon_days: 252,
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
            seed: None,
            max_workers: None,
            rng_kind: RngKind::default(),
            retention: RetentionPolicy::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(SimulationError::invalid("trials", 0.0, "must be >= 1"));
        }
        if self.horizon_days == 0 {
            return Err(SimulationError::invalid("horizon_days", 0.0, "must be >= 1"));
        }
        if !self.trading_days_per_year.is_finite() || self.trading_days_per_year <= 0.0 {
            return Err(SimulationError::invalid(
                "trading_days_per_year",
                self.trading_days_per_year,
                "must be finite and > 0",
            ));
        }
        if self.max_workers == Some(0) {
            return Err(SimulationError::invalid("max_workers", 0.0, "must be >= 1"));
        }
        Ok(())
    }

    /// Horizon in years.
    pub fn horizon(&self) -> f64 {
        self.horizon_days as f64 / self.trading_days_per_year
    }

    /// Step size in years (one trading day).
    pub fn dt(&self) -> f64 {
        1.0 / self.trading_days_per_year
    }
}
