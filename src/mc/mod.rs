//! Monte Carlo simulation of GBM price paths.
//!
//! ```rust
//! use gbmsim::mc::simulate;
//!
//! let batch = simulate(100.0, 0.08, 0.25, 1.0, 1.0 / 252.0, 1_000, Some(42)).unwrap();
//! assert_eq!(batch.len(), 1_000);
//! assert_eq!(batch.paths()[0].values[0], 100.0);
//!
//! let summary = batch.summary().unwrap();
//! assert!(summary.p5 <= summary.p95);
//! ```

pub mod batch;
pub mod cancel;
pub mod engine;
pub mod simulation;

pub use batch::{PricePath, SimulationBatch};
pub use cancel::CancellationToken;
pub use engine::MonteCarloEngine;
pub use simulation::{GbmPathGenerator, PathGenerator};

use crate::core::{Result, RetentionPolicy, SimulationParameters};

/// Simulates `trials` GBM paths and keeps every trajectory.
///
/// `seed = None` draws a fresh run seed, available afterwards as
/// [`SimulationBatch::seed`]. Use [`MonteCarloEngine`] to bound the worker pool or
/// keep only terminal values.
pub fn simulate(
    s0: f64,
    mu: f64,
    sigma: f64,
    horizon: f64,
    dt: f64,
    trials: usize,
    seed: Option<u64>,
) -> Result<SimulationBatch> {
    let params = SimulationParameters::new(s0, mu, sigma, horizon, dt)?;
    MonteCarloEngine {
        seed,
        retention: RetentionPolicy::Full,
        ..MonteCarloEngine::default()
    }
    .run(&params, trials)
}
