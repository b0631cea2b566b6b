//! gbmsim estimates the distribution of a future asset price by simulating many
//! independent geometric Brownian motion paths and summarizing their terminal values.
//!
//! The crate is organized around three pieces:
//! - a path generator ([`mc::GbmPathGenerator`]) that walks one log-Euler GBM trajectory,
//! - a parallel coordinator ([`mc::MonteCarloEngine`]) that fans `N` path tasks out over a
//!   worker pool, each task on its own seeded random substream,
//! - a statistics aggregator ([`stats::summarize`]) that reduces terminal prices to mean and
//!   5th/95th percentiles.
//!
//! Around them sit the collaborators a forecasting run needs: file-backed historical closes
//! ([`market`]), drift/volatility estimation ([`calibration`]), and CSV/console output
//! ([`report`]).
//!
//! References:
//! - Glasserman (2004), *Monte Carlo Methods in Financial Engineering*, Ch. 3.2 (exact GBM
//!   simulation) and Ch. 2 (random number streams).
//! - Hull, *Options, Futures, and Other Derivatives* (11th ed.), Ch. 15 (lognormal property).
//!
//! Numerical considerations:
//! - The log-Euler step is exact in distribution for constant coefficients, so accuracy is
//!   limited by sampling error, not step size.
//! - Non-finite or non-positive path values are reported as errors, never emitted.
//! - A batch is fully determined by its run seed; worker count and scheduling never change it.
//!
//! # Feature Flags
//! - `parallel` (default): Rayon worker pool. Without it tasks run sequentially with
//!   identical results.
//!
//! # Quick Start
//! Simulate one year of daily steps and summarize:
//! ```rust
//! use gbmsim::mc::simulate;
//!
//! let batch = simulate(100.0, 0.08, 0.25, 1.0, 1.0 / 252.0, 2_000, Some(42)).unwrap();
//! let summary = batch.summary().unwrap();
//! assert!(summary.p5 < summary.mean && summary.mean < summary.p95);
//! ```
//!
//! Keep only terminal values plus a handful of sample paths:
//! ```rust
//! use gbmsim::core::{RetentionPolicy, SimulationParameters};
//! use gbmsim::mc::MonteCarloEngine;
//!
//! let params = SimulationParameters::daily(100.0, 0.08, 0.25, 252).unwrap();
//! let batch = MonteCarloEngine::new(7)
//!     .with_max_workers(4)
//!     .with_retention(RetentionPolicy::TerminalOnly { sample_paths: 10 })
//!     .run(&params, 10_000)
//!     .unwrap();
//! assert_eq!(batch.terminal_prices().len(), 10_000);
//! assert_eq!(batch.sample_paths(10).len(), 10);
//! ```
//!
//! Estimate parameters from closes:
//! ```rust
//! use gbmsim::calibration::estimate_from_closes;
//!
//! let est = estimate_from_closes(&[100.0, 101.0, 100.5, 102.0, 103.1]).unwrap();
//! assert_eq!(est.s0, 103.1);
//! assert!(est.sigma > 0.0);
//! ```

pub mod calibration;
pub mod core;
pub mod market;
pub mod math;
pub mod mc;
pub mod models;
pub mod report;
pub mod stats;

/// Common imports for ergonomic usage.
pub mod prelude {
    pub use crate::calibration::{GbmEstimate, estimate_gbm_parameters};
    pub use crate::core::*;
    pub use crate::market::{CsvPriceProvider, MarketDataProvider, PriceSeries};
    pub use crate::math::RngKind;
    pub use crate::mc::{
        CancellationToken, MonteCarloEngine, PricePath, SimulationBatch, simulate,
    };
    pub use crate::models::Gbm;
    pub use crate::stats::{TerminalDistributionSummary, summarize};
}
