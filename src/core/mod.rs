//! Core domain types, run configuration, and the library-wide error type.

pub mod config;
pub mod error;
pub mod types;

pub use config::SimulationConfig;
pub use error::{Result, SimulationError, TaskFailure, TaskFailureCause};
pub use types::{MAX_TIMESTEPS, RetentionPolicy, SimulationParameters, TRADING_DAYS_PER_YEAR};
