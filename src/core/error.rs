//! Library-wide error taxonomy.

use std::fmt;

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors surfaced by simulation, aggregation, and the data collaborators.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A model or engine parameter is outside its admissible domain.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// Path update produced NaN or infinity.
    #[error("numerical instability at step {step}: value {value}")]
    NumericalInstability { step: usize, value: f64 },
    /// One or more worker tasks failed; the whole batch is discarded.
    #[error("{} simulation task(s) failed: {}", .0.len(), TaskList(.0))]
    TaskFailure(Vec<TaskFailure>),
    /// Aggregation requested over zero trials.
    #[error("cannot aggregate an empty batch")]
    EmptyBatch,
    /// Batch was cancelled through its cancellation token.
    #[error("simulation cancelled")]
    Cancelled,
    /// Market data provider could not supply closes.
    #[error("no data available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },
    /// Parameter estimation needs more observations.
    #[error("insufficient data: need at least {required} observations, found {found}")]
    InsufficientData { required: usize, found: usize },
    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SimulationError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// Returns true for [`SimulationError::InvalidParameter`].
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

/// Failure of a single path-generation task, keyed by its stable task index.
#[derive(Debug)]
pub struct TaskFailure {
    pub task: usize,
    pub cause: TaskFailureCause,
}

impl TaskFailure {
    /// Whether the task stopped because its batch was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(&self.cause, TaskFailureCause::Error(err) if matches!(**err, SimulationError::Cancelled))
    }
}

/// Why a task failed.
#[derive(Debug)]
pub enum TaskFailureCause {
    /// The path generator returned an error.
    Error(Box<SimulationError>),
    /// The task panicked; the payload message is preserved when it is a string.
    Panicked(String),
}

impl fmt::Display for TaskFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            TaskFailureCause::Error(err) => write!(f, "task {}: {err}", self.task),
            TaskFailureCause::Panicked(msg) => write!(f, "task {} panicked: {msg}", self.task),
        }
    }
}

const LISTED_FAILURES: usize = 5;

struct TaskList<'a>(&'a [TaskFailure]);

impl fmt::Display for TaskList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().take(LISTED_FAILURES).enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{failure}")?;
        }
        if self.0.len() > LISTED_FAILURES {
            write!(f, "; and {} more", self.0.len() - LISTED_FAILURES)?;
        }
        Ok(())
    }
}
