use serde::Serialize;

use crate::core::{Result, RetentionPolicy, SimulationParameters};
use crate::math::fast_rng::RngKind;
use crate::stats::{LogReturnMoments, TerminalDistributionSummary, summarize};

/// One retained trajectory together with the task index that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePath {
    pub index: usize,
    pub values: Vec<f64>,
}

impl PricePath {
    pub fn terminal(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Immutable output of one simulation run.
///
/// `terminal_prices()[i]` is the terminal value of task `i`. Full trajectories are
/// kept for every task under [`RetentionPolicy::Full`] and for tasks `0..k` under
/// [`RetentionPolicy::TerminalOnly`], ordered by task index.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationBatch {
    parameters: SimulationParameters,
    seed: u64,
    rng_kind: RngKind,
    retention: RetentionPolicy,
    terminals: Vec<f64>,
    paths: Vec<PricePath>,
}

impl SimulationBatch {
    pub(crate) fn new(
        parameters: SimulationParameters,
        seed: u64,
        rng_kind: RngKind,
        retention: RetentionPolicy,
        terminals: Vec<f64>,
        paths: Vec<PricePath>,
    ) -> Self {
        Self {
            parameters,
            seed,
            rng_kind,
            retention,
            terminals,
            paths,
        }
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    /// Run-level seed; replaying with it reproduces the batch exactly.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rng_kind(&self) -> RngKind {
        self.rng_kind
    }

    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// Number of trials.
    pub fn len(&self) -> usize {
        self.terminals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminals.is_empty()
    }

    pub fn timesteps(&self) -> usize {
        self.parameters.timesteps()
    }

    pub fn terminal_prices(&self) -> &[f64] {
        &self.terminals
    }

    /// Retained full paths in task order.
    pub fn paths(&self) -> &[PricePath] {
        &self.paths
    }

    /// Whether every trial's trajectory was retained.
    pub fn has_full_paths(&self) -> bool {
        self.paths.len() == self.terminals.len()
    }

    /// Full path of task `index`, if it was retained.
    pub fn path(&self, index: usize) -> Option<&PricePath> {
        self.paths
            .binary_search_by_key(&index, |p| p.index)
            .ok()
            .map(|pos| &self.paths[pos])
    }

    /// Up to `k` retained paths, lowest task indices first.
    pub fn sample_paths(&self, k: usize) -> &[PricePath] {
        &self.paths[..k.min(self.paths.len())]
    }

    pub fn summary(&self) -> Result<TerminalDistributionSummary> {
        summarize(&self.terminals)
    }

    pub fn log_return_moments(&self) -> Result<LogReturnMoments> {
        LogReturnMoments::from_terminals(&self.terminals, self.parameters.s0)
    }
}
