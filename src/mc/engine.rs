//! Module `mc::engine`.
//!
//! Parallel execution coordinator. A batch of `N` independent path tasks is split
//! into contiguous index ranges and fanned out over a fixed-size worker pool; the
//! caller blocks until every task has finished.
//!
//! Each task owns a generator seeded with `substream_seed(run_seed, task_index)` and
//! its own output buffer, so workers share nothing but the read-only path
//! generator. Because stream seeds depend only on the task index, the batch is
//! bit-identical for any worker count and any scheduling order.
//!
//! Any failing task (error or panic) fails the whole batch with an aggregate
//! [`SimulationError::TaskFailure`]; partial batches are never returned.
use std::any::Any;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::core::{
    Result, RetentionPolicy, SimulationConfig, SimulationError, SimulationParameters, TaskFailure,
    TaskFailureCause,
};
use crate::math::fast_rng::{FastRng, RngKind, resolve_run_seed};
use crate::mc::batch::{PricePath, SimulationBatch};
use crate::mc::cancel::CancellationToken;
use crate::mc::simulation::{GbmPathGenerator, PathGenerator};

/// Index ranges handed out per worker; more than one keeps uneven cores busy.
const CHUNKS_PER_WORKER: usize = 4;

#[derive(Debug)]
struct TaskOutput {
    terminal: f64,
    path: Option<Vec<f64>>,
}

type TaskResult = std::result::Result<TaskOutput, TaskFailure>;

#[derive(Debug, Clone, Default)]
pub struct MonteCarloEngine {
    /// Run seed; `None` draws a fresh one per run (recorded in the batch).
    pub seed: Option<u64>,
    /// Upper bound on worker threads; `None` uses all available cores.
    pub max_workers: Option<usize>,
    pub rng_kind: RngKind,
    pub retention: RetentionPolicy,
    pub cancellation: Option<CancellationToken>,
}

impl MonteCarloEngine {
    pub fn new(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            seed: config.seed,
            max_workers: config.max_workers,
            rng_kind: config.rng_kind,
            retention: config.retention,
            cancellation: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_randomized_seed(mut self) -> Self {
        self.seed = None;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers);
        self
    }

    pub fn with_rng_kind(mut self, rng_kind: RngKind) -> Self {
        self.rng_kind = rng_kind;
        self
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Pool size for `trials` tasks: `min(max_workers, available cores, trials)`.
    pub fn worker_count(&self, trials: usize) -> Result<usize> {
        let available = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let bound = match self.max_workers {
            Some(0) => {
                return Err(SimulationError::invalid("max_workers", 0.0, "must be >= 1"));
            }
            Some(n) => n.min(available),
            None => available,
        };
        Ok(bound.min(trials).max(1))
    }

    /// Simulates `trials` GBM paths.
    pub fn run(&self, params: &SimulationParameters, trials: usize) -> Result<SimulationBatch> {
        let generator = GbmPathGenerator::new(params)?;
        self.run_with(&generator, *params, trials)
    }

    /// Simulates `trials` paths with an arbitrary generator; `params` is recorded in
    /// the batch and must describe the generator's grid.
    pub fn run_with<G: PathGenerator>(
        &self,
        generator: &G,
        params: SimulationParameters,
        trials: usize,
    ) -> Result<SimulationBatch> {
        params.validate()?;
        if trials == 0 {
            return Err(SimulationError::invalid("trials", 0.0, "must be >= 1"));
        }

        let workers = self.worker_count(trials)?;
        let run_seed = resolve_run_seed(self.seed);
        let retained = self.retention.retained_paths(trials);
        let chunks = partition(trials, workers * CHUNKS_PER_WORKER);
        let cancel = self.cancellation.as_ref();
        let rng_kind = self.rng_kind;

        debug!(
            trials,
            workers,
            chunks = chunks.len(),
            timesteps = generator.steps(),
            seed = run_seed,
            retention = ?self.retention,
            "dispatching simulation batch"
        );
        let started = Instant::now();

        let task = |index: usize| {
            run_task(generator, rng_kind, run_seed, index, index < retained, cancel)
        };
        let results = dispatch(workers, &chunks, task)?;

        let mut terminals = Vec::with_capacity(trials);
        let mut paths = Vec::with_capacity(retained);
        let mut failures = Vec::new();
        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(out) => {
                    terminals.push(out.terminal);
                    if let Some(values) = out.path {
                        paths.push(PricePath { index, values });
                    }
                }
                Err(failure) => failures.push(failure),
            }
        }

        // a token tripped after the last task finished leaves a complete batch
        if failures.iter().any(TaskFailure::is_cancelled) {
            warn!(trials, completed = terminals.len(), "simulation batch cancelled");
            return Err(SimulationError::Cancelled);
        }
        if !failures.is_empty() {
            warn!(
                trials,
                failed = failures.len(),
                first_failed_task = failures[0].task,
                "simulation batch aborted"
            );
            return Err(SimulationError::TaskFailure(failures));
        }

        info!(
            trials,
            workers,
            retained_paths = paths.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "simulation batch complete"
        );

        Ok(SimulationBatch::new(
            params,
            run_seed,
            rng_kind,
            self.retention,
            terminals,
            paths,
        ))
    }
}

/// Splits `0..trials` into at most `chunks` contiguous, non-empty, ordered ranges.
fn partition(trials: usize, chunks: usize) -> Vec<Range<usize>> {
    let chunks = chunks.clamp(1, trials.max(1));
    let base = trials / chunks;
    let rem = trials % chunks;

    let mut start = 0;
    (0..chunks)
        .map(|i| {
            let len = base + usize::from(i < rem);
            let range = start..start + len;
            start += len;
            range
        })
        .filter(|r| !r.is_empty())
        .collect()
}

#[cfg(feature = "parallel")]
fn dispatch<F>(workers: usize, chunks: &[Range<usize>], task: F) -> Result<Vec<TaskResult>>
where
    F: Fn(usize) -> TaskResult + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("gbmsim-worker-{i}"))
        .build()
        .map_err(|err| SimulationError::Config(format!("failed to build worker pool: {err}")))?;

    let per_chunk: Vec<Vec<TaskResult>> = pool.install(|| {
        chunks
            .par_iter()
            .map(|range| range.clone().map(&task).collect())
            .collect()
    });
    Ok(per_chunk.into_iter().flatten().collect())
}

#[cfg(not(feature = "parallel"))]
fn dispatch<F>(_workers: usize, chunks: &[Range<usize>], task: F) -> Result<Vec<TaskResult>>
where
    F: Fn(usize) -> TaskResult + Sync,
{
    Ok(chunks
        .iter()
        .flat_map(|range| range.clone().map(&task))
        .collect())
}

fn run_task<G: PathGenerator>(
    generator: &G,
    rng_kind: RngKind,
    run_seed: u64,
    index: usize,
    keep_path: bool,
    cancel: Option<&CancellationToken>,
) -> TaskResult {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<TaskOutput> {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(SimulationError::Cancelled);
        }
        let mut rng = FastRng::for_task(rng_kind, run_seed, index);
        if keep_path {
            let mut values = vec![0.0_f64; generator.steps()];
            let terminal = generator.generate_into(&mut rng, cancel, &mut values)?;
            Ok(TaskOutput {
                terminal,
                path: Some(values),
            })
        } else {
            let terminal = generator.generate_terminal(&mut rng, cancel)?;
            Ok(TaskOutput {
                terminal,
                path: None,
            })
        }
    }));

    match outcome {
        Ok(Ok(out)) => Ok(out),
        Ok(Err(err)) => Err(TaskFailure {
            task: index,
            cause: TaskFailureCause::Error(Box::new(err)),
        }),
        Err(payload) => Err(TaskFailure {
            task: index,
            cause: TaskFailureCause::Panicked(panic_message(payload.as_ref())),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
