//! Module `mc::simulation`.
//!
//! Single-trajectory generation. A [`PathGenerator`] owns the model and grid; the
//! random stream and the output buffer are supplied per call so that each task in a
//! batch works on state nobody else touches.
//!
//! Numerical considerations: every produced point is checked for finiteness and
//! strict positivity. Extreme `μ`, `σ` or `dt` combinations that overflow or
//! underflow `exp` fail with [`SimulationError::NumericalInstability`] instead of
//! leaking `NaN`/`∞` into the batch.
use crate::core::{Result, SimulationError, SimulationParameters};
use crate::math::fast_rng::FastRng;
use crate::mc::cancel::CancellationToken;
use crate::models::Gbm;

pub trait PathGenerator: Send + Sync {
    /// Number of points per path, including the initial value.
    fn steps(&self) -> usize;

    fn initial_value(&self) -> f64;

    /// Advances one grid step using a standard normal draw `z`.
    fn advance(&self, current: f64, z: f64) -> f64;

    /// Walks one path, handing `(index, value)` for every point to `visit`.
    ///
    /// Returns the terminal value. Draws exactly `steps() - 1` normals from `rng`
    /// regardless of what `visit` does, so terminal values do not depend on whether
    /// the caller keeps the trajectory.
    fn walk<F>(
        &self,
        rng: &mut FastRng,
        cancel: Option<&CancellationToken>,
        mut visit: F,
    ) -> Result<f64>
    where
        F: FnMut(usize, f64),
        Self: Sized,
    {
        let mut s = self.initial_value();
        visit(0, s);

        for t in 1..self.steps() {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(SimulationError::Cancelled);
            }
            let z = rng.standard_normal();
            s = self.advance(s, z);
            if !s.is_finite() || s <= 0.0 {
                return Err(SimulationError::NumericalInstability { step: t, value: s });
            }
            visit(t, s);
        }

        Ok(s)
    }

    /// Fills `out` (length `steps()`) with a full path.
    fn generate_into(
        &self,
        rng: &mut FastRng,
        cancel: Option<&CancellationToken>,
        out: &mut [f64],
    ) -> Result<f64>
    where
        Self: Sized,
    {
        debug_assert_eq!(out.len(), self.steps());
        self.walk(rng, cancel, |t, s| out[t] = s)
    }

    /// Allocates and returns a full path.
    fn generate(&self, rng: &mut FastRng) -> Result<Vec<f64>>
    where
        Self: Sized,
    {
        let mut path = vec![0.0_f64; self.steps()];
        self.generate_into(rng, None, &mut path)?;
        Ok(path)
    }

    /// Terminal value only; memory use is independent of the number of steps.
    fn generate_terminal(
        &self,
        rng: &mut FastRng,
        cancel: Option<&CancellationToken>,
    ) -> Result<f64>
    where
        Self: Sized,
    {
        self.walk(rng, cancel, |_, _| {})
    }
}

/// Log-Euler GBM generator with precomputed per-step coefficients.
#[derive(Debug, Clone)]
pub struct GbmPathGenerator {
    pub model: Gbm,
    pub s0: f64,
    pub steps: usize,
    drift: f64,
    diffusion: f64,
}

impl GbmPathGenerator {
    pub fn new(params: &SimulationParameters) -> Result<Self> {
        params.validate()?;
        let model = Gbm::new(params.mu, params.sigma)?;
        Ok(Self {
            model,
            s0: params.s0,
            steps: params.timesteps(),
            drift: model.log_drift(params.dt),
            diffusion: model.log_diffusion(params.dt),
        })
    }
}

impl PathGenerator for GbmPathGenerator {
    fn steps(&self) -> usize {
        self.steps
    }

    fn initial_value(&self) -> f64 {
        self.s0
    }

    #[inline]
    fn advance(&self, current: f64, z: f64) -> f64 {
        current * self.diffusion.mul_add(z, self.drift).exp()
    }
}
