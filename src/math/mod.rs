//! Numerical building blocks: random streams, normal quantiles, return transforms.

pub mod fast_norm;
pub mod fast_rng;
pub mod returns;

pub use fast_norm::inverse_normal_cdf;
pub use fast_rng::{FastRng, RngKind, resolve_run_seed, substream_seed};
pub use returns::{log_returns, sample_mean, sample_std_dev, sample_variance};
