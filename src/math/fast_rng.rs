//! Seedable generators and the substream scheme used by the coordinator.
//!
//! Every task in a batch gets its own generator seeded from
//! [`substream_seed`]`(run_seed, task_index)`. The mapping is a pure function of
//! its inputs, so a batch is bit-identical no matter how tasks are scheduled.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::math::fast_norm::inverse_normal_cdf;

/// Generator family used for every task stream in a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RngKind {
    #[default]
    Xoshiro256PlusPlus,
    Pcg64,
    /// `rand`'s standard generator with ziggurat normals from `rand_distr`.
    StdRng,
}

#[derive(Debug, Clone)]
pub struct Xoshiro256PlusPlus {
    state: [u64; 4],
}

impl Xoshiro256PlusPlus {
    #[inline]
    pub fn seed_from_u64(seed: u64) -> Self {
        let mut sm = SplitMix64::new(seed);
        let mut state = [0_u64; 4];
        for word in &mut state {
            *word = sm.next_u64();
        }
        // all-zero is the one state xoshiro cannot leave
        if state.iter().all(|&x| x == 0) {
            state[0] = 1;
        }
        Self { state }
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.state[0].wrapping_add(self.state[3]))
            .rotate_left(23)
            .wrapping_add(self.state[0]);

        let t = self.state[1] << 17;

        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];

        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);

        result
    }

    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        unit_f64(self.next_u64())
    }
}

#[derive(Debug, Clone)]
pub struct Pcg64 {
    state: u128,
    inc: u128,
}

impl Pcg64 {
    const MULTIPLIER: u128 = 47026247687942121848144207491837523525;

    #[inline]
    pub fn seed_from_u64(seed: u64) -> Self {
        let mut sm = SplitMix64::new(seed);
        let hi = sm.next_u64() as u128;
        let lo = sm.next_u64() as u128;
        let stream = sm.next_u64() as u128;

        let mut rng = Self {
            state: (hi << 64) | lo,
            inc: (stream << 1) | 1,
        };
        rng.next_u64();
        rng
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let old = self.state;
        self.state = old.wrapping_mul(Self::MULTIPLIER).wrapping_add(self.inc);

        // XSL-RR 128/64 output permutation.
        let xorshifted = ((old >> 64) ^ old) as u64;
        let rot = (old >> 122) as u32;
        xorshifted.rotate_right(rot)
    }

    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        unit_f64(self.next_u64())
    }
}

/// A task-owned random stream.
#[derive(Debug)]
pub enum FastRng {
    Xoshiro256PlusPlus(Xoshiro256PlusPlus),
    Pcg64(Pcg64),
    StdRng(StdRng),
}

impl FastRng {
    #[inline]
    pub fn from_seed(kind: RngKind, seed: u64) -> Self {
        match kind {
            RngKind::Xoshiro256PlusPlus => {
                Self::Xoshiro256PlusPlus(Xoshiro256PlusPlus::seed_from_u64(seed))
            }
            RngKind::Pcg64 => Self::Pcg64(Pcg64::seed_from_u64(seed)),
            RngKind::StdRng => Self::StdRng(StdRng::seed_from_u64(seed)),
        }
    }

    /// Generator for task `task_index` of the run seeded with `run_seed`.
    #[inline]
    pub fn for_task(kind: RngKind, run_seed: u64, task_index: usize) -> Self {
        Self::from_seed(kind, substream_seed(run_seed, task_index))
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        match self {
            Self::Xoshiro256PlusPlus(rng) => rng.next_u64(),
            Self::Pcg64(rng) => rng.next_u64(),
            Self::StdRng(rng) => rng.random::<u64>(),
        }
    }

    /// Uniform draw in `[0, 1)`.
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        match self {
            Self::Xoshiro256PlusPlus(rng) => rng.next_f64(),
            Self::Pcg64(rng) => rng.next_f64(),
            Self::StdRng(rng) => rng.random::<f64>(),
        }
    }

    /// Standard normal draw.
    #[inline]
    pub fn standard_normal(&mut self) -> f64 {
        match self {
            Self::StdRng(rng) => StandardNormal.sample(rng),
            _ => inverse_normal_cdf(uniform_open01(self.next_f64())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

    #[inline]
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(Self::GAMMA);
        mix64(self.state)
    }
}

#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[inline]
fn unit_f64(x: u64) -> f64 {
    (x >> 11) as f64 * (1.0 / ((1_u64 << 53) as f64))
}

/// Derives the seed of substream `task_index` from a run-level seed.
///
/// Two SplitMix64 finalizer rounds over `run_seed` and a golden-ratio multiple of
/// `task_index + 1`. Neighbouring indices land on unrelated seeds, which are then
/// expanded by each generator's own SplitMix64 seeding.
#[inline]
pub fn substream_seed(run_seed: u64, task_index: usize) -> u64 {
    let offset = (task_index as u64)
        .wrapping_add(1)
        .wrapping_mul(SplitMix64::GAMMA);
    mix64(mix64(run_seed) ^ offset)
}

/// Returns `seed` or, when absent, a fresh seed from the thread-local OS-seeded generator.
pub fn resolve_run_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::rng().random::<u64>())
}

/// Maps `[0, 1)` into `(ε, 1 - ε)` before the inverse-CDF transform.
#[inline(always)]
pub fn uniform_open01(u: f64) -> f64 {
    u.max(f64::EPSILON).min(1.0 - f64::EPSILON)
}
