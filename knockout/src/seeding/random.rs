//! Randomness sources for seeding.
//!
//! Seeding only needs uniform floats in `[0, 1)`. Production uses the thread
//! RNG, reproducible runs use a seeded `StdRng`, and tests can replay a fixed
//! sequence to force a particular permutation.

use enum_dispatch::enum_dispatch;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// A source of uniform floats in `[0, 1)`.
#[enum_dispatch]
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// Thread-local, OS-seeded randomness.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        rand::random::<f64>()
    }
}

/// Deterministic randomness from a `u64` seed.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
///
/// Values outside `[0, 1)` are clamped into range. An empty sequence always
/// yields `0.0`.
#[derive(Clone, Debug, Default)]
pub struct FixedSequence {
    values: Vec<f64>,
    idx: usize,
}

impl FixedSequence {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, idx: 0 }
    }
}

impl RandomSource for FixedSequence {
    fn next_f64(&mut self) -> f64 {
        let Some(&value) = self.values.get(self.idx % self.values.len().max(1)) else {
            return 0.0;
        };
        self.idx += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Runtime-selectable randomness source.
#[enum_dispatch(RandomSource)]
#[derive(Clone, Debug)]
pub enum Randomness {
    ThreadRandom,
    SeededRandom,
    FixedSequence,
}

impl Randomness {
    /// Seeded when `seed` is given, thread randomness otherwise.
    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => SeededRandom::new(seed).into(),
            None => ThreadRandom.into(),
        }
    }
}

impl Default for Randomness {
    fn default() -> Self {
        ThreadRandom.into()
    }
}
