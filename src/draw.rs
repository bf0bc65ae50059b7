//! Sources of randomness for the sampling algorithms.
//!
//! The algorithms never reach for a process-wide generator. Each one owns a
//! [`RandomDraw`] handed to it at construction, so a run can be driven by an
//! OS-seeded generator in production and by a fixed seed or a scripted
//! sequence of draws in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform draws consumed by the samplers.
pub trait RandomDraw {
    /// A uniformly distributed value in `[0, 1)`.
    fn uniform01(&mut self) -> f64;

    /// A uniformly distributed integer in `[0, n)`. Callers never pass `n == 0`.
    fn uniform_int(&mut self, n: usize) -> usize;
}

impl<D: RandomDraw + ?Sized> RandomDraw for &mut D {
    fn uniform01(&mut self) -> f64 {
        (**self).uniform01()
    }

    fn uniform_int(&mut self, n: usize) -> usize {
        (**self).uniform_int(n)
    }
}

/// Adapts any `rand` generator to [`RandomDraw`].
#[derive(Debug, Clone)]
pub struct RngDraw<R = StdRng> {
    rng: R,
}

impl<R: Rng> RngDraw<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngDraw<StdRng> {
    /// Generator seeded once from the operating system's entropy source.
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomDraw for RngDraw<R> {
    fn uniform01(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    fn uniform_int(&mut self, n: usize) -> usize {
        self.rng.random_range(0..n)
    }
}
