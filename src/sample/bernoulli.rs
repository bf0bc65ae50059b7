//! Independent-probability (Bernoulli) sampling.

use crate::draw::RandomDraw;
use crate::error::{ConfigError, ConfigResult};

/// Keeps each line independently with probability `p`.
///
/// Stateless between lines apart from the draw source; kept lines come out in
/// input order.
#[derive(Debug)]
pub struct BernoulliSampler<D> {
    probability: f64,
    draw: D,
}

/// Reject anything outside `[0, 1]`, including NaN.
pub fn validate_probability(p: f64) -> ConfigResult<f64> {
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(ConfigError::InvalidProbability(p))
    }
}

impl<D: RandomDraw> BernoulliSampler<D> {
    pub fn new(probability: f64, draw: D) -> ConfigResult<Self> {
        Ok(Self {
            probability: validate_probability(probability)?,
            draw,
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// One draw per line: keep when `u < p`.
    pub fn keep(&mut self) -> bool {
        self.draw.uniform01() < self.probability
    }

    /// Filter `lines`, preserving order.
    pub fn sample<'a, T: 'a, I>(&'a mut self, lines: I) -> impl Iterator<Item = T> + 'a
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        lines.into_iter().filter(move |_| self.keep())
    }
}
