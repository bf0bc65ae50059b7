//! Weighted multi-way random partitioning.
//!
//! Each line is routed by a single uniform draw `u` to the one destination
//! whose cumulative range `[low, high)` contains `u`. Destinations are
//! mutually exclusive: a line lands in at most one of them. When the raw
//! weights sum to less than 1 and are not normalized, the leftover range
//! `[sum, 1)` is an implicit discard destination.
//!
//! Comparing one draw against every weight as an independent threshold (so a
//! line may be written to several destinations, or none) is deliberately not
//! supported: its overlap semantics have no clean partition contract.

use crate::draw::RandomDraw;
use crate::error::{ConfigError, ConfigResult};
use std::fmt;

/// Where one line goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Destination(usize),
    Discard,
}

/// Parsed, validated split weights with their cumulative cut-points.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    weights: Vec<f64>,
    cut_points: Vec<f64>,
}

impl Weights {
    /// Parse a comma-separated list such as `0.8,0.1,0.1`.
    ///
    /// Any token that is not a number is an error; surrounding whitespace is
    /// ignored.
    pub fn parse(text: &str, normalize: bool) -> ConfigResult<Self> {
        let raw = text
            .split(',')
            .map(|token| {
                token
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ConfigError::InvalidWeight(token.to_string()))
            })
            .collect::<ConfigResult<Vec<f64>>>()?;

        Self::from_raw(raw, normalize)
    }

    /// Validate raw weights, normalizing them to sum to 1 if requested.
    pub fn from_raw(raw: Vec<f64>, normalize: bool) -> ConfigResult<Self> {
        if raw.is_empty() {
            return Err(ConfigError::EmptyWeights);
        }
        if let Some(&bad) = raw.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(ConfigError::NegativeWeight(bad));
        }

        let weights = if normalize {
            // Scale by the largest weight first so the sum stays finite.
            let largest = raw.iter().copied().fold(0.0, f64::max);
            if largest <= 0.0 {
                return Err(ConfigError::ZeroWeightSum);
            }
            let scaled: Vec<f64> = raw.iter().map(|w| w / largest).collect();
            let sum: f64 = scaled.iter().sum();
            scaled.iter().map(|w| w / sum).collect()
        } else {
            let sum: f64 = raw.iter().sum();
            // Tolerate rounding in lists like 0.7,0.2,0.1.
            if sum > 1.0 + 1e-9 {
                return Err(ConfigError::WeightSumExceedsOne(sum));
            }
            raw
        };

        let mut cut_points = Vec::with_capacity(weights.len());
        let mut running = 0.0;
        for w in &weights {
            running += w;
            cut_points.push(running);
        }

        // A full partition must cover [0, 1) even after rounding.
        if normalize || running >= 1.0 - 1e-9 {
            if let Some(last) = weights.iter().rposition(|&w| w > 0.0) {
                for cut in &mut cut_points[last..] {
                    *cut = 1.0;
                }
            }
        }

        Ok(Self {
            weights,
            cut_points,
        })
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn cut_points(&self) -> &[f64] {
        &self.cut_points
    }

    /// Probability mass not assigned to any destination.
    pub fn remainder(&self) -> f64 {
        (1.0 - self.cut_points.last().copied().unwrap_or(0.0)).max(0.0)
    }

    /// Map a draw in `[0, 1)` to a destination.
    pub fn route(&self, u: f64) -> Route {
        match self.cut_points.iter().position(|&cut| u < cut) {
            Some(index) => Route::Destination(index),
            None => Route::Discard,
        }
    }
}

impl fmt::Display for Weights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.weights.iter().map(|w| format!("{w}")).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Routes every line to one destination with probability equal to its weight.
#[derive(Debug)]
pub struct WeightedSplitter<D> {
    weights: Weights,
    draw: D,
}

impl<D: RandomDraw> WeightedSplitter<D> {
    pub fn new(weights: Weights, draw: D) -> Self {
        Self { weights, draw }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    /// One draw, one route.
    pub fn next_route(&mut self) -> Route {
        let u = self.draw.uniform01();
        self.weights.route(u)
    }
}
