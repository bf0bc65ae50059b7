//! Shared helpers for integration tests.

#![allow(dead_code)]

use linesample::draw::RandomDraw;
use std::collections::VecDeque;

/// Replays a fixed script of draws and records what was asked for.
#[derive(Debug, Default)]
pub struct ScriptedDraw {
    units: VecDeque<f64>,
    ints: VecDeque<usize>,
    /// Bounds passed to `uniform_int`, in call order.
    pub int_bounds: Vec<usize>,
    /// Number of `uniform01` calls made.
    pub unit_calls: usize,
}

impl ScriptedDraw {
    pub fn new(units: &[f64], ints: &[usize]) -> Self {
        Self {
            units: units.iter().copied().collect(),
            ints: ints.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn units(units: &[f64]) -> Self {
        Self::new(units, &[])
    }

    pub fn is_exhausted(&self) -> bool {
        self.units.is_empty() && self.ints.is_empty()
    }
}

impl RandomDraw for ScriptedDraw {
    fn uniform01(&mut self) -> f64 {
        self.unit_calls += 1;
        self.units
            .pop_front()
            .expect("script ran out of uniform01 draws")
    }

    fn uniform_int(&mut self, n: usize) -> usize {
        self.int_bounds.push(n);
        let j = self
            .ints
            .pop_front()
            .expect("script ran out of uniform_int draws");
        assert!(j < n, "scripted index {j} out of range for n={n}");
        j
    }
}

pub fn lines(items: &[&str]) -> Vec<Vec<u8>> {
    items.iter().map(|s| s.as_bytes().to_vec()).collect()
}

pub fn as_strings(lines: &[Vec<u8>]) -> Vec<String> {
    lines
        .iter()
        .map(|l| String::from_utf8_lossy(l).into_owned())
        .collect()
}
