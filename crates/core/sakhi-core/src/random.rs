//! Injectable randomness
//!
//! Every random draw in the engine (mood shifts, the availability gate, typo
//! injection, fallback selection) goes through [`RandomSource`] so tests can
//! script the exact sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// A source of random decisions
pub trait RandomSource: Send {
    /// Bernoulli trial with success probability `probability`
    fn chance(&mut self, probability: f64) -> bool;

    /// Uniform index in `0..len`; 0 when `len` is 0
    fn index(&mut self, len: usize) -> usize;

    /// Uniform integer in `low..=high`
    fn range_inclusive(&mut self, low: u32, high: u32) -> u32;
}

/// Pick one element uniformly
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.index(items.len()))
}

/// `StdRng`-backed randomness
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seed from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for StdRandom {
    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.rng.gen_bool(probability)
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.rng.gen_range(0..len)
    }

    fn range_inclusive(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}

/// Replays scripted outcomes.
///
/// Certain outcomes (probability ≤ 0 or ≥ 1) never consume a scripted value.
/// Once a queue runs dry it answers `false`, index 0 and the range minimum.
#[derive(Debug, Default, Clone)]
pub struct ScriptedRandom {
    chances: VecDeque<bool>,
    indices: VecDeque<usize>,
    ranges: VecDeque<u32>,
    chance_draws: usize,
}

impl ScriptedRandom {
    /// Empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue Bernoulli outcomes
    pub fn with_chances(mut self, chances: impl IntoIterator<Item = bool>) -> Self {
        self.chances.extend(chances);
        self
    }

    /// Queue index picks
    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices.extend(indices);
        self
    }

    /// Queue range picks
    pub fn with_ranges(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.ranges.extend(values);
        self
    }

    /// Number of uncertain Bernoulli trials drawn so far
    pub fn chance_draws(&self) -> usize {
        self.chance_draws
    }
}

impl RandomSource for ScriptedRandom {
    fn chance(&mut self, probability: f64) -> bool {
        if probability.is_nan() || probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.chance_draws += 1;
        self.chances.pop_front().unwrap_or(false)
    }

    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.indices.pop_front().map(|i| i % len).unwrap_or(0)
    }

    fn range_inclusive(&mut self, low: u32, high: u32) -> u32 {
        self.ranges
            .pop_front()
            .map(|v| v.clamp(low, high.max(low)))
            .unwrap_or(low)
    }
}
