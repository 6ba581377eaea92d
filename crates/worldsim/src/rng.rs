//! Injectable randomness for spawn rolls, move rolls and wander shuffles.
//! This module exists so tests and replay tooling can pin every random outcome.
//! It does not decide what the rolls mean; controllers interpret them.

use std::collections::VecDeque;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

use crate::types::Direction;

/// Source of uniform integers. Every random decision in a turn goes through one of these.
pub trait RngProvider {
    /// Uniform value in `[0, upper)`. `upper` of zero yields zero.
    fn below(&mut self, upper: u32) -> u32;

    /// Uniform value in `[low, high]`.
    fn range_inclusive(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        let span = high.abs_diff(low) + 1;
        low + self.below(span) as i32
    }

    /// True with probability `1 / n`. `n` of zero or one always succeeds.
    fn one_in(&mut self, n: u32) -> bool {
        n <= 1 || self.below(n) == 0
    }

    fn percent(&mut self, chance: u32) -> bool {
        chance >= 100 || self.below(100) < chance
    }

    fn coin_flip(&mut self) -> bool {
        self.below(2) == 0
    }
}

impl<R: RngProvider + ?Sized> RngProvider for &mut R {
    fn below(&mut self, upper: u32) -> u32 {
        (**self).below(upper)
    }
}

/// Fisher-Yates shuffle of the four cardinal directions.
pub fn shuffled_directions(rng: &mut dyn RngProvider) -> [Direction; 4] {
    let mut dirs = Direction::ALL;
    for i in (1..dirs.len()).rev() {
        let j = rng.below(i as u32 + 1) as usize;
        dirs.swap(i, j);
    }
    dirs
}

#[derive(Clone, Debug)]
pub struct SeededRng {
    seed: u64,
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RngProvider for SeededRng {
    fn below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        (self.inner.next_u64() % u64::from(upper)) as u32
    }
}

/// Replays recorded draws in order, then falls back to a fixed value.
/// Each draw is reduced modulo the requested bound.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRng {
    script: VecDeque<u32>,
    fallback: u32,
}

impl ScriptedRng {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self { script: values.into_iter().collect(), fallback: 0 }
    }

    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = fallback;
        self
    }

    /// Always draws `value`.
    pub fn constant(value: u32) -> Self {
        Self::new([]).with_fallback(value)
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RngProvider for ScriptedRng {
    fn below(&mut self, upper: u32) -> u32 {
        if upper == 0 {
            return 0;
        }
        self.script.pop_front().unwrap_or(self.fallback) % upper
    }
}
