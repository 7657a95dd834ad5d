//! Injectable randomness
//!
//! The simulation only ever asks for a uniform integer in a closed range.
//! Production uses a seeded PCG stream; tests script the exact draws.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform integers for obstacle distances and visual types
pub trait RandomSource: Send {
    /// Uniform integer in `[min, max]`. Returns `min` when `min >= max`.
    fn range_inclusive(&mut self, min: i32, max: i32) -> i32;
}

/// Pick one element uniformly. `items` must not be empty.
pub fn pick<T: Copy>(rng: &mut dyn RandomSource, items: &[T]) -> T {
    let last = items.len().saturating_sub(1) as i32;
    let index = rng.range_inclusive(0, last).clamp(0, last) as usize;
    items[index]
}

/// Seeded PCG source (deterministic per seed)
#[derive(Debug, Clone)]
pub struct PcgSource {
    rng: Pcg32,
}

impl PcgSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for PcgSource {
    fn range_inclusive(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted
///
/// Values outside the requested range are clamped into it, so a script can
/// never produce a distance or type outside the documented sets.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    values: Vec<i32>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(values: impl Into<Vec<i32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for ScriptedSource {
    fn range_inclusive(&mut self, min: i32, max: i32) -> i32 {
        if min >= max || self.values.is_empty() {
            return min;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value.clamp(min, max)
    }
}
