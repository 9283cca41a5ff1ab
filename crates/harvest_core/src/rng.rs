//! Deterministic seed derivation for batch scenario exploration.
//!
//! A [`SeedSweep`] turns a label and a base seed into a reproducible sequence of scenario
//! seeds. The simulation itself never draws random numbers; its weather is a pure function of
//! the seed, so sweeping seeds is how alternative histories of one configuration are explored.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_seeder::Seeder;

/// Upper bound (exclusive) of generated seeds; the lower bound is zero.
pub const SEED_SPAN: f64 = 1_000.0;

#[derive(Clone, Debug)]
pub struct SeedSweep {
    rng: ChaCha8Rng,
}

impl SeedSweep {
    /// Construct a sweep for the given `(label, base_seed)` pair.
    pub fn new(label: &str, base_seed: f64) -> Self {
        let rng = Seeder::from((label, base_seed.to_bits())).make_rng();
        Self { rng }
    }

    /// Draw the next scenario seed in `[0, SEED_SPAN)`, rounded to four decimals.
    pub fn next_seed(&mut self) -> f64 {
        let raw: f64 = self.rng.gen_range(0.0..SEED_SPAN);
        (raw * 10_000.0).floor() / 10_000.0
    }

    pub fn take_seeds(&mut self, count: usize) -> Vec<f64> {
        (0..count).map(|_| self.next_seed()).collect()
    }
}

impl Iterator for SeedSweep {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_seed())
    }
}
