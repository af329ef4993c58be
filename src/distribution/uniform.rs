//! Uniform random source
//!
//! Uses the xoshiro256++ PRNG: fast, good statistical properties, and
//! reproducible from a 64-bit seed.
//!
//! # Example
//!
//! ```
//! use hdmotion::distribution::{RandomSource, uniform::XoshiroSource};
//!
//! let mut a = XoshiroSource::with_seed(42);
//! let mut b = XoshiroSource::with_seed(42);
//! assert_eq!(a.next_unit(), b.next_unit());
//! ```

use super::RandomSource;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Seedable uniform source
pub struct XoshiroSource {
    rng: Xoshiro256PlusPlus,
    seed: u64,
}

impl XoshiroSource {
    /// Create a source with a random seed
    ///
    /// The seed is drawn from the OS and kept so the run can be reproduced
    /// later with [`XoshiroSource::with_seed`].
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Create a source with a specific seed
    ///
    /// Useful for reproducible runs and tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this source was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for XoshiroSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for XoshiroSource {
    #[inline]
    fn next_int(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }

    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..=1.0)
    }
}
