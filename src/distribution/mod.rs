//! Random sources for motion noise and random jumps
//!
//! The motion sequencer never calls a global RNG. It is handed a
//! [`RandomSource`] instead, so production runs use a fast seeded PRNG and
//! tests can script the exact stream they want.
//!
//! # Sources
//!
//! - **Xoshiro**: xoshiro256++ seeded from entropy or a fixed seed
//! - **Scripted**: replays fixed integer and real values in a cycle
//!
//! # Example
//!
//! ```
//! use hdmotion::distribution::{RandomSource, uniform::XoshiroSource};
//!
//! let mut rng = XoshiroSource::with_seed(7);
//! let step = rng.next_int(1, 9);
//! assert!((1..=9).contains(&step));
//!
//! let p = rng.next_unit();
//! assert!((0.0..=1.0).contains(&p));
//! ```

/// Injected pseudo-random source
///
/// # Thread Safety
///
/// Sources must be `Send` so a configured sequencer can move to another
/// thread. A source is never shared between callers.
pub trait RandomSource: Send {
    /// Uniform integer in the inclusive range [low, high]
    ///
    /// Returns `low` when `high < low`.
    fn next_int(&mut self, low: u32, high: u32) -> u32;

    /// Uniform real in the inclusive range [0.0, 1.0]
    fn next_unit(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_int(&mut self, low: u32, high: u32) -> u32 {
        (**self).next_int(low, high)
    }

    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

pub mod scripted;
pub mod uniform;

pub use scripted::ScriptedSource;
pub use uniform::XoshiroSource;
