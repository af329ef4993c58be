//! Scripted random source
//!
//! Replays fixed values in order, wrapping around when the script runs out.
//! Used by tests that need to assert exact position sequences.

use super::RandomSource;

/// Deterministic source cycling through fixed values
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    ints: Vec<u32>,
    units: Vec<f64>,
    next_int: usize,
    next_unit: usize,
}

impl ScriptedSource {
    /// Create a source from integer and real scripts
    ///
    /// Integers are clamped into the requested range when drawn; reals are
    /// clamped into [0.0, 1.0]. An empty script yields the lower bound.
    pub fn new(ints: Vec<u32>, units: Vec<f64>) -> Self {
        Self {
            ints,
            units,
            next_int: 0,
            next_unit: 0,
        }
    }

    /// Source that always returns the same values
    pub fn constant(int: u32, unit: f64) -> Self {
        Self::new(vec![int], vec![unit])
    }
}

impl RandomSource for ScriptedSource {
    fn next_int(&mut self, low: u32, high: u32) -> u32 {
        if self.ints.is_empty() || high <= low {
            return low;
        }

        let value = self.ints[self.next_int];
        self.next_int = (self.next_int + 1) % self.ints.len();
        value.clamp(low, high)
    }

    fn next_unit(&mut self) -> f64 {
        if self.units.is_empty() {
            return 0.0;
        }

        let value = self.units[self.next_unit];
        self.next_unit = (self.next_unit + 1) % self.units.len();
        value.clamp(0.0, 1.0)
    }
}
