//! Sinusoidal sweeps
//!
//! Positions follow `sin(x) * amp + 0.5` around the middle of the disk. The
//! amplitude moves through levels of 0.05 (up to 0.50); at each level the
//! phase `x` runs over one full period.
//!
//! The single variant samples 64 points per period. The double variant
//! samples 32 points per period and emits each point followed by its mirror
//! `1.0 - f`, so two "heads" swing in opposition.

use super::Noise;
use crate::distribution::RandomSource;
use std::f64::consts::PI;

/// Amplitude increment between levels
pub const AMPLITUDE_STEP: f64 = 0.05;

/// Highest amplitude level (10 * 0.05 = 0.50)
pub const MAX_LEVEL: u32 = 10;

const SINGLE_STEPS_PER_PERIOD: u32 = 64;
const DOUBLE_STEPS_PER_PERIOD: u32 = 32;

/// Direction of the amplitude ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    /// 0.05 up to 0.50
    Widening,
    /// 0.50 down to 0.0; the last period parks the head in the middle
    NarrowingToZero,
}

impl Ramp {
    /// Amplitude levels in emission order
    pub fn levels(&self) -> Vec<u32> {
        match self {
            Ramp::Widening => (1..=MAX_LEVEL).collect(),
            Ramp::NarrowingToZero => (0..=MAX_LEVEL).rev().collect(),
        }
    }
}

/// Noise-free position on the curve
#[inline]
pub fn curve(amplitude: f64, x: f64) -> f64 {
    x.sin() * amplitude + 0.5
}

/// Sinusoid over a ramp of amplitudes
pub struct Sinusoid<'a> {
    noise: Noise,
    rng: &'a mut dyn RandomSource,
    levels: Vec<u32>,
    level_index: usize,
    step_index: u32,
    steps_per_period: u32,
    mirrored: bool,
    pending_mirror: Option<f64>,
}

impl<'a> Sinusoid<'a> {
    /// One head: `curve + noise`, 64 samples per period
    pub fn single(ramp: Ramp, noise: Noise, rng: &'a mut dyn RandomSource) -> Self {
        Self::new(ramp, SINGLE_STEPS_PER_PERIOD, false, noise, rng)
    }

    /// Two heads: `curve + noise` then `1.0 - curve + noise`, 32 samples per period
    pub fn double(ramp: Ramp, noise: Noise, rng: &'a mut dyn RandomSource) -> Self {
        Self::new(ramp, DOUBLE_STEPS_PER_PERIOD, true, noise, rng)
    }

    fn new(
        ramp: Ramp,
        steps_per_period: u32,
        mirrored: bool,
        noise: Noise,
        rng: &'a mut dyn RandomSource,
    ) -> Self {
        Self {
            noise,
            rng,
            levels: ramp.levels(),
            level_index: 0,
            step_index: 0,
            steps_per_period,
            mirrored,
            pending_mirror: None,
        }
    }

    /// Total number of positions this sinusoid emits
    pub fn len_hint(&self) -> usize {
        let per_level = self.steps_per_period as usize * if self.mirrored { 2 } else { 1 };
        self.levels.len() * per_level
    }
}

impl Iterator for Sinusoid<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if let Some(mirror) = self.pending_mirror.take() {
            return Some(mirror + self.noise.draw(&mut *self.rng));
        }

        let level = *self.levels.get(self.level_index)?;
        let amplitude = level as f64 * AMPLITUDE_STEP;
        let x = 2.0 * PI * self.step_index as f64 / self.steps_per_period as f64;
        let f = curve(amplitude, x);

        self.step_index += 1;
        if self.step_index >= self.steps_per_period {
            self.step_index = 0;
            self.level_index += 1;
        }

        if self.mirrored {
            self.pending_mirror = Some(1.0 - f);
        }
        Some(f + self.noise.draw(&mut *self.rng))
    }
}
