//! Motion patterns
//!
//! A motion program is an ordered list of [`MotionPhase`]s. Each phase is a
//! lazy, finite iterator of normalized head positions; the
//! [`MotionSequencer`](sequencer::MotionSequencer) walks the phases in order and
//! hands every position to the device accessor.
//!
//! # Phases
//!
//! | Phase | Pattern |
//! |-------|---------|
//! | `zigzag` | full-span sweeps with a step that grows each iteration |
//! | `tightening` | sweeps between bounds closing in on the middle |
//! | `widening-sine` | sinusoid with growing amplitude |
//! | `narrowing-sine` | sinusoid with shrinking amplitude |
//! | `widening-double-sine` | sinusoid and its mirror, growing |
//! | `narrowing-double-sine` | sinusoid and its mirror, shrinking |
//! | `multi-head` | evenly spaced "heads" visited in turn |
//! | `random` | uniform random jumps |
//!
//! # Noise
//!
//! Most phases add a small perturbation, `noise_scale * U{1..=noise_max_multiplier}`
//! (0.0001 to 0.0009 by default), drawn per position from the injected
//! [`RandomSource`]. It keeps the motion from being perfectly periodic.

use crate::config::MotionConfig;
use crate::distribution::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod heads;
pub mod random;
pub mod sequencer;
pub mod sinusoid;
pub mod zigzag;

pub use sequencer::MotionSequencer;

/// Named motion pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotionPhase {
    #[serde(rename = "zigzag")]
    ZigZag,
    #[serde(rename = "tightening")]
    TighteningZigZag,
    #[serde(rename = "widening-sine")]
    WideningSinusoid,
    #[serde(rename = "narrowing-sine")]
    NarrowingSinusoid,
    #[serde(rename = "widening-double-sine")]
    WideningDoubleSinusoid,
    #[serde(rename = "narrowing-double-sine")]
    NarrowingDoubleSinusoid,
    MultiHead,
    #[serde(rename = "random")]
    RandomJump,
}

impl MotionPhase {
    /// Every phase, in program order
    pub const ALL: [MotionPhase; 8] = [
        MotionPhase::ZigZag,
        MotionPhase::TighteningZigZag,
        MotionPhase::WideningSinusoid,
        MotionPhase::NarrowingSinusoid,
        MotionPhase::WideningDoubleSinusoid,
        MotionPhase::NarrowingDoubleSinusoid,
        MotionPhase::MultiHead,
        MotionPhase::RandomJump,
    ];

    /// Name used in config files, on the command line and in output
    pub fn name(&self) -> &'static str {
        match self {
            MotionPhase::ZigZag => "zigzag",
            MotionPhase::TighteningZigZag => "tightening",
            MotionPhase::WideningSinusoid => "widening-sine",
            MotionPhase::NarrowingSinusoid => "narrowing-sine",
            MotionPhase::WideningDoubleSinusoid => "widening-double-sine",
            MotionPhase::NarrowingDoubleSinusoid => "narrowing-double-sine",
            MotionPhase::MultiHead => "multi-head",
            MotionPhase::RandomJump => "random",
        }
    }

    /// Position in the canonical program order
    pub fn ordinal(&self) -> usize {
        MotionPhase::ALL
            .iter()
            .position(|p| p == self)
            .unwrap_or(MotionPhase::ALL.len())
    }
}

impl fmt::Display for MotionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-position perturbation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Noise {
    scale: f64,
    max_multiplier: u32,
}

impl Noise {
    pub fn new(scale: f64, max_multiplier: u32) -> Self {
        Self { scale, max_multiplier }
    }

    /// Noise that is always zero and never touches the random source
    pub fn disabled() -> Self {
        Self::new(0.0, 0)
    }

    pub fn from_config(config: &MotionConfig) -> Self {
        Self::new(config.noise_scale, config.noise_max_multiplier)
    }

    pub fn is_enabled(&self) -> bool {
        self.max_multiplier > 0 && self.scale != 0.0
    }

    /// Draw one perturbation
    #[inline]
    pub fn draw(&self, rng: &mut dyn RandomSource) -> f64 {
        if !self.is_enabled() {
            return 0.0;
        }
        self.scale * rng.next_int(1, self.max_multiplier) as f64
    }

    /// Largest value `draw` can return
    pub fn max(&self) -> f64 {
        if !self.is_enabled() {
            return 0.0;
        }
        self.scale * self.max_multiplier as f64
    }
}

/// Positions of one phase
///
/// `cursor` is the last position emitted by the previous phase; only the
/// tightening zig-zag starts from it, every other phase has a fixed start.
pub fn phase_positions<'a>(
    phase: MotionPhase,
    config: &MotionConfig,
    cursor: f64,
    rng: &'a mut dyn RandomSource,
) -> Box<dyn Iterator<Item = f64> + 'a> {
    let noise = Noise::from_config(config);

    match phase {
        MotionPhase::ZigZag => Box::new(zigzag::ZigZag::new(
            config.zigzag_iterations,
            config.zigzag_base_step,
            config.zigzag_step_increment,
        )),
        MotionPhase::TighteningZigZag => Box::new(zigzag::TighteningZigZag::new(
            cursor,
            zigzag::final_step(config),
            noise,
            rng,
        )),
        MotionPhase::WideningSinusoid => Box::new(sinusoid::Sinusoid::single(
            sinusoid::Ramp::Widening,
            noise,
            rng,
        )),
        MotionPhase::NarrowingSinusoid => Box::new(sinusoid::Sinusoid::single(
            sinusoid::Ramp::NarrowingToZero,
            noise,
            rng,
        )),
        MotionPhase::WideningDoubleSinusoid => Box::new(sinusoid::Sinusoid::double(
            sinusoid::Ramp::Widening,
            noise,
            rng,
        )),
        MotionPhase::NarrowingDoubleSinusoid => Box::new(sinusoid::Sinusoid::double(
            sinusoid::Ramp::NarrowingToZero,
            noise,
            rng,
        )),
        MotionPhase::MultiHead => Box::new(heads::MultiHead::new(
            config.head_repeat_budget,
            noise,
            rng,
        )),
        MotionPhase::RandomJump => Box::new(random::RandomJump::new(config.random_jumps, rng)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::ScriptedSource;

    #[test]
    fn test_phase_names_roundtrip_serde() {
        for phase in MotionPhase::ALL {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{}\"", phase.name()));
            let back: MotionPhase = serde_json::from_str(&json).unwrap();
            assert_eq!(back, phase);
        }
    }

    #[test]
    fn test_phase_ordinals() {
        for (i, phase) in MotionPhase::ALL.iter().enumerate() {
            assert_eq!(phase.ordinal(), i);
        }
    }

    #[test]
    fn test_noise_range() {
        let noise = Noise::new(0.0001, 9);
        let mut rng = ScriptedSource::new(vec![1, 5, 9], vec![]);

        assert!((noise.draw(&mut rng) - 0.0001).abs() < 1e-12);
        assert!((noise.draw(&mut rng) - 0.0005).abs() < 1e-12);
        assert!((noise.draw(&mut rng) - 0.0009).abs() < 1e-12);
        assert!((noise.max() - 0.0009).abs() < 1e-12);
    }

    #[test]
    fn test_noise_disabled() {
        let noise = Noise::disabled();
        let mut rng = ScriptedSource::constant(9, 1.0);
        assert!(!noise.is_enabled());
        assert_eq!(noise.draw(&mut rng), 0.0);
        assert_eq!(noise.max(), 0.0);
    }

    #[test]
    fn test_every_phase_is_finite() {
        let config = MotionConfig::default();
        let mut rng = ScriptedSource::constant(5, 0.5);

        for phase in MotionPhase::ALL {
            let count = phase_positions(phase, &config, 0.0, &mut rng).count();
            assert!(count > 0, "phase {} produced no positions", phase);
        }
    }

    #[test]
    fn test_both_narrowing_sines_reach_zero_amplitude() {
        let config = MotionConfig::default().without_noise();
        let mut rng = ScriptedSource::constant(1, 0.0);

        let single = phase_positions(MotionPhase::NarrowingSinusoid, &config, 0.0, &mut rng).count();
        let double =
            phase_positions(MotionPhase::NarrowingDoubleSinusoid, &config, 0.0, &mut rng).count();
        assert_eq!(single, 11 * 64);
        assert_eq!(double, 11 * 32 * 2);
    }
}
