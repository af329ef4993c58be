//! Zig-zag sweeps
//!
//! Two phases live here:
//!
//! - [`ZigZag`]: full sweeps 0.0 -> 1.0 -> 0.0. Iteration `i` (0-based) uses
//!   step `base_step + step_increment * (i + 1)`, so the head speeds up
//!   linearly from one iteration to the next. No noise.
//! - [`TighteningZigZag`]: sweeps between an upper bound shrinking from 0.90
//!   and a lower bound growing from 0.10, 0.05 per round, until they meet.
//!   Every step is perturbed by noise.

use super::Noise;
use crate::config::MotionConfig;
use crate::distribution::RandomSource;

/// Sweep direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Identifies one sweep of a zig-zag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sweep {
    pub iteration: usize,
    pub direction: Direction,
}

/// Step used by zig-zag iteration `iteration` (0-based)
pub fn iteration_step(base_step: f64, step_increment: f64, iteration: usize) -> f64 {
    base_step + step_increment * (iteration + 1) as f64
}

/// Step the tightening phase inherits: the last zig-zag iteration's step
pub fn final_step(config: &MotionConfig) -> f64 {
    let last = config.zigzag_iterations.saturating_sub(1);
    iteration_step(config.zigzag_base_step, config.zigzag_step_increment, last)
}

/// Full-span zig-zag
#[derive(Debug, Clone)]
pub struct ZigZag {
    iterations: usize,
    base_step: f64,
    step_increment: f64,
    iteration: usize,
    direction: Direction,
    f: f64,
    last_sweep: Option<Sweep>,
}

impl ZigZag {
    /// # Arguments
    ///
    /// * `iterations` - Number of forward+backward sweep pairs
    /// * `base_step` - Step before the per-iteration increment (must be > 0)
    /// * `step_increment` - Growth of the step per iteration (>= 0)
    pub fn new(iterations: usize, base_step: f64, step_increment: f64) -> Self {
        Self {
            iterations,
            base_step,
            step_increment,
            iteration: 0,
            direction: Direction::Forward,
            f: 0.0,
            last_sweep: None,
        }
    }

    /// Sweep the most recently returned position belongs to
    pub fn last_sweep(&self) -> Option<Sweep> {
        self.last_sweep
    }

    fn step(&self) -> f64 {
        iteration_step(self.base_step, self.step_increment, self.iteration)
    }
}

impl Iterator for ZigZag {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        loop {
            if self.iteration >= self.iterations {
                return None;
            }

            let step = self.step();
            match self.direction {
                Direction::Forward => {
                    if self.f <= 1.0 {
                        let position = self.f;
                        self.f += step;
                        self.last_sweep = Some(Sweep {
                            iteration: self.iteration,
                            direction: Direction::Forward,
                        });
                        return Some(position);
                    }
                    // Overshot the top: come back one step and reverse
                    self.direction = Direction::Backward;
                    self.f -= step;
                }
                Direction::Backward => {
                    if self.f >= 0.0 {
                        let position = self.f;
                        self.f -= step;
                        self.last_sweep = Some(Sweep {
                            iteration: self.iteration,
                            direction: Direction::Backward,
                        });
                        return Some(position);
                    }
                    self.iteration += 1;
                    self.direction = Direction::Forward;
                    self.f = 0.0;
                }
            }
        }
    }
}

const TIGHTENING_HIGH: f64 = 0.90;
const TIGHTENING_LOW: f64 = 0.10;
const TIGHTENING_DELTA: f64 = 0.05;

/// Bounds of tightening round `round`, as (low, high)
pub fn tightening_bounds(round: u32) -> (f64, f64) {
    let shift = TIGHTENING_DELTA * round as f64;
    (TIGHTENING_LOW + shift, TIGHTENING_HIGH - shift)
}

/// Number of rounds before the bounds cross
pub fn tightening_rounds() -> u32 {
    let mut round = 0;
    while bounds_open(round) {
        round += 1;
    }
    round
}

fn bounds_open(round: u32) -> bool {
    let (low, high) = tightening_bounds(round);
    // Tolerance so the meeting round (0.50, 0.50) counts as crossed
    high - low > 1e-9
}

/// Zig-zag between closing bounds
pub struct TighteningZigZag<'a> {
    noise: Noise,
    rng: &'a mut dyn RandomSource,
    step: f64,
    f: f64,
    round: u32,
    direction: Direction,
}

impl<'a> TighteningZigZag<'a> {
    /// # Arguments
    ///
    /// * `start` - Position the head is currently at
    /// * `step` - Base step (must be > 0), perturbed by noise each move
    pub fn new(start: f64, step: f64, noise: Noise, rng: &'a mut dyn RandomSource) -> Self {
        Self {
            noise,
            rng,
            step,
            f: start,
            round: 0,
            direction: Direction::Forward,
        }
    }

    /// Current round (0-based)
    pub fn round(&self) -> u32 {
        self.round
    }
}

impl Iterator for TighteningZigZag<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        loop {
            if !bounds_open(self.round) {
                return None;
            }

            let (low, high) = tightening_bounds(self.round);
            match self.direction {
                Direction::Forward => {
                    if self.f < high {
                        let position = self.f;
                        self.f += self.step + self.noise.draw(&mut *self.rng);
                        return Some(position);
                    }
                    self.direction = Direction::Backward;
                }
                Direction::Backward => {
                    if self.f > low {
                        let position = self.f;
                        self.f -= self.step + self.noise.draw(&mut *self.rng);
                        return Some(position);
                    }
                    self.direction = Direction::Forward;
                    self.round += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{ScriptedSource, XoshiroSource};

    fn collect_sweeps(zigzag: &mut ZigZag) -> Vec<(Sweep, f64)> {
        let mut out = Vec::new();
        while let Some(position) = zigzag.next() {
            out.push((zigzag.last_sweep().unwrap(), position));
        }
        out
    }

    #[test]
    fn test_iteration_step_grows() {
        let steps: Vec<f64> = (0..5).map(|i| iteration_step(0.01, 0.001, i)).collect();
        assert!((steps[0] - 0.011).abs() < 1e-12);
        assert!((steps[4] - 0.015).abs() < 1e-12);
        for pair in steps.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_final_step_uses_last_iteration() {
        let config = MotionConfig::default();
        assert!((final_step(&config) - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_zigzag_five_sweep_pairs() {
        let mut zigzag = ZigZag::new(5, 0.01, 0.001);
        let moves = collect_sweeps(&mut zigzag);

        let mut sweeps: Vec<Sweep> = moves.iter().map(|(s, _)| *s).collect();
        sweeps.dedup();

        assert_eq!(sweeps.len(), 10);
        for (i, pair) in sweeps.chunks(2).enumerate() {
            assert_eq!(pair[0], Sweep { iteration: i, direction: Direction::Forward });
            assert_eq!(pair[1], Sweep { iteration: i, direction: Direction::Backward });
        }
    }

    #[test]
    fn test_zigzag_forward_monotonic_and_bounded() {
        let mut zigzag = ZigZag::new(5, 0.01, 0.001);
        let moves = collect_sweeps(&mut zigzag);

        for iteration in 0..5 {
            let forward: Vec<f64> = moves
                .iter()
                .filter(|(s, _)| s.iteration == iteration && s.direction == Direction::Forward)
                .map(|(_, p)| *p)
                .collect();

            assert_eq!(forward[0], 0.0);
            assert!(forward.windows(2).all(|w| w[1] >= w[0]));
            assert!(forward.iter().all(|p| (0.0..=1.0).contains(p)));
            // Reaches near the top of the span
            assert!(*forward.last().unwrap() > 0.95);

            let backward: Vec<f64> = moves
                .iter()
                .filter(|(s, _)| s.iteration == iteration && s.direction == Direction::Backward)
                .map(|(_, p)| *p)
                .collect();

            assert!(backward.windows(2).all(|w| w[1] <= w[0]));
            assert!(backward.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }

    #[test]
    fn test_zigzag_later_iterations_are_shorter() {
        let mut zigzag = ZigZag::new(5, 0.01, 0.001);
        let moves = collect_sweeps(&mut zigzag);

        let count = |i: usize| moves.iter().filter(|(s, _)| s.iteration == i).count();
        assert!(count(4) < count(0));
    }

    #[test]
    fn test_zigzag_zero_iterations() {
        assert_eq!(ZigZag::new(0, 0.01, 0.001).count(), 0);
    }

    #[test]
    fn test_tightening_rounds() {
        // 0.10/0.90 .. 0.45/0.55
        assert_eq!(tightening_rounds(), 8);
        let (low, high) = tightening_bounds(7);
        assert!((low - 0.45).abs() < 1e-12);
        assert!((high - 0.55).abs() < 1e-12);
    }

    #[test]
    fn test_tightening_stays_near_bounds() {
        let mut rng = XoshiroSource::with_seed(3);
        let noise = Noise::new(0.0001, 9);
        let step = 0.015;

        let positions: Vec<f64> = TighteningZigZag::new(0.0, step, noise, &mut rng).collect();
        assert!(!positions.is_empty());

        // Never past the upper bound by more than one step
        let slack = step + noise.max();
        for p in &positions {
            assert!(*p >= 0.0 && *p < 0.90 + slack, "position {} escaped", p);
        }
    }

    #[test]
    fn test_tightening_without_noise_is_exact() {
        let mut rng = ScriptedSource::constant(1, 0.0);
        let positions: Vec<f64> = TighteningZigZag::new(0.5, 0.1, Noise::disabled(), &mut rng).collect();

        // Round 0 starts going up from 0.5 towards 0.90
        assert!((positions[0] - 0.5).abs() < 1e-12);
        assert!((positions[1] - 0.6).abs() < 1e-12);
        assert!((positions[2] - 0.7).abs() < 1e-12);
        assert!((positions[3] - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_tightening_uses_noise() {
        let mut rng = ScriptedSource::constant(9, 0.0);
        let noise = Noise::new(0.0001, 9);
        let positions: Vec<f64> = TighteningZigZag::new(0.5, 0.1, noise, &mut rng).take(2).collect();
        assert!((positions[1] - 0.6009).abs() < 1e-12);
    }

    #[test]
    fn test_tightening_terminates_from_any_start() {
        for &start in &[-0.2, 0.0, 0.5, 0.95, 1.3] {
            let mut rng = XoshiroSource::with_seed(9);
            let count = TighteningZigZag::new(start, 0.015, Noise::new(0.0001, 9), &mut rng).count();
            assert!(count > 0 && count < 10_000);
        }
    }
}
