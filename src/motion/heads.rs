//! Multi-head sweep
//!
//! Pretends the disk has `n` heads parked at `j / (n + 1)` for `j = 1..=n`
//! and visits them in turn, repeating the round `budget / n` times so every
//! head count takes roughly the same number of moves. Head counts go
//! 2, 3, 4, 5, 6 and then back down 6, 4, 2.

use super::Noise;
use crate::distribution::RandomSource;

const MIN_HEADS: u32 = 2;
const MAX_HEADS: u32 = 6;

/// Head counts in emission order
pub fn head_schedule() -> Vec<u32> {
    let ascending = MIN_HEADS..=MAX_HEADS;
    let descending = (MIN_HEADS..=MAX_HEADS).rev().step_by(2);
    ascending.chain(descending).collect()
}

/// Noise-free position of head `j` out of `heads`
#[inline]
pub fn head_position(j: u32, heads: u32) -> f64 {
    j as f64 / (heads + 1) as f64
}

/// Multi-head sweep iterator
pub struct MultiHead<'a> {
    noise: Noise,
    rng: &'a mut dyn RandomSource,
    schedule: Vec<u32>,
    budget: usize,
    index: usize,
    repeat: usize,
    head: u32,
}

impl<'a> MultiHead<'a> {
    /// # Arguments
    ///
    /// * `budget` - Moves per head count; each count repeats `budget / heads` rounds
    pub fn new(budget: usize, noise: Noise, rng: &'a mut dyn RandomSource) -> Self {
        Self {
            noise,
            rng,
            schedule: head_schedule(),
            budget,
            index: 0,
            repeat: 0,
            head: 1,
        }
    }

    /// Total number of positions this sweep emits
    pub fn len_hint(&self) -> usize {
        self.schedule
            .iter()
            .map(|&heads| (self.budget / heads as usize) * heads as usize)
            .sum()
    }
}

impl Iterator for MultiHead<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        loop {
            let heads = *self.schedule.get(self.index)?;

            if self.repeat >= self.budget / heads as usize {
                self.index += 1;
                self.repeat = 0;
                self.head = 1;
                continue;
            }

            if self.head > heads {
                self.repeat += 1;
                self.head = 1;
                continue;
            }

            let position = head_position(self.head, heads) + self.noise.draw(&mut *self.rng);
            self.head += 1;
            return Some(position);
        }
    }
}
