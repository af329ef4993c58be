//! Random jumps: positions drawn uniformly from [0.0, 1.0], no noise

use crate::distribution::RandomSource;

pub struct RandomJump<'a> {
    rng: &'a mut dyn RandomSource,
    remaining: usize,
}

impl<'a> RandomJump<'a> {
    pub fn new(count: usize, rng: &'a mut dyn RandomSource) -> Self {
        Self { rng, remaining: count }
    }
}

impl Iterator for RandomJump<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.rng.next_unit())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{ScriptedSource, XoshiroSource};

    #[test]
    fn test_random_jump_count_and_range() {
        let mut rng = XoshiroSource::with_seed(600);
        let positions: Vec<f64> = RandomJump::new(600, &mut rng).collect();

        assert_eq!(positions.len(), 600);
        assert!(positions.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_random_jump_replays_source() {
        let mut rng = ScriptedSource::new(vec![], vec![0.1, 0.9]);
        let positions: Vec<f64> = RandomJump::new(3, &mut rng).collect();
        assert_eq!(positions, vec![0.1, 0.9, 0.1]);
    }

    #[test]
    fn test_random_jump_size_hint() {
        let mut rng = ScriptedSource::constant(1, 0.5);
        let mut jumps = RandomJump::new(2, &mut rng);
        assert_eq!(jumps.size_hint(), (2, Some(2)));
        jumps.next();
        assert_eq!(jumps.size_hint(), (1, Some(1)));
    }
}
