//! Run statistics
//!
//! Counts attempted and failed moves per phase. Failures are split by the
//! step that failed (seek or read) so the summary can tell a bad offset
//! apart from a bad sector.

use crate::engine::MoveResult;
use crate::error::MoveError;
use crate::motion::MotionPhase;
use std::time::Duration;

/// Counters for one phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseStats {
    /// Moves attempted
    pub attempted: u64,
    /// Moves whose seek and read both succeeded
    pub succeeded: u64,
    /// Moves that failed to seek
    pub position_errors: u64,
    /// Moves that failed to read
    pub read_errors: u64,
    /// Successful reads that returned less than the transfer size
    pub partial_reads: u64,
    /// Bytes read in total
    pub bytes_read: u64,
}

impl PhaseStats {
    pub fn failed(&self) -> u64 {
        self.position_errors + self.read_errors
    }

    fn merge(&mut self, other: &PhaseStats) {
        self.attempted += other.attempted;
        self.succeeded += other.succeeded;
        self.position_errors += other.position_errors;
        self.read_errors += other.read_errors;
        self.partial_reads += other.partial_reads;
        self.bytes_read += other.bytes_read;
    }
}

/// Statistics for a whole run, phases in execution order
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    phases: Vec<(MotionPhase, PhaseStats)>,
    elapsed: Duration,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a phase as run, so it is reported even if it makes no moves
    pub fn begin_phase(&mut self, phase: MotionPhase) {
        self.entry(phase);
    }

    /// Record the outcome of one move
    ///
    /// `transfer_size` is the requested read length, used to spot partial reads.
    pub fn record(&mut self, phase: MotionPhase, result: &MoveResult, transfer_size: usize) {
        let stats = self.entry(phase);
        stats.attempted += 1;

        match result {
            Ok(outcome) => {
                stats.succeeded += 1;
                stats.bytes_read += outcome.bytes_read as u64;
                if outcome.bytes_read < transfer_size {
                    stats.partial_reads += 1;
                }
            }
            Err(MoveError::Position { .. }) => stats.position_errors += 1,
            Err(MoveError::Read { .. }) => stats.read_errors += 1,
        }
    }

    fn entry(&mut self, phase: MotionPhase) -> &mut PhaseStats {
        let index = match self.phases.iter().position(|(p, _)| *p == phase) {
            Some(index) => index,
            None => {
                self.phases.push((phase, PhaseStats::default()));
                self.phases.len() - 1
            }
        };
        &mut self.phases[index].1
    }

    /// Counters for one phase, if it ran
    pub fn phase(&self, phase: MotionPhase) -> Option<&PhaseStats> {
        self.phases.iter().find(|(p, _)| *p == phase).map(|(_, s)| s)
    }

    /// Phases in the order they ran
    pub fn phases(&self) -> impl Iterator<Item = (MotionPhase, &PhaseStats)> {
        self.phases.iter().map(|(p, s)| (*p, s))
    }

    /// Counters summed over all phases
    pub fn total(&self) -> PhaseStats {
        let mut total = PhaseStats::default();
        for (_, stats) in &self.phases {
            total.merge(stats);
        }
        total
    }

    pub fn total_attempted(&self) -> u64 {
        self.total().attempted
    }

    pub fn total_failed(&self) -> u64 {
        self.total().failed()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }
}
