//! Progress reporting
//!
//! The sequencer reports every move to a [`ProgressSink`]. The console
//! implementation draws a position bar per move (see [`text`]); the JSON
//! module writes a run summary once the run is over (see [`json`]).

use crate::engine::MoveResult;
use crate::motion::MotionPhase;
use crate::stats::RunStats;
use crate::Result;

pub mod json;
pub mod text;

/// One move as seen by a sink
#[derive(Debug)]
pub struct MoveRecord<'r> {
    pub phase: MotionPhase,
    /// Position as generated, before clamping
    pub requested: f64,
    pub result: &'r MoveResult,
}

/// Receiver of per-move progress
///
/// Errors returned by a sink (e.g. a closed stdout) abort the run; device
/// errors never do, they arrive here as part of the record.
pub trait ProgressSink {
    /// Called before the first move of each phase
    fn phase_started(&mut self, _phase: MotionPhase) -> Result<()> {
        Ok(())
    }

    /// Called after every move
    fn record(&mut self, record: &MoveRecord<'_>) -> Result<()>;

    /// Called once after the last move
    fn finish(&mut self, _stats: &RunStats) -> Result<()> {
        Ok(())
    }
}
