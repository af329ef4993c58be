//! hdmotion - Hard disk head motion exerciser
//!
//! hdmotion moves a disk's read head in deliberate patterns by issuing single
//! sector-sized reads at computed offsets. Positions are normalized: 0.0 is
//! the first sector, 1.0 the last one a full transfer fits before.
//!
//! # Architecture
//!
//! - **Targets**: raw block devices or image files behind the [`target::BlockDevice`] trait,
//!   plus a mock device for tests and dry runs
//! - **Accessor**: position to aligned offset translation, one seek and one read per move
//! - **Motion**: zig-zags, sinusoids, multi-head sweeps and random jumps as lazy iterators
//! - **Output**: position bar per move, summary table, optional JSON summary

pub mod config;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod motion;
pub mod output;
pub mod stats;
pub mod target;
pub mod util;

// Re-export commonly used types
pub use config::Config;
pub use engine::DeviceAccessor;
pub use error::{MoveError, OpenError};
pub use motion::{MotionPhase, MotionSequencer};

/// Result type used throughout hdmotion
pub type Result<T> = anyhow::Result<T>;
