//! CLI to Config conversion utilities

use crate::config::cli;
use crate::motion::MotionPhase;
use anyhow::{Context, Result};

/// Parse a size string (e.g., "512", "4k", "1M") to bytes
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if s.ends_with("k") || s.ends_with("kb") {
        (s.trim_end_matches("kb").trim_end_matches("k"), 1024u64)
    } else if s.ends_with("m") || s.ends_with("mb") {
        (s.trim_end_matches("mb").trim_end_matches("m"), 1024 * 1024)
    } else if s.ends_with("g") || s.ends_with("gb") {
        (s.trim_end_matches("gb").trim_end_matches("g"), 1024 * 1024 * 1024)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .parse()
        .with_context(|| format!("Invalid size format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Size out of range: {}", s))
}

/// Parse a time string (e.g., "100us", "1ms", "2s") to microseconds
///
/// A bare number is taken as microseconds.
pub fn parse_time_us(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if s.ends_with("us") {
        (s.trim_end_matches("us"), 1u64)
    } else if s.ends_with("ms") {
        (s.trim_end_matches("ms"), 1000)
    } else if s.ends_with("s") {
        (s.trim_end_matches("s"), 1_000_000)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .parse()
        .with_context(|| format!("Invalid time format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Time out of range: {}", s))
}

/// Convert a CLI phase name to a motion phase
pub fn convert_phase(arg: cli::PhaseArg) -> MotionPhase {
    match arg {
        cli::PhaseArg::ZigZag => MotionPhase::ZigZag,
        cli::PhaseArg::Tightening => MotionPhase::TighteningZigZag,
        cli::PhaseArg::WideningSine => MotionPhase::WideningSinusoid,
        cli::PhaseArg::NarrowingSine => MotionPhase::NarrowingSinusoid,
        cli::PhaseArg::WideningDoubleSine => MotionPhase::WideningDoubleSinusoid,
        cli::PhaseArg::NarrowingDoubleSine => MotionPhase::NarrowingDoubleSinusoid,
        cli::PhaseArg::MultiHead => MotionPhase::MultiHead,
        cli::PhaseArg::Random => MotionPhase::RandomJump,
    }
}

/// Convert a list of CLI phase names, keeping their order
pub fn convert_phases(args: &[cli::PhaseArg]) -> Vec<MotionPhase> {
    args.iter().copied().map(convert_phase).collect()
}
