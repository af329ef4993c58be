//! JSON run summary
//!
//! Written once after the run when `--json-output` is given. Contains the
//! device, its geometry, the seed (so the exact motion can be replayed) and
//! per-phase counters.

use crate::motion::MotionPhase;
use crate::stats::{PhaseStats, RunStats};
use crate::target::Geometry;
use crate::util::time::moves_per_second;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Counters of one phase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonPhase {
    pub phase: String,
    pub attempted: u64,
    pub succeeded: u64,
    pub position_errors: u64,
    pub read_errors: u64,
    pub partial_reads: u64,
    pub bytes_read: u64,
}

impl JsonPhase {
    fn new(name: &str, stats: &PhaseStats) -> Self {
        Self {
            phase: name.to_string(),
            attempted: stats.attempted,
            succeeded: stats.succeeded,
            position_errors: stats.position_errors,
            read_errors: stats.read_errors,
            partial_reads: stats.partial_reads,
            bytes_read: stats.bytes_read,
        }
    }
}

/// Device description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonDevice {
    pub path: String,
    pub size_bytes: u64,
    pub block_size: u64,
    pub transfer_size: usize,
    pub dry_run: bool,
}

/// Whole-run summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    pub version: String,
    pub device: JsonDevice,
    pub seed: u64,
    pub phases: Vec<JsonPhase>,
    pub total: JsonPhase,
    pub elapsed_secs: f64,
    pub moves_per_sec: f64,
}

impl RunSummary {
    pub fn new(
        device_path: &Path,
        geometry: Geometry,
        transfer_size: usize,
        dry_run: bool,
        seed: u64,
        stats: &RunStats,
    ) -> Self {
        let phases = stats
            .phases()
            .map(|(phase, s): (MotionPhase, &PhaseStats)| JsonPhase::new(phase.name(), s))
            .collect();
        let total = stats.total();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            device: JsonDevice {
                path: device_path.display().to_string(),
                size_bytes: geometry.size_bytes,
                block_size: geometry.block_size,
                transfer_size,
                dry_run,
            },
            seed,
            phases,
            total: JsonPhase::new("total", &total),
            elapsed_secs: stats.elapsed().as_secs_f64(),
            moves_per_sec: moves_per_second(total.attempted, stats.elapsed()),
        }
    }
}

/// Write the summary as pretty-printed JSON
pub fn write_json_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON output file: {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)
        .with_context(|| format!("Failed to write JSON output: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush JSON output: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MoveOutcome, MoveResult};
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample_stats() -> RunStats {
        let mut stats = RunStats::new();
        let ok: MoveResult = Ok(MoveOutcome {
            position: 0.5,
            offset: 0,
            bytes_read: 512,
        });
        stats.record(MotionPhase::ZigZag, &ok, 512);
        stats.record(MotionPhase::ZigZag, &ok, 512);
        stats.record(MotionPhase::RandomJump, &ok, 512);
        stats.set_elapsed(Duration::from_millis(1500));
        stats
    }

    #[test]
    fn test_summary_contents() {
        let stats = sample_stats();
        let summary = RunSummary::new(
            &PathBuf::from("/dev/sdz"),
            Geometry::new(1_048_576, 512),
            512,
            true,
            42,
            &stats,
        );

        assert_eq!(summary.device.path, "/dev/sdz");
        assert!(summary.device.dry_run);
        assert_eq!(summary.seed, 42);
        assert_eq!(summary.phases.len(), 2);
        assert_eq!(summary.phases[0].phase, "zigzag");
        assert_eq!(summary.phases[0].attempted, 2);
        assert_eq!(summary.total.attempted, 3);
        assert_eq!(summary.total.bytes_read, 1536);
        assert!((summary.moves_per_sec - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.json");
        let summary = RunSummary::new(
            &PathBuf::from("disk.img"),
            Geometry::new(65_536, 512),
            512,
            false,
            7,
            &sample_stats(),
        );

        write_json_summary(&path, &summary).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: RunSummary = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, summary);

        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["device"]["block_size"], 512);
        assert_eq!(value["phases"][1]["phase"], "random");
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let summary = RunSummary::new(
            &PathBuf::from("disk.img"),
            Geometry::new(65_536, 512),
            512,
            false,
            7,
            &RunStats::new(),
        );
        assert!(write_json_summary(Path::new("/nonexistent/dir/summary.json"), &summary).is_err());
    }
}
