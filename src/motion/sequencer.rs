//! Motion sequencer
//!
//! Runs the configured phases in order against one device. Every position is
//! handed to the accessor immediately; the outcome is counted and passed to
//! the progress sink. Device errors never stop the run, so the number of
//! attempted moves depends only on the configuration and the random source.

use super::phase_positions;
use crate::config::MotionConfig;
use crate::distribution::RandomSource;
use crate::engine::DeviceAccessor;
use crate::output::{MoveRecord, ProgressSink};
use crate::stats::RunStats;
use crate::target::BlockDevice;
use crate::util::time::think;
use crate::Result;
use std::time::{Duration, Instant};

pub struct MotionSequencer<R: RandomSource> {
    config: MotionConfig,
    rng: R,
}

impl<R: RandomSource> MotionSequencer<R> {
    pub fn new(config: MotionConfig, rng: R) -> Self {
        Self { config, rng }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Run every configured phase
    ///
    /// Returns the statistics of the run. Only sink errors abort it.
    pub fn run<D, S>(&mut self, accessor: &mut DeviceAccessor<D>, sink: &mut S) -> Result<RunStats>
    where
        D: BlockDevice,
        S: ProgressSink + ?Sized,
    {
        let think_time = Duration::from_micros(self.config.think_time_us);
        let transfer_size = accessor.transfer_size();
        let mut stats = RunStats::new();
        // Last requested position; the tightening phase starts from it
        let mut cursor = 0.0;
        let start = Instant::now();

        let phases = self.config.phases.clone();
        for phase in phases {
            log::info!("Starting phase {}", phase);
            stats.begin_phase(phase);
            sink.phase_started(phase)?;

            let phase_start = Instant::now();
            let mut moves = 0u64;
            for requested in phase_positions(phase, &self.config, cursor, &mut self.rng) {
                let result = accessor.move_to(requested);
                stats.record(phase, &result, transfer_size);

                if let Err(ref err) = result {
                    log::debug!("{} move failed: {}", phase, err);
                }

                sink.record(&MoveRecord {
                    phase,
                    requested,
                    result: &result,
                })?;

                cursor = requested;
                moves += 1;
                think(think_time);
            }

            log::info!(
                "Finished phase {}: {} moves in {:?}",
                phase,
                moves,
                phase_start.elapsed()
            );
        }

        stats.set_elapsed(start.elapsed());
        log::info!(
            "Run complete: {} moves, {} failed",
            stats.total_attempted(),
            stats.total_failed()
        );

        sink.finish(&stats)?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{ScriptedSource, XoshiroSource};
    use crate::motion::MotionPhase;
    use crate::target::{Geometry, MockDevice};

    /// Sink that keeps every record
    #[derive(Default)]
    struct RecordingSink {
        phases: Vec<MotionPhase>,
        moves: Vec<(MotionPhase, f64, bool)>,
        finished: bool,
    }

    impl ProgressSink for RecordingSink {
        fn phase_started(&mut self, phase: MotionPhase) -> Result<()> {
            self.phases.push(phase);
            Ok(())
        }

        fn record(&mut self, record: &MoveRecord<'_>) -> Result<()> {
            self.moves
                .push((record.phase, record.requested, record.result.is_ok()));
            Ok(())
        }

        fn finish(&mut self, _stats: &RunStats) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    struct FailingSink;

    impl ProgressSink for FailingSink {
        fn record(&mut self, _record: &MoveRecord<'_>) -> Result<()> {
            anyhow::bail!("stdout closed")
        }
    }

    fn mock() -> MockDevice {
        MockDevice::new(Geometry::new(1_048_576, 512))
    }

    fn run_with(device: MockDevice, config: MotionConfig, seed: u64) -> (RunStats, RecordingSink) {
        let mut accessor = DeviceAccessor::new(device, None).unwrap();
        let mut sequencer = MotionSequencer::new(config, XoshiroSource::with_seed(seed));
        let mut sink = RecordingSink::default();
        let stats = sequencer.run(&mut accessor, &mut sink).unwrap();
        (stats, sink)
    }

    #[test]
    fn test_full_program_runs_every_phase() {
        let (stats, sink) = run_with(mock(), MotionConfig::default(), 1);

        assert_eq!(sink.phases, MotionPhase::ALL.to_vec());
        assert!(sink.finished);
        assert_eq!(stats.total_failed(), 0);
        assert_eq!(stats.total_attempted() as usize, sink.moves.len());
        assert_eq!(stats.phase(MotionPhase::RandomJump).unwrap().attempted, 600);
        assert_eq!(stats.phase(MotionPhase::MultiHead).unwrap().attempted, 1271);
    }

    #[test]
    fn test_attempts_invariant_under_failures() {
        let (clean, _) = run_with(mock(), MotionConfig::default(), 7);

        let failing = mock();
        failing.set_fail_all_reads(true);
        let (failed, sink) = run_with(failing, MotionConfig::default(), 7);

        assert_eq!(clean.total_attempted(), failed.total_attempted());
        assert_eq!(failed.total_failed(), failed.total_attempted());
        assert_eq!(failed.total().read_errors, failed.total_attempted());
        assert!(sink.moves.iter().all(|(_, _, ok)| !ok));
        for phase in MotionPhase::ALL {
            assert_eq!(
                clean.phase(phase).unwrap().attempted,
                failed.phase(phase).unwrap().attempted
            );
        }
    }

    #[test]
    fn test_single_read_failure_does_not_stop_run() {
        let device = mock();
        device.fail_read_on(3);
        let mut config = MotionConfig::default();
        config.phases = vec![MotionPhase::ZigZag];

        let (stats, sink) = run_with(device, config, 0);
        let zigzag = stats.phase(MotionPhase::ZigZag).unwrap();

        assert_eq!(zigzag.read_errors, 1);
        assert_eq!(zigzag.succeeded + 1, zigzag.attempted);
        assert!(!sink.moves[3].2);
        assert!(sink.moves[4].2);
    }

    #[test]
    fn test_phase_subset_in_given_order() {
        let mut config = MotionConfig::default();
        config.phases = vec![MotionPhase::RandomJump, MotionPhase::ZigZag];

        let (stats, sink) = run_with(mock(), config, 3);
        let order: Vec<MotionPhase> = stats.phases().map(|(p, _)| p).collect();

        assert_eq!(order, vec![MotionPhase::RandomJump, MotionPhase::ZigZag]);
        assert_eq!(sink.phases, order);
        assert_eq!(sink.moves[0].0, MotionPhase::RandomJump);
    }

    #[test]
    fn test_offsets_aligned_and_in_range() {
        let device = mock();
        let (_, _) = run_with(device.clone(), MotionConfig::default(), 11);

        let offsets = device.read_offsets();
        assert!(!offsets.is_empty());
        for offset in offsets {
            assert_eq!(offset % 512, 0);
            assert!(offset <= 1_048_576 - 512);
        }
    }

    #[test]
    fn test_same_seed_same_motion() {
        let (_, a) = run_with(mock(), MotionConfig::default(), 42);
        let (_, b) = run_with(mock(), MotionConfig::default(), 42);
        assert_eq!(a.moves, b.moves);
    }

    #[test]
    fn test_tightening_starts_from_cursor() {
        let mut config = MotionConfig::default().without_noise();
        config.phases = vec![MotionPhase::RandomJump, MotionPhase::TighteningZigZag];
        config.random_jumps = 1;

        let device = mock();
        let mut accessor = DeviceAccessor::new(device, None).unwrap();
        let mut sequencer =
            MotionSequencer::new(config, ScriptedSource::new(vec![], vec![0.3]));
        let mut sink = RecordingSink::default();
        sequencer.run(&mut accessor, &mut sink).unwrap();

        assert_eq!(sink.moves[0], (MotionPhase::RandomJump, 0.3, true));
        assert_eq!(sink.moves[1].0, MotionPhase::TighteningZigZag);
        assert!((sink.moves[1].1 - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_sink_error_aborts() {
        let mut accessor = DeviceAccessor::new(mock(), None).unwrap();
        let mut sequencer =
            MotionSequencer::new(MotionConfig::default(), XoshiroSource::with_seed(5));
        assert!(sequencer.run(&mut accessor, &mut FailingSink).is_err());
    }

    #[test]
    fn test_phase_without_moves_still_reported() {
        let mut config = MotionConfig::default();
        config.phases = vec![MotionPhase::RandomJump, MotionPhase::MultiHead];
        config.random_jumps = 0;

        let (stats, sink) = run_with(mock(), config, 4);
        let order: Vec<MotionPhase> = stats.phases().map(|(p, _)| p).collect();

        assert_eq!(order, vec![MotionPhase::RandomJump, MotionPhase::MultiHead]);
        assert_eq!(stats.phase(MotionPhase::RandomJump).unwrap().attempted, 0);
        assert!(sink.moves.iter().all(|(p, _, _)| *p == MotionPhase::MultiHead));
    }
}
