//! Human-readable console output
//!
//! Every move prints one line: a fixed-width bar with a `#` where the head
//! is. Failed moves additionally print one error line with the position and
//! the OS error code. The summary at the end lists moves per phase.

use super::{MoveRecord, ProgressSink};
use crate::engine::clamp_position;
use crate::motion::MotionPhase;
use crate::stats::RunStats;
use crate::util::time::{format_duration, moves_per_second};
use crate::Result;
use anyhow::Context;
use std::io::{self, Write};

/// Render the position bar
///
/// `width` visible columns, marker at column `floor(position * (width - 1))`.
pub fn render_bar(position: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let mark = (clamp_position(position) * (width - 1) as f64) as usize;
    let mut bar = vec![b' '; width];
    bar[mark.min(width - 1)] = b'#';
    String::from_utf8_lossy(&bar).into_owned()
}

/// Console progress sink
pub struct TextSink<W: Write> {
    out: W,
    bar_width: usize,
    show_bars: bool,
}

impl TextSink<io::Stdout> {
    /// Sink writing to stdout
    pub fn stdout(bar_width: usize, show_bars: bool) -> Self {
        Self::new(io::stdout(), bar_width, show_bars)
    }
}

impl<W: Write> TextSink<W> {
    /// # Arguments
    ///
    /// * `out` - Destination of bars, error lines and the summary
    /// * `bar_width` - Visible width of the bar in columns
    /// * `show_bars` - Print a bar per move; error lines are printed regardless
    pub fn new(out: W, bar_width: usize, show_bars: bool) -> Self {
        Self {
            out,
            bar_width,
            show_bars,
        }
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressSink for TextSink<W> {
    fn record(&mut self, record: &MoveRecord<'_>) -> Result<()> {
        let position = match record.result {
            Ok(outcome) => outcome.position,
            Err(err) => {
                let code = err
                    .raw_os_error()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "n/a".to_string());
                writeln!(
                    self.out,
                    "{} failed in {} at position {:.3}: {} (code {})",
                    err.kind(),
                    record.phase,
                    err.position(),
                    err,
                    code
                )
                .context("failed to write progress")?;
                err.position()
            }
        };

        if self.show_bars {
            writeln!(self.out, "{}", render_bar(position, self.bar_width))
                .context("failed to write progress")?;
        }
        Ok(())
    }

    fn finish(&mut self, stats: &RunStats) -> Result<()> {
        print_summary(&mut self.out, stats).context("failed to write summary")?;
        self.out.flush().context("failed to flush output")
    }
}

/// Print the end-of-run summary
pub fn print_summary<W: Write>(out: &mut W, stats: &RunStats) -> io::Result<()> {
    let total = stats.total();

    writeln!(out)?;
    writeln!(out, "═══════════════════════════════════════════════════════════")?;
    writeln!(out, "                       RUN SUMMARY")?;
    writeln!(out, "═══════════════════════════════════════════════════════════")?;
    writeln!(out)?;
    writeln!(out, "{:<24} {:>8} {:>8} {:>8}", "Phase", "Moves", "Seek err", "Read err")?;
    for (phase, phase_stats) in stats.phases() {
        writeln!(
            out,
            "{:<24} {:>8} {:>8} {:>8}",
            phase_label(phase),
            phase_stats.attempted,
            phase_stats.position_errors,
            phase_stats.read_errors
        )?;
    }
    writeln!(
        out,
        "{:<24} {:>8} {:>8} {:>8}",
        "Total", total.attempted, total.position_errors, total.read_errors
    )?;
    writeln!(out)?;

    if total.partial_reads > 0 {
        writeln!(out, "Partial reads: {}", total.partial_reads)?;
    }
    writeln!(out, "Elapsed Time: {}", format_duration(stats.elapsed()))?;
    writeln!(
        out,
        "Move rate:    {:.1} moves/s",
        moves_per_second(total.attempted, stats.elapsed())
    )?;
    Ok(())
}

fn phase_label(phase: MotionPhase) -> String {
    format!("{}. {}", phase.ordinal() + 1, phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MoveOutcome, MoveResult};
    use crate::error::MoveError;
    use std::time::Duration;

    fn render(sink: TextSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn test_render_bar_ends() {
        let left = render_bar(0.0, 79);
        assert_eq!(left.len(), 79);
        assert!(left.starts_with('#'));

        let right = render_bar(1.0, 79);
        assert!(right.ends_with('#'));
        assert_eq!(right.matches('#').count(), 1);
    }

    #[test]
    fn test_render_bar_middle_and_clamp() {
        let mid = render_bar(0.5, 11);
        assert_eq!(mid, "     #     ");

        assert_eq!(render_bar(-2.0, 5), "#    ");
        assert_eq!(render_bar(7.0, 5), "    #");
        assert_eq!(render_bar(0.5, 0), "");
        assert_eq!(render_bar(0.5, 1), "#");
    }

    #[test]
    fn test_sink_prints_bar_per_move() {
        let mut sink = TextSink::new(Vec::new(), 5, true);
        let result: MoveResult = Ok(MoveOutcome {
            position: 1.0,
            offset: 0,
            bytes_read: 512,
        });

        sink.record(&MoveRecord {
            phase: MotionPhase::ZigZag,
            requested: 1.2,
            result: &result,
        })
        .unwrap();

        assert_eq!(render(sink), "    #\n");
    }

    #[test]
    fn test_sink_prints_error_line() {
        let mut sink = TextSink::new(Vec::new(), 5, false);
        let result: MoveResult = Err(MoveError::Read {
            position: 0.25,
            offset: 261_632,
            length: 512,
            source: io::Error::from_raw_os_error(libc::EIO),
        });

        sink.record(&MoveRecord {
            phase: MotionPhase::RandomJump,
            requested: 0.25,
            result: &result,
        })
        .unwrap();

        let text = render(sink);
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("read failed in random at position 0.250"));
        assert!(text.contains(&format!("(code {})", libc::EIO)));
    }

    #[test]
    fn test_quiet_sink_prints_nothing_on_success() {
        let mut sink = TextSink::new(Vec::new(), 79, false);
        let result: MoveResult = Ok(MoveOutcome {
            position: 0.5,
            offset: 0,
            bytes_read: 512,
        });
        sink.record(&MoveRecord {
            phase: MotionPhase::MultiHead,
            requested: 0.5,
            result: &result,
        })
        .unwrap();

        assert!(render(sink).is_empty());
    }

    #[test]
    fn test_summary_lists_phases() {
        let mut stats = RunStats::new();
        let result: MoveResult = Ok(MoveOutcome {
            position: 0.5,
            offset: 0,
            bytes_read: 512,
        });
        stats.record(MotionPhase::ZigZag, &result, 512);
        stats.record(MotionPhase::RandomJump, &result, 512);
        stats.set_elapsed(Duration::from_secs(1));

        let mut out = Vec::new();
        print_summary(&mut out, &stats).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("1. zigzag"));
        assert!(text.contains("8. random"));
        assert!(text.contains("2.0 moves/s"));
    }
}
