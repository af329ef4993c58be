//! CLI argument parsing using clap

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// hdmotion - Exercise a disk's read head with single-sector reads
#[derive(Parser, Debug)]
#[command(name = "hdmotion")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Device path (e.g. /dev/sdb, disk.img) or disk number (0 = /dev/sda)
    ///
    /// May be omitted when the config file sets `[device] path`.
    #[arg(value_name = "DEVICE")]
    pub device: Option<String>,

    // === Motion Options ===
    /// Comma-separated phases to run, in order (default: all)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub phases: Vec<PhaseArg>,

    /// Seed for noise and random jumps (default: random, printed at start)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of full-span zig-zag sweep pairs
    #[arg(long)]
    pub zigzag_iterations: Option<usize>,

    /// Number of positions in the random phase
    #[arg(long)]
    pub random_jumps: Option<usize>,

    /// Disable the per-position noise
    #[arg(long)]
    pub no_noise: bool,

    /// Think time between moves (e.g., 100us, 1ms, 10ms)
    #[arg(long)]
    pub think_time: Option<String>,

    // === Device Options ===
    /// Bytes per read (e.g., 512, 4k); defaults to the device sector size
    #[arg(long)]
    pub transfer_size: Option<String>,

    /// Use direct IO (O_DIRECT) - bypasses page cache so every read reaches the disk
    #[arg(long)]
    pub direct: bool,

    // === Output Options ===
    /// Width of the position bar
    #[arg(long, env = "HDMOTION_BAR_WIDTH")]
    pub bar_width: Option<usize>,

    /// Do not print a bar per move (errors and summary are still printed)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Write a JSON run summary to this file
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    // === Configuration File ===
    /// TOML configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Dry run - read the geometry, then run the motion against a simulated device
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

/// Motion phase names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PhaseArg {
    /// Full-span sweeps with a growing step
    #[value(name = "zigzag")]
    ZigZag,
    /// Sweeps closing in on the middle
    #[value(name = "tightening")]
    Tightening,
    /// Sinusoid with growing amplitude
    #[value(name = "widening-sine")]
    WideningSine,
    /// Sinusoid with shrinking amplitude
    #[value(name = "narrowing-sine")]
    NarrowingSine,
    /// Sinusoid and mirror, growing
    #[value(name = "widening-double-sine")]
    WideningDoubleSine,
    /// Sinusoid and mirror, shrinking
    #[value(name = "narrowing-double-sine")]
    NarrowingDoubleSine,
    /// Evenly spaced heads visited in turn
    #[value(name = "multi-head")]
    MultiHead,
    /// Uniform random jumps
    #[value(name = "random")]
    Random,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        match self.device {
            Some(ref device) if device.trim().is_empty() => {
                anyhow::bail!("device must not be empty");
            }
            None if self.config.is_none() => {
                anyhow::bail!("a device is required (positional argument or [device] path in --config)");
            }
            _ => {}
        }

        if let Some(width) = self.bar_width {
            if width < 2 {
                anyhow::bail!("bar_width must be at least 2, got {}", width);
            }
        }

        if let Some(0) = self.zigzag_iterations {
            anyhow::bail!("zigzag_iterations must be at least 1");
        }

        if self.dry_run && self.direct {
            log::warn!("--direct has no effect with --dry-run");
        }

        Ok(())
    }

    /// Log level selected by `-v`
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["hdmotion", "/dev/sdb"]).unwrap();
        assert_eq!(cli.device.as_deref(), Some("/dev/sdb"));
        assert!(cli.phases.is_empty());
        assert!(!cli.quiet);
        assert_eq!(cli.log_level(), log::LevelFilter::Warn);
        cli.validate().unwrap();
    }

    #[test]
    fn test_parse_phases_list() {
        let cli = Cli::try_parse_from([
            "hdmotion",
            "--phases",
            "zigzag,multi-head,random",
            "disk.img",
        ])
        .unwrap();
        assert_eq!(
            cli.phases,
            vec![PhaseArg::ZigZag, PhaseArg::MultiHead, PhaseArg::Random]
        );
    }

    #[test]
    fn test_unknown_phase_rejected() {
        assert!(Cli::try_parse_from(["hdmotion", "--phases", "spiral", "disk.img"]).is_err());
    }

    #[test]
    fn test_missing_device_rejected() {
        let cli = Cli::try_parse_from(["hdmotion"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_device_may_come_from_config_file() {
        let cli = Cli::try_parse_from(["hdmotion", "--config", "hdmotion.toml"]).unwrap();
        assert!(cli.device.is_none());
        cli.validate().unwrap();
    }

    #[test]
    fn test_verbosity() {
        let cli = Cli::try_parse_from(["hdmotion", "-vv", "0"]).unwrap();
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_validate_bar_width() {
        let cli = Cli::try_parse_from(["hdmotion", "--bar-width", "1", "disk.img"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_validate_zigzag_iterations() {
        let cli =
            Cli::try_parse_from(["hdmotion", "--zigzag-iterations", "0", "disk.img"]).unwrap();
        assert!(cli.validate().is_err());
    }
}
