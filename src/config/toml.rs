//! TOML configuration file parsing

use super::*;
use crate::config::cli::Cli;
use crate::config::cli_convert::{convert_phases, parse_size, parse_time_us};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config =
        ::toml::from_str(contents).context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
///
/// Only options actually given on the command line override the file.
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    if let Some(ref device) = cli.device {
        config.device.path = PathBuf::from(device.trim());
    }

    if cli.direct {
        config.device.direct = true;
    }
    if let Some(ref size) = cli.transfer_size {
        config.device.transfer_size = Some(
            parse_size(size).with_context(|| format!("Invalid --transfer-size: {}", size))?,
        );
    }

    if !cli.phases.is_empty() {
        config.motion.phases = convert_phases(&cli.phases);
    }
    if let Some(seed) = cli.seed {
        config.motion.seed = Some(seed);
    }
    if let Some(iterations) = cli.zigzag_iterations {
        config.motion.zigzag_iterations = iterations;
    }
    if let Some(jumps) = cli.random_jumps {
        config.motion.random_jumps = jumps;
    }
    if cli.no_noise {
        config.motion.noise_max_multiplier = 0;
    }
    if let Some(ref think) = cli.think_time {
        config.motion.think_time_us =
            parse_time_us(think).with_context(|| format!("Invalid --think-time: {}", think))?;
    }

    if let Some(width) = cli.bar_width {
        config.output.bar_width = width;
    }
    if cli.quiet {
        config.output.quiet = true;
    }
    if let Some(ref path) = cli.json_output {
        config.output.json_output = Some(path.clone());
    }

    Ok(config)
}

/// Build the run configuration: the file named by `--config` (or defaults),
/// overridden by the command line
pub fn build_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => Config::default(),
    };
    merge_cli_with_config(cli, base)
}
