//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.
//!
//! A TOML file mirrors [`Config`]; every field is optional. A positional
//! device on the command line replaces `device.path`:
//!
//! ```toml
//! [device]
//! path = "/dev/sdb"
//! direct = true
//! transfer_size = 4096
//!
//! [motion]
//! phases = ["zigzag", "tightening", "random"]
//! seed = 42
//! random_jumps = 1000
//!
//! [output]
//! bar_width = 100
//! ```

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::motion::MotionPhase;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Device selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Device path, or a bare disk number
    #[serde(default)]
    pub path: PathBuf,
    /// Open with O_DIRECT
    #[serde(default)]
    pub direct: bool,
    /// Bytes per read; the device block size when unset
    #[serde(default)]
    pub transfer_size: Option<u64>,
}

/// Motion program parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Phases to run, in order
    #[serde(default = "default_phases")]
    pub phases: Vec<MotionPhase>,
    /// Seed for noise and random jumps; drawn from entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,
    /// Noise unit
    #[serde(default = "default_noise_scale")]
    pub noise_scale: f64,
    /// Noise is `noise_scale * U{1..=noise_max_multiplier}`; 0 disables it
    #[serde(default = "default_noise_max_multiplier")]
    pub noise_max_multiplier: u32,
    /// Full-span zig-zag sweep pairs
    #[serde(default = "default_zigzag_iterations")]
    pub zigzag_iterations: usize,
    /// Step of the first zig-zag iteration, before the increment
    #[serde(default = "default_zigzag_base_step")]
    pub zigzag_base_step: f64,
    /// Step growth per zig-zag iteration
    #[serde(default = "default_zigzag_step_increment")]
    pub zigzag_step_increment: f64,
    /// Visits per head-count round, divided by the head count
    #[serde(default = "default_head_repeat_budget")]
    pub head_repeat_budget: usize,
    /// Positions in the random phase
    #[serde(default = "default_random_jumps")]
    pub random_jumps: usize,
    /// Pause between moves in microseconds
    #[serde(default)]
    pub think_time_us: u64,
}

fn default_phases() -> Vec<MotionPhase> {
    MotionPhase::ALL.to_vec()
}

fn default_noise_scale() -> f64 {
    0.0001
}

fn default_noise_max_multiplier() -> u32 {
    9
}

fn default_zigzag_iterations() -> usize {
    5
}

fn default_zigzag_base_step() -> f64 {
    0.01
}

fn default_zigzag_step_increment() -> f64 {
    0.001
}

fn default_head_repeat_budget() -> usize {
    160
}

fn default_random_jumps() -> usize {
    600
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            phases: default_phases(),
            seed: None,
            noise_scale: default_noise_scale(),
            noise_max_multiplier: default_noise_max_multiplier(),
            zigzag_iterations: default_zigzag_iterations(),
            zigzag_base_step: default_zigzag_base_step(),
            zigzag_step_increment: default_zigzag_step_increment(),
            head_repeat_budget: default_head_repeat_budget(),
            random_jumps: default_random_jumps(),
            think_time_us: 0,
        }
    }
}

impl MotionConfig {
    /// Same program without noise
    pub fn without_noise(mut self) -> Self {
        self.noise_max_multiplier = 0;
        self
    }
}

/// Console and file output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Width of the position bar in columns
    #[serde(default = "default_bar_width")]
    pub bar_width: usize,
    /// Suppress bar lines
    #[serde(default)]
    pub quiet: bool,
    /// Write a JSON summary here after the run
    #[serde(default)]
    pub json_output: Option<PathBuf>,
}

fn default_bar_width() -> usize {
    79
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
            quiet: false,
            json_output: None,
        }
    }
}

impl fmt::Display for MotionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.phases.iter().map(|p| p.name()).collect();
        write!(f, "{}", names.join(", "))
    }
}
