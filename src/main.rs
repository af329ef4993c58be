//! hdmotion CLI entry point

use anyhow::{Context, Result};
use hdmotion::config::{cli::Cli, toml::build_config, validator::validate_config, Config};
use hdmotion::distribution::XoshiroSource;
use hdmotion::engine::DeviceAccessor;
use hdmotion::output::json::{write_json_summary, RunSummary};
use hdmotion::output::text::TextSink;
use hdmotion::target::block::{resolve_device_path, BlockTarget};
use hdmotion::target::{BlockDevice, MockDevice};
use hdmotion::MotionSequencer;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Initialize logging; RUST_LOG overrides -v
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    cli.validate()?;

    println!("hdmotion v{}", env!("CARGO_PKG_VERSION"));
    println!("Hard disk head motion exerciser");
    println!();

    let config = build_config(&cli)?;
    validate_config(&config).context("Invalid configuration")?;

    let path = resolve_device_path(&config.device.path.to_string_lossy());
    let target = BlockTarget::open(path.clone(), config.device.direct)
        .with_context(|| format!("Failed to open device: {}", path.display()))?;
    let geometry = target.geometry();

    let rng = match config.motion.seed {
        Some(seed) => XoshiroSource::with_seed(seed),
        None => XoshiroSource::new(),
    };
    log::info!("Using seed {}", rng.seed());

    print_configuration(&config, &path, rng.seed(), cli.dry_run);

    if cli.dry_run {
        // Geometry is all we need from the real device
        drop(target);
        println!("Dry run mode - simulating reads, the device is not touched");
        println!();
        run_motion(MockDevice::new(geometry), &config, rng, &path, true)
    } else {
        println!("Starting motion...");
        println!();
        run_motion(target, &config, rng, &path, false)
    }
}

/// Run the configured motion program on one device
fn run_motion<D: BlockDevice>(
    device: D,
    config: &Config,
    rng: XoshiroSource,
    path: &Path,
    dry_run: bool,
) -> Result<()> {
    let mut accessor = DeviceAccessor::new(device, config.device.transfer_size)?;
    let geometry = accessor.geometry();
    let transfer_size = accessor.transfer_size();
    let seed = rng.seed();

    let show_bars = !config.output.quiet && !dry_run;
    let mut sink = TextSink::stdout(config.output.bar_width, show_bars);
    let mut sequencer = MotionSequencer::new(config.motion.clone(), rng);

    let stats = sequencer.run(&mut accessor, &mut sink)?;

    if let Some(ref json_path) = config.output.json_output {
        let summary = RunSummary::new(path, geometry, transfer_size, dry_run, seed, &stats);
        write_json_summary(json_path, &summary)?;
        println!();
        println!("JSON summary written to {}", json_path.display());
    }

    if stats.total_failed() > 0 {
        log::warn!(
            "{} of {} moves failed",
            stats.total_failed(),
            stats.total_attempted()
        );
    }

    Ok(())
}

/// Print configuration summary
fn print_configuration(config: &Config, path: &Path, seed: u64, dry_run: bool) {
    println!("Configuration:");
    println!("  Device:");
    println!("    Path: {}", path.display());
    match config.device.transfer_size {
        Some(size) => println!("    Transfer size: {} bytes", size),
        None => println!("    Transfer size: sector size"),
    }
    if config.device.direct && !dry_run {
        println!("    Direct IO: yes");
    }

    println!("  Motion:");
    println!("    Phases: {}", config.motion);
    println!("    Seed: {}", seed);
    if config.motion.noise_max_multiplier == 0 {
        println!("    Noise: off");
    } else {
        println!(
            "    Noise: {} x 1..={}",
            config.motion.noise_scale, config.motion.noise_max_multiplier
        );
    }
    if config.motion.think_time_us > 0 {
        println!("    Think time: {}us", config.motion.think_time_us);
    }
    println!();
}
