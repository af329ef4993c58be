//! Configuration validation

use super::*;
use anyhow::Result;

/// Smallest accepted zig-zag step
pub const MIN_STEP: f64 = 1e-6;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_device(&config.device)?;
    validate_motion(&config.motion)?;
    validate_output(&config.output)?;

    Ok(())
}

/// Validate device configuration
pub fn validate_device(device: &DeviceConfig) -> Result<()> {
    if device.path.as_os_str().is_empty() {
        anyhow::bail!("device path must not be empty");
    }

    if let Some(size) = device.transfer_size {
        // Multiple-of-sector check needs the geometry; DeviceAccessor::new does it
        if size == 0 {
            anyhow::bail!("transfer_size must be greater than 0");
        }
    }

    Ok(())
}

/// Validate motion configuration
pub fn validate_motion(motion: &MotionConfig) -> Result<()> {
    if motion.phases.is_empty() {
        anyhow::bail!("at least one motion phase is required");
    }

    if motion.zigzag_iterations == 0 {
        anyhow::bail!("zigzag_iterations must be at least 1");
    }

    if motion.zigzag_base_step.is_nan() || motion.zigzag_base_step < MIN_STEP {
        anyhow::bail!(
            "zigzag_base_step must be at least {}, got {}",
            MIN_STEP,
            motion.zigzag_base_step
        );
    }
    if motion.zigzag_step_increment.is_nan() || motion.zigzag_step_increment < 0.0 {
        anyhow::bail!(
            "zigzag_step_increment must not be negative, got {}",
            motion.zigzag_step_increment
        );
    }
    if motion.zigzag_base_step + motion.zigzag_step_increment > 1.0 {
        anyhow::bail!("zig-zag step must not exceed the full span");
    }

    if !motion.noise_scale.is_finite() || motion.noise_scale < 0.0 {
        anyhow::bail!("noise_scale must be a finite, non-negative number");
    }

    if motion.phases.contains(&MotionPhase::MultiHead) && motion.head_repeat_budget == 0 {
        anyhow::bail!("head_repeat_budget must be greater than 0 for the multi-head phase");
    }

    Ok(())
}

/// Validate output configuration
pub fn validate_output(output: &OutputConfig) -> Result<()> {
    if output.bar_width < 2 {
        anyhow::bail!("bar_width must be at least 2, got {}", output.bar_width);
    }

    Ok(())
}
