//! Applying the control value to the system output volume.
//!
//! The overlay works without any of this; a sink is only consulted when
//! volume output is enabled.

use crate::{utils::safe_cast::f64_to_i32_clamp, Error, Result};
use log::{debug, info};
use std::process::Command;

/// Receives the control value every frame it changes
pub trait VolumeSink {
    /// Apply a volume percentage in `[0, 100]`
    ///
    /// # Errors
    ///
    /// Returns [`Error::VolumeControl`] if the volume could not be set.
    fn apply(&mut self, percent: f64) -> Result<()>;

    /// Sink name for logging
    fn name(&self) -> &str;
}

/// Leaves the system volume alone
#[derive(Debug, Default, Clone, Copy)]
pub struct NullVolume;

impl VolumeSink for NullVolume {
    fn apply(&mut self, _percent: f64) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Sets the default `PulseAudio`/`PipeWire` sink volume through `pactl`
///
/// Only whole-percent changes are sent, so a steady hand does not spawn a
/// process per frame.
#[derive(Debug, Clone)]
pub struct PactlVolume {
    program: String,
    last_applied: Option<i32>,
}

impl PactlVolume {
    #[must_use]
    pub fn new() -> Self {
        Self::with_program("pactl")
    }

    /// Use a different `pactl` binary
    #[must_use]
    pub fn with_program(program: &str) -> Self {
        info!("Volume output through {program}");
        Self {
            program: program.to_string(),
            last_applied: None,
        }
    }

    #[must_use]
    pub const fn last_applied(&self) -> Option<i32> {
        self.last_applied
    }
}

impl Default for PactlVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl VolumeSink for PactlVolume {
    fn apply(&mut self, percent: f64) -> Result<()> {
        let level = f64_to_i32_clamp(percent, 0, 100);
        if self.last_applied == Some(level) {
            return Ok(());
        }

        debug!("Setting output volume to {level}%");
        let status = Command::new(&self.program)
            .args(["set-sink-volume", "@DEFAULT_SINK@", &format!("{level}%")])
            .status()
            .map_err(|e| Error::VolumeControl(format!("Failed to run {}: {e}", self.program)))?;

        if !status.success() {
            return Err(Error::VolumeControl(format!("{} exited with {status}", self.program)));
        }

        self.last_applied = Some(level);
        Ok(())
    }

    fn name(&self) -> &str {
        "pactl"
    }
}

/// Create a volume sink by name (`none` or `pactl`)
///
/// # Errors
///
/// Returns [`Error::ConfigError`] for an unknown sink name.
pub fn create_volume_sink(name: &str) -> Result<Box<dyn VolumeSink>> {
    match name.trim().to_lowercase().as_str() {
        "none" | "" => Ok(Box::new(NullVolume)),
        "pactl" => Ok(Box::new(PactlVolume::new())),
        other => Err(Error::ConfigError(format!("Unknown volume output: {other}"))),
    }
}
