//! PNG capture of presented frames.

use std::path::PathBuf;

use log::{debug, info};

use super::present::SoftwareTarget;
use crate::error::OutputError;
use crate::params::RecordingConfig;

/// Saves every `capture_every`-th presented frame as `frame_NNNNN.png`
#[derive(Debug)]
pub struct FrameRecorder {
    config: RecordingConfig,
    saved: u64,
}

impl FrameRecorder {
    /// Create the output directories for a recording session
    pub fn new(config: RecordingConfig) -> Result<Self, OutputError> {
        std::fs::create_dir_all(config.frames_dir())?;
        info!("Recording frames to {}", config.frames_dir().display());
        Ok(Self { config, saved: 0 })
    }

    pub fn config(&self) -> &RecordingConfig {
        &self.config
    }

    /// Frames written so far
    pub fn saved(&self) -> u64 {
        self.saved
    }

    /// Save the target if `tick` falls on the capture stride.
    ///
    /// Returns the written path, or `None` when the tick is skipped or the
    /// target has no pixels.
    pub fn capture(
        &mut self,
        tick: u64,
        target: &SoftwareTarget,
    ) -> Result<Option<PathBuf>, OutputError> {
        if !self.config.captures(tick) || target.presents() == 0 {
            return Ok(None);
        }
        let path = self
            .config
            .frames_dir()
            .join(format!("frame_{:05}.png", self.saved));
        target.save_png(&path)?;
        self.saved += 1;
        debug!("Captured tick {} to {}", tick, path.display());
        Ok(Some(path))
    }
}
