//! Host loop and recording configuration.

use std::path::PathBuf;

/// Headless host loop configuration
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// Display width the surface is stretched to (pixels)
    pub window_width: u32,

    /// Display height the surface is stretched to (pixels)
    pub window_height: u32,

    /// Tick rate (ticks per second); the simulated consumer advances
    /// `sample_rate / fps` frames per tick
    pub fps: u32,

    /// Number of ticks to run
    pub ticks: u64,

    /// Emit a resize every N ticks (0 = never)
    pub resize_every: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fps: 30,
            ticks: 90,
            resize_every: 0,
        }
    }
}

impl HostConfig {
    /// Audio frames consumed per tick at the given sample rate
    pub fn frames_per_tick(&self, sample_rate_hz: u32) -> usize {
        (sample_rate_hz / self.fps.max(1)) as usize
    }

    /// Window size the host switches to at `tick`, alternating between half
    /// and full size every `resize_every` ticks
    pub fn resize_at(&self, tick: u64) -> Option<(u32, u32)> {
        if self.resize_every == 0 || tick == 0 || tick % self.resize_every != 0 {
            return None;
        }
        if (tick / self.resize_every) % 2 == 1 {
            Some(((self.window_width / 2).max(1), (self.window_height / 2).max(1)))
        } else {
            Some((self.window_width, self.window_height))
        }
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Output directory for frames and audio
    pub output_dir: PathBuf,

    /// Save every Nth presented frame (1 = every frame)
    pub capture_every: u64,
}

impl RecordingConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            capture_every: 30,
        }
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join("frames")
    }

    /// Audio file path
    pub fn audio_path(&self) -> PathBuf {
        self.output_dir.join("audio.wav")
    }

    /// Whether the given tick's frame is captured
    pub fn captures(&self, tick: u64) -> bool {
        tick % self.capture_every.max(1) == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_per_tick() {
        let host = HostConfig::default();
        assert_eq!(host.frames_per_tick(48_000), 1600);
    }

    #[test]
    fn test_resize_schedule_alternates() {
        let host = HostConfig {
            resize_every: 10,
            ..HostConfig::default()
        };
        assert_eq!(host.resize_at(0), None);
        assert_eq!(host.resize_at(5), None);
        assert_eq!(host.resize_at(10), Some((640, 360)));
        assert_eq!(host.resize_at(20), Some((1280, 720)));
        assert_eq!(HostConfig::default().resize_at(10), None);
    }

    #[test]
    fn test_recording_paths() {
        let config = RecordingConfig::new("out");
        assert_eq!(config.frames_dir(), PathBuf::from("out/frames"));
        assert_eq!(config.audio_path(), PathBuf::from("out/audio.wav"));
    }

    #[test]
    fn test_capture_stride_zero_means_every_frame() {
        let mut config = RecordingConfig::new("out");
        config.capture_every = 0;
        assert!(config.captures(7));
    }
}
