//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::{
    AudioFormat, HostConfig, RecordingConfig, ReleaseOrder, RingConfig, SurfaceConfig, ToneConfig,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "blitwave")]
#[command(about = "Software framebuffer and streaming tone generator", long_about = None)]
pub struct Args {
    /// Initial surface and window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Initial surface and window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,

    /// Number of ticks to run
    #[arg(long, default_value = "90")]
    pub ticks: u64,

    /// Tick rate (ticks per second)
    #[arg(long, default_value = "30")]
    pub fps: u32,

    /// Tone pitch (Hz)
    #[arg(long, value_name = "HZ", default_value = "256")]
    pub tone_hz: u32,

    /// Tone peak sample value; values past 32767 saturate
    #[arg(long, default_value = "3000")]
    pub amplitude: i32,

    /// Audio sample rate (Hz)
    #[arg(long, value_name = "HZ", default_value = "48000")]
    pub sample_rate: u32,

    /// Ring buffer length (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "1.0")]
    pub ring_secs: f32,

    /// Alternate the window between full and half size every N ticks (0 = never)
    #[arg(long, value_name = "TICKS", default_value = "0")]
    pub resize_every: u64,

    /// Record frames and audio into this directory
    #[arg(long, value_name = "DIR")]
    pub record: Option<PathBuf>,

    /// Save every Nth frame while recording
    #[arg(long, value_name = "TICKS", default_value = "30")]
    pub capture_every: u64,

    /// Play through the default audio device (requires the `device` feature)
    #[arg(long)]
    pub device: bool,

    /// Run without any audio sink
    #[arg(long, conflicts_with = "device")]
    pub no_audio: bool,

    /// Keep the old surface until the new one is allocated
    #[arg(long)]
    pub allocate_first: bool,
}

impl Args {
    pub fn surface_config(&self) -> SurfaceConfig {
        SurfaceConfig {
            initial_width: self.width,
            initial_height: self.height,
            release_order: if self.allocate_first {
                ReleaseOrder::AfterAlloc
            } else {
                ReleaseOrder::BeforeAlloc
            },
            ..SurfaceConfig::default()
        }
    }

    pub fn host_config(&self) -> HostConfig {
        HostConfig {
            window_width: self.width,
            window_height: self.height,
            fps: self.fps,
            ticks: self.ticks,
            resize_every: self.resize_every,
        }
    }

    pub fn audio_format(&self) -> AudioFormat {
        AudioFormat {
            sample_rate_hz: self.sample_rate,
            ..AudioFormat::default()
        }
    }

    pub fn ring_config(&self) -> RingConfig {
        RingConfig {
            duration_secs: self.ring_secs,
        }
    }

    pub fn tone_config(&self) -> ToneConfig {
        ToneConfig {
            frequency_hz: self.tone_hz,
            amplitude: self.amplitude,
        }
    }

    /// Recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.record.as_ref().map(|dir| RecordingConfig {
            capture_every: self.capture_every,
            ..RecordingConfig::new(dir)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let args = Args::parse_from(["blitwave"]);
        assert_eq!(args.audio_format(), AudioFormat::default());
        assert_eq!(args.tone_config().frequency_hz, ToneConfig::default().frequency_hz);
        assert_eq!(args.surface_config().release_order, ReleaseOrder::BeforeAlloc);
        assert!(args.recording_config().is_none());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "blitwave",
            "--width",
            "320",
            "--tone-hz",
            "440",
            "--amplitude",
            "40000",
            "--record",
            "out",
            "--capture-every",
            "5",
            "--allocate-first",
        ]);
        assert_eq!(args.surface_config().initial_width, 320);
        assert_eq!(args.host_config().window_width, 320);
        assert_eq!(args.tone_config().amplitude, 40_000);
        assert_eq!(args.surface_config().release_order, ReleaseOrder::AfterAlloc);

        let recording = args.recording_config().unwrap();
        assert_eq!(recording.output_dir, PathBuf::from("out"));
        assert_eq!(recording.capture_every, 5);
    }

    #[test]
    fn test_device_conflicts_with_no_audio() {
        assert!(Args::try_parse_from(["blitwave", "--device", "--no-audio"]).is_err());
    }
}
