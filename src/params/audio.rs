//! Audio format, ring geometry, tone and analysis parameters.

use crate::error::PipelineError;

/// Bytes per interleaved channel sample (signed 16-bit PCM)
pub const BYTES_PER_SAMPLE: usize = 2;

/// Interleaved signed 16-bit PCM format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// Samples per second per channel (Hz)
    pub sample_rate_hz: u32,

    /// Interleaved channel count
    pub channels: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate_hz: 48_000,
            channels: 2,
        }
    }
}

impl AudioFormat {
    /// Bytes in one sample frame (one sample for every channel)
    pub fn bytes_per_frame(&self) -> usize {
        self.channels as usize * BYTES_PER_SAMPLE
    }

    /// Reject formats the ring cannot hold
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.sample_rate_hz == 0 {
            return Err(PipelineError::InvalidFormat(
                "sample rate must be > 0".to_string(),
            ));
        }
        if self.channels == 0 {
            return Err(PipelineError::InvalidFormat(
                "channel count must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Circular buffer sizing
#[derive(Debug, Clone)]
pub struct RingConfig {
    /// Length of audio the ring holds (seconds)
    pub duration_secs: f32,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self { duration_secs: 1.0 }
    }
}

impl RingConfig {
    /// Capacity in bytes, rounded down to whole frames
    pub fn capacity_bytes(&self, format: &AudioFormat) -> usize {
        let frames = (format.sample_rate_hz as f64 * self.duration_secs.max(0.0) as f64) as usize;
        frames * format.bytes_per_frame()
    }
}

/// Procedural tone parameters
#[derive(Debug, Clone)]
pub struct ToneConfig {
    /// Tone pitch (Hz); the period is truncated to whole samples
    pub frequency_hz: u32,

    /// Peak sample value; values past the 16-bit range saturate
    pub amplitude: i32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            frequency_hz: 256,
            amplitude: 3000,
        }
    }
}

/// Pitch probe configuration
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// FFT window size (must be power of 2)
    pub fft_size: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { fft_size: 8192 }
    }
}

impl AnalysisConfig {
    /// Frequency resolution of one FFT bin (Hz)
    pub fn bin_width_hz(&self, sample_rate_hz: u32) -> f32 {
        sample_rate_hz as f32 / self.fft_size as f32
    }

    /// Validate configuration (FFT size must be power of 2)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() {
            return Err(format!(
                "FFT size must be power of 2, got {}",
                self.fft_size
            ));
        }
        Ok(())
    }
}
