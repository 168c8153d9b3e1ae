//! Procedural sine tone written into ring regions.

use std::f64::consts::TAU;

use super::ring::{Region, RingLock};
use crate::error::PipelineError;
use crate::params::{AudioFormat, ToneConfig};

/// Mono sine tone, duplicated across channels
#[derive(Debug, Clone)]
pub struct ToneGenerator {
    sample_rate_hz: u32,
    frequency_hz: u32,
    /// Whole samples per wave cycle (`sample_rate / frequency`)
    period_samples: u32,
    amplitude: i32,
    frames_written: u64,
}

impl ToneGenerator {
    pub fn new(config: &ToneConfig, format: &AudioFormat) -> Self {
        let mut tone = Self {
            sample_rate_hz: format.sample_rate_hz,
            frequency_hz: 0,
            period_samples: 1,
            amplitude: config.amplitude,
            frames_written: 0,
        };
        tone.retune(config.frequency_hz);
        tone
    }

    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    pub fn period_samples(&self) -> u32 {
        self.period_samples
    }

    pub fn amplitude(&self) -> i32 {
        self.amplitude
    }

    /// Frames produced by `fill` over the generator's lifetime
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Change pitch; clamped so the period is at least one sample
    pub fn retune(&mut self, frequency_hz: u32) {
        self.frequency_hz = frequency_hz.clamp(1, self.sample_rate_hz.max(1));
        self.period_samples = (self.sample_rate_hz / self.frequency_hz).max(1);
    }

    pub fn set_amplitude(&mut self, amplitude: i32) {
        self.amplitude = amplitude;
    }

    /// Sample value at an absolute write cursor, saturated to 16 bits
    pub fn sample_at(&self, write_cursor_samples: u64) -> i16 {
        let period = self.period_samples as u64;
        let t = TAU * (write_cursor_samples % period) as f64 / period as f64;
        let value = (t.sin() * self.amplitude as f64).round();
        value.clamp(i16::MIN as f64, i16::MAX as f64) as i16
    }

    /// Fill one planned region, advancing the ring's write cursor per frame.
    ///
    /// Regions of one plan must be filled in order to keep the phase continuous.
    pub fn fill(
        &mut self,
        lock: &mut RingLock<'_>,
        region: Region,
    ) -> Result<usize, PipelineError> {
        let frames = lock.write_frames(region, |cursor| self.sample_at(cursor))?;
        self.frames_written += frames as u64;
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::ring::AudioRing;

    fn tone(frequency_hz: u32, amplitude: i32) -> ToneGenerator {
        ToneGenerator::new(
            &ToneConfig {
                frequency_hz,
                amplitude,
            },
            &AudioFormat::default(),
        )
    }

    #[test]
    fn test_reference_period() {
        let tone = tone(256, 3000);
        assert_eq!(tone.period_samples(), 187);
        assert_eq!(tone.sample_at(0), 0);
    }

    #[test]
    fn test_quarter_period_reaches_amplitude() {
        let tone = tone(12_000, 3000);
        assert_eq!(tone.period_samples(), 4);
        assert_eq!(tone.sample_at(1), 3000);
        assert_eq!(tone.sample_at(2), 0);
        assert_eq!(tone.sample_at(3), -3000);
        assert_eq!(tone.sample_at(5), 3000);
    }

    #[test]
    fn test_max_volume_saturates() {
        let tone = tone(256, 100_000);
        let samples: Vec<i16> = (0..187).map(|i| tone.sample_at(i)).collect();
        assert_eq!(samples.iter().copied().max(), Some(i16::MAX));
        assert_eq!(samples.iter().copied().min(), Some(i16::MIN));
        // Saturation holds the peak instead of wrapping to the opposite sign
        assert!(samples[40..55].iter().all(|&s| s == i16::MAX));
    }

    #[test]
    fn test_retune_changes_period() {
        let mut tone = tone(256, 3000);
        tone.retune(480);
        assert_eq!(tone.period_samples(), 100);
        tone.retune(0);
        assert_eq!(tone.frequency_hz(), 1);
        assert_eq!(tone.period_samples(), 48_000);
    }

    #[test]
    fn test_fill_is_phase_continuous_across_regions() {
        let mut ring = AudioRing::new(AudioFormat::default(), 64 * 4).unwrap();
        let mut tone = tone(256, 3000);
        {
            let mut lock = ring.lock().unwrap();
            tone.fill(&mut lock, Region::new(200, 56)).unwrap();
            tone.fill(&mut lock, Region::new(0, 40)).unwrap();

            let head = lock.region(Region::new(0, 4)).unwrap();
            let expected = tone.sample_at(14).to_le_bytes();
            assert_eq!(&head[..2], &expected);
            assert_eq!(&head[2..], &expected);
        }
        assert_eq!(ring.write_cursor_samples(), 24);
        assert_eq!(tone.frames_written(), 24);
    }
}
