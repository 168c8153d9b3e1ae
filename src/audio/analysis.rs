//! Spectral pitch measurement of produced audio.

use std::collections::VecDeque;
use std::f32::consts::PI;

use rustfft::{num_complex::Complex, FftPlanner};

use crate::params::AnalysisConfig;

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

/// Frequency (Hz) of the strongest non-DC bin over the first `fft_size` samples.
///
/// `None` if fewer than `fft_size` samples are given or the input is silent.
pub fn dominant_frequency(samples: &[f32], sample_rate_hz: u32, fft_size: usize) -> Option<f32> {
    if fft_size < 2 || samples.len() < fft_size {
        return None;
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    let mut buffer: Vec<Complex<f32>> = samples[..fft_size]
        .iter()
        .enumerate()
        .map(|(i, &s)| Complex::new(s * hann_window(i, fft_size), 0.0))
        .collect();
    fft.process(&mut buffer);

    let (bin, magnitude) = buffer[1..fft_size / 2]
        .iter()
        .map(|c| c.norm())
        .enumerate()
        .fold((0, 0.0f32), |best, (i, m)| if m > best.1 { (i + 1, m) } else { best });

    if magnitude <= f32::EPSILON {
        return None;
    }
    Some(bin as f32 * sample_rate_hz as f32 / fft_size as f32)
}

/// Sliding window of the most recent mono samples
#[derive(Debug)]
pub struct PitchProbe {
    config: AnalysisConfig,
    sample_rate_hz: u32,
    window: VecDeque<f32>,
}

impl PitchProbe {
    pub fn new(config: AnalysisConfig, sample_rate_hz: u32) -> Self {
        let capacity = config.fft_size;
        Self {
            config,
            sample_rate_hz,
            window: VecDeque::with_capacity(capacity),
        }
    }

    /// Append one 16-bit sample, discarding the oldest once the window is full
    pub fn push(&mut self, sample: i16) {
        if self.window.len() == self.config.fft_size {
            self.window.pop_front();
        }
        self.window.push_back(sample as f32 / 32768.0);
    }

    pub fn is_ready(&self) -> bool {
        self.window.len() == self.config.fft_size
    }

    /// Dominant frequency of the current window
    pub fn measure(&mut self) -> Option<f32> {
        let samples = self.window.make_contiguous();
        dominant_frequency(samples, self.sample_rate_hz, self.config.fft_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(frequency_hz: f32, sample_rate_hz: u32, count: usize) -> Vec<f32> {
        (0..count)
            .map(|i| (2.0 * PI * frequency_hz * i as f32 / sample_rate_hz as f32).sin())
            .collect()
    }

    #[test]
    fn test_hann_window() {
        let size = 1024;

        // Hann window should be 0 at edges, 1 at center
        assert!((hann_window(0, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size - 1, size) - 0.0).abs() < 0.01);
        assert!((hann_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_dominant_frequency_of_pure_sine() {
        let config = AnalysisConfig::default();
        let samples = sine(1000.0, 48_000, config.fft_size);
        let measured = dominant_frequency(&samples, 48_000, config.fft_size).unwrap();
        assert!((measured - 1000.0).abs() <= config.bin_width_hz(48_000));
    }

    #[test]
    fn test_short_or_silent_input_has_no_pitch() {
        assert_eq!(dominant_frequency(&[0.5; 100], 48_000, 1024), None);
        assert_eq!(dominant_frequency(&[0.0; 1024], 48_000, 1024), None);
    }

    #[test]
    fn test_probe_keeps_latest_window() {
        let mut probe = PitchProbe::new(AnalysisConfig { fft_size: 4 }, 48_000);
        for sample in [1, 2, 3, 4, 5] {
            probe.push(sample);
        }
        assert!(probe.is_ready());
        assert_eq!(probe.window.front().copied(), Some(2.0 / 32768.0));
    }
}
