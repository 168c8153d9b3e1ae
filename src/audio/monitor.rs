//! Tap on the bytes written into the ring: optional WAV recording plus pitch probe.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use log::info;

use super::analysis::PitchProbe;
use crate::error::OutputError;
use crate::params::{AnalysisConfig, AudioFormat, BYTES_PER_SAMPLE};

type WavFile = hound::WavWriter<BufWriter<File>>;

/// Observes produced audio in write order
pub struct AudioMonitor {
    format: AudioFormat,
    probe: PitchProbe,
    wav: Option<WavFile>,
    samples_seen: u64,
}

impl AudioMonitor {
    pub fn new(format: AudioFormat, analysis: AnalysisConfig) -> Self {
        Self {
            format,
            probe: PitchProbe::new(analysis, format.sample_rate_hz),
            wav: None,
            samples_seen: 0,
        }
    }

    /// Also record everything captured to a 16-bit PCM WAV file at `path`
    pub fn with_wav(mut self, path: &Path) -> Result<Self, OutputError> {
        let spec = hound::WavSpec {
            channels: self.format.channels,
            sample_rate: self.format.sample_rate_hz,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        self.wav = Some(hound::WavWriter::create(path, spec)?);
        info!("Recording audio to {}", path.display());
        Ok(self)
    }

    pub fn is_recording(&self) -> bool {
        self.wav.is_some()
    }

    /// Interleaved samples captured so far
    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    /// Consume interleaved little-endian PCM bytes of one filled region
    pub fn capture(&mut self, bytes: &[u8]) -> Result<(), OutputError> {
        let channels = self.format.channels.max(1) as usize;
        for (index, raw) in bytes.chunks_exact(BYTES_PER_SAMPLE).enumerate() {
            let sample = i16::from_le_bytes([raw[0], raw[1]]);
            if let Some(wav) = self.wav.as_mut() {
                wav.write_sample(sample)?;
            }
            // Channels carry the same tone; the first one is enough to measure
            if index % channels == 0 {
                self.probe.push(sample);
            }
            self.samples_seen += 1;
        }
        Ok(())
    }

    /// Dominant frequency of the latest analysis window, once it is full
    pub fn measured_pitch(&mut self) -> Option<f32> {
        if !self.probe.is_ready() {
            return None;
        }
        self.probe.measure()
    }

    /// Finalize the WAV header and return the last pitch measurement
    pub fn finish(mut self) -> Result<Option<f32>, OutputError> {
        let pitch = self.measured_pitch();
        if let Some(wav) = self.wav.take() {
            wav.finalize()?;
        }
        Ok(pitch)
    }
}

impl std::fmt::Debug for AudioMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioMonitor")
            .field("format", &self.format)
            .field("recording", &self.is_recording())
            .field("samples_seen", &self.samples_seen)
            .finish()
    }
}
