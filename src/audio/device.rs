//! Default output device consuming the ring from the cpal callback thread.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};
use log::{info, warn};

use super::ring::AudioRing;
use super::sink::{AudioSink, PlayCursor};
use crate::error::PipelineError;
use crate::params::BYTES_PER_SAMPLE;

/// Output device that plays the ring and advances a shared play cursor
pub struct CpalSink {
    cursor: PlayCursor,
    device_name: String,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl CpalSink {
    /// Open the default output device at the ring's format
    pub fn open(ring: &AudioRing) -> Result<Self, String> {
        let format = ring.format();
        let capacity = ring.capacity_bytes();
        let bytes_per_frame = ring.bytes_per_frame();
        let ring_channels = format.channels as usize;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or("No audio output device found")?;
        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());

        let config = StreamConfig {
            channels: format.channels,
            sample_rate: SampleRate(format.sample_rate_hz),
            buffer_size: cpal::BufferSize::Default,
        };

        let memory = ring.memory();
        let cursor = PlayCursor::new(capacity, bytes_per_frame);
        let callback_cursor = cursor.clone();

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    // Producer holds the ring: play silence and keep the cursor still
                    let Ok(bytes) = memory.try_lock() else {
                        data.fill(0.0);
                        return;
                    };

                    let mut position = callback_cursor.get();
                    let mut frames = 0;
                    for frame in data.chunks_exact_mut(ring_channels) {
                        for (channel, out) in frame.iter_mut().enumerate() {
                            let at = position + channel * BYTES_PER_SAMPLE;
                            let sample = i16::from_le_bytes([bytes[at], bytes[at + 1]]);
                            *out = sample as f32 / 32768.0;
                        }
                        position = (position + bytes_per_frame) % capacity;
                        frames += 1;
                    }
                    drop(bytes);
                    callback_cursor.advance_frames(frames);
                },
                |err| warn!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| format!("Failed to build audio stream: {}", e))?;

        stream
            .play()
            .map_err(|e| format!("Failed to start audio stream: {}", e))?;

        info!("Audio: {} @ {}Hz", device_name, format.sample_rate_hz);

        Ok(Self {
            cursor,
            device_name,
            _stream: stream,
        })
    }
}

impl AudioSink for CpalSink {
    fn name(&self) -> &str {
        &self.device_name
    }

    fn play_cursor(&mut self) -> Result<usize, PipelineError> {
        Ok(self.cursor.get())
    }
}
