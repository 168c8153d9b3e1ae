//! Audio consumers and the capability selected at startup.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::PipelineError;

/// External consumer of the ring that reports how far it has played
pub trait AudioSink {
    /// Human-readable sink name for logs
    fn name(&self) -> &str;

    /// Current play position as a byte offset into the ring
    fn play_cursor(&mut self) -> Result<usize, PipelineError>;
}

/// Audio output capability, chosen once and owned by the pipeline
pub enum AudioBackend {
    /// A consumer is attached and its play cursor drives the writes
    Available(Box<dyn AudioSink>),

    /// No output; audio production is skipped every tick
    Stub,
}

impl AudioBackend {
    pub fn name(&self) -> &str {
        match self {
            Self::Available(sink) => sink.name(),
            Self::Stub => "stub",
        }
    }
}

impl std::fmt::Debug for AudioBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AudioBackend").field(&self.name()).finish()
    }
}

/// Consumer position shared between the consumer thread and the producer.
///
/// Always frame aligned and below the ring capacity.
#[derive(Debug, Clone)]
pub struct PlayCursor {
    position: Arc<AtomicUsize>,
    capacity_bytes: usize,
    bytes_per_frame: usize,
}

impl PlayCursor {
    pub fn new(capacity_bytes: usize, bytes_per_frame: usize) -> Self {
        Self {
            position: Arc::new(AtomicUsize::new(0)),
            capacity_bytes: capacity_bytes.max(1),
            bytes_per_frame: bytes_per_frame.max(1),
        }
    }

    pub fn get(&self) -> usize {
        self.position.load(Ordering::Acquire)
    }

    /// Move forward by whole frames, wrapping at capacity
    pub fn advance_frames(&self, frames: usize) {
        let capacity_frames = (self.capacity_bytes / self.bytes_per_frame).max(1);
        let step = (frames % capacity_frames) * self.bytes_per_frame;
        let capacity = self.capacity_bytes;
        // Only the consumer advances, so the update never contends
        let _ = self
            .position
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |position| {
                Some((position + step) % capacity)
            });
    }
}

/// Consumer paced by the host's clock instead of a device
#[derive(Debug)]
pub struct SimulatedSink {
    cursor: PlayCursor,
    connected: Arc<AtomicBool>,
}

impl SimulatedSink {
    pub fn new(cursor: PlayCursor) -> Self {
        Self {
            cursor,
            connected: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Handle the host uses to advance playback
    pub fn cursor(&self) -> PlayCursor {
        self.cursor.clone()
    }

    /// Flag that simulates the device going away when cleared
    pub fn connection(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.connected)
    }
}

impl AudioSink for SimulatedSink {
    fn name(&self) -> &str {
        "simulated"
    }

    fn play_cursor(&mut self) -> Result<usize, PipelineError> {
        if !self.connected.load(Ordering::Acquire) {
            return Err(PipelineError::SinkUnavailable("simulated device lost"));
        }
        Ok(self.cursor.get())
    }
}
