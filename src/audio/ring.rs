//! Circular sample memory shared with an external consumer.
//!
//! The producer writes through a `RingLock`, a non-blocking acquisition of
//! the shared memory; dropping the lock hands the written regions back.

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use super::planner::{plan_write, WritePlan};
use crate::error::PipelineError;
use crate::params::{AudioFormat, RingConfig, BYTES_PER_SAMPLE};

/// Contiguous byte span inside the ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub offset: usize,
    pub size: usize,
}

impl Region {
    pub const fn new(offset: usize, size: usize) -> Self {
        Self { offset, size }
    }

    /// One past the last byte
    pub fn end(&self) -> usize {
        self.offset + self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Shared handle to the ring bytes, cloned by consumers
#[derive(Debug, Clone)]
pub struct RingMemory(Arc<Mutex<Box<[u8]>>>);

impl RingMemory {
    /// Acquire the bytes without blocking
    pub fn try_lock(&self) -> Result<MutexGuard<'_, Box<[u8]>>, PipelineError> {
        match self.0.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => {
                Err(PipelineError::SinkUnavailable("ring memory is busy"))
            }
            Err(TryLockError::Poisoned(_)) => {
                Err(PipelineError::SinkUnavailable("ring memory is poisoned"))
            }
        }
    }
}

/// Fixed-capacity circular PCM buffer with a monotonic write cursor
#[derive(Debug)]
pub struct AudioRing {
    format: AudioFormat,
    capacity_bytes: usize,
    /// Sample frames produced since start; never wraps
    write_cursor_samples: u64,
    memory: RingMemory,
}

impl AudioRing {
    /// Allocate a zeroed ring of `capacity_bytes`, which must hold whole frames
    pub fn new(format: AudioFormat, capacity_bytes: usize) -> Result<Self, PipelineError> {
        format.validate()?;
        let bytes_per_frame = format.bytes_per_frame();
        if capacity_bytes == 0 || capacity_bytes % bytes_per_frame != 0 {
            return Err(PipelineError::InvalidFormat(format!(
                "ring capacity {} is not a positive multiple of {} bytes",
                capacity_bytes, bytes_per_frame
            )));
        }

        let mut bytes = Vec::new();
        if bytes.try_reserve_exact(capacity_bytes).is_err() {
            return Err(PipelineError::AllocationFailure {
                what: "audio ring",
                bytes: capacity_bytes,
            });
        }
        bytes.resize(capacity_bytes, 0u8);

        Ok(Self {
            format,
            capacity_bytes,
            write_cursor_samples: 0,
            memory: RingMemory(Arc::new(Mutex::new(bytes.into_boxed_slice()))),
        })
    }

    pub fn with_config(format: AudioFormat, config: &RingConfig) -> Result<Self, PipelineError> {
        Self::new(format, config.capacity_bytes(&format))
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    pub fn bytes_per_frame(&self) -> usize {
        self.format.bytes_per_frame()
    }

    pub fn write_cursor_samples(&self) -> u64 {
        self.write_cursor_samples
    }

    /// Byte offset the next write starts at
    pub fn lock_offset(&self) -> usize {
        let capacity_frames = (self.capacity_bytes / self.bytes_per_frame()) as u64;
        (self.write_cursor_samples % capacity_frames) as usize * self.bytes_per_frame()
    }

    /// Handle for a consumer that reads the ring from elsewhere
    pub fn memory(&self) -> RingMemory {
        self.memory.clone()
    }

    /// Writable regions between the write cursor and the consumer's play cursor
    pub fn plan_write(&self, play_cursor_bytes: usize) -> WritePlan {
        plan_write(
            self.lock_offset(),
            play_cursor_bytes,
            self.capacity_bytes,
            self.bytes_per_frame(),
        )
    }

    /// Acquire the ring for writing; fails instead of waiting if it is busy
    pub fn lock(&mut self) -> Result<RingLock<'_>, PipelineError> {
        let bytes = self.memory.try_lock()?;
        Ok(RingLock {
            bytes,
            write_cursor_samples: &mut self.write_cursor_samples,
            channels: self.format.channels as usize,
        })
    }
}

/// Exclusive write access to the ring; released on drop
#[derive(Debug)]
pub struct RingLock<'a> {
    bytes: MutexGuard<'a, Box<[u8]>>,
    write_cursor_samples: &'a mut u64,
    channels: usize,
}

impl RingLock<'_> {
    pub fn write_cursor_samples(&self) -> u64 {
        *self.write_cursor_samples
    }

    fn check(&self, region: Region) -> Result<(), PipelineError> {
        let bytes_per_frame = self.channels * BYTES_PER_SAMPLE;
        let aligned = region.offset % bytes_per_frame == 0 && region.size % bytes_per_frame == 0;
        let inside = region
            .offset
            .checked_add(region.size)
            .is_some_and(|end| end <= self.bytes.len());
        if !aligned || !inside {
            return Err(PipelineError::RegionOutOfBounds {
                offset: region.offset,
                size: region.size,
                capacity: self.bytes.len(),
            });
        }
        Ok(())
    }

    /// Write one frame per sample in `region`, the same value on every channel.
    ///
    /// `sample_at` receives the write cursor of each frame, which advances by
    /// one per frame. Returns the number of frames written.
    pub fn write_frames(
        &mut self,
        region: Region,
        mut sample_at: impl FnMut(u64) -> i16,
    ) -> Result<usize, PipelineError> {
        self.check(region)?;
        let bytes_per_frame = self.channels * BYTES_PER_SAMPLE;

        let mut frames = 0;
        for frame in self.bytes[region.offset..region.end()].chunks_exact_mut(bytes_per_frame) {
            let value = sample_at(*self.write_cursor_samples).to_le_bytes();
            for channel in frame.chunks_exact_mut(BYTES_PER_SAMPLE) {
                channel.copy_from_slice(&value);
            }
            *self.write_cursor_samples += 1;
            frames += 1;
        }
        Ok(frames)
    }

    /// Bytes of a region, for taps that observe what was written
    pub fn region(&self, region: Region) -> Option<&[u8]> {
        self.bytes.get(region.offset..region.end())
    }
}
