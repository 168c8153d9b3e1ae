//! Error types for the presentation pipeline and its recording outputs.
//!
//! Tick-time failures are absorbed by the pipeline and only surface in its
//! tick report; startup failures are returned to the caller.

use thiserror::Error;

/// Failures of the surface, ring and sink components
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// Resize requested with a zero dimension; the previous surface is kept
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel or sample memory could not be reserved
    #[error("failed to allocate {bytes} bytes for {what}")]
    AllocationFailure { what: &'static str, bytes: usize },

    /// The audio sink could not be queried or the ring could not be locked
    #[error("audio sink unavailable: {0}")]
    SinkUnavailable(&'static str),

    /// Audio format or ring geometry rejected at construction
    #[error("invalid audio format: {0}")]
    InvalidFormat(String),

    /// A write region that is not a frame-aligned span inside the ring
    #[error("region {offset}+{size} is not a frame-aligned span of the {capacity}-byte ring")]
    RegionOutOfBounds {
        offset: usize,
        size: usize,
        capacity: usize,
    },
}

/// Failures writing recorded frames or audio to disk
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}
