//! Parameter definitions with physical units and documented semantics.
//!
//! All tunables are collected here with:
//! - Units (pixels, Hz, seconds, bytes)
//! - Documented defaults
//! - Validation where a bad value would break an invariant

mod audio;
mod render;
mod video;

// Re-export all types
pub use audio::{AnalysisConfig, AudioFormat, RingConfig, ToneConfig, BYTES_PER_SAMPLE};
pub use render::{HostConfig, RecordingConfig};
pub use video::{ReleaseOrder, SurfaceConfig};
