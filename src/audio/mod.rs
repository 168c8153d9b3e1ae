//! Audio production: circular ring, write planning, tone synthesis and sinks.

mod analysis;
#[cfg(feature = "device")]
mod device;
mod monitor;
mod planner;
mod ring;
mod sink;
mod tone;

pub use analysis::{dominant_frequency, hann_window, PitchProbe};
#[cfg(feature = "device")]
pub use device::CpalSink;
pub use monitor::AudioMonitor;
pub use planner::{plan_write, WritePlan};
pub use ring::{AudioRing, Region, RingLock, RingMemory};
pub use sink::{AudioBackend, AudioSink, PlayCursor, SimulatedSink};
pub use tone::ToneGenerator;
