//! Single-threaded tick loop driving video and audio production.
//!
//! Each tick: drain host events without blocking, resize once per
//! notification, render the pattern, plan and fill audio, then present the surface.
//! Failures are absorbed and reported in the returned [`TickReport`].

use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::audio::{AudioBackend, AudioMonitor, AudioRing, ToneGenerator};
use crate::error::{OutputError, PipelineError};
use crate::params::SurfaceConfig;
use crate::video::{
    present, render_gradient, BlitRects, FrameSurface, PresentTarget, SurfaceAllocator,
};

/// Notification from the host windowing layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Client area changed; the surface is reallocated at this size
    Resized { width: u32, height: u32 },

    /// User asked to quit
    CloseRequested,
}

/// Non-blocking host event queue
pub trait EventSource {
    /// Next pending event, or `None` immediately if the queue is empty
    fn poll_event(&mut self) -> Option<HostEvent>;
}

/// Pre-recorded event queue for headless hosts and tests
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    queue: VecDeque<HostEvent>,
}

impl ScriptedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: HostEvent) {
        self.queue.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl EventSource for ScriptedEvents {
    fn poll_event(&mut self) -> Option<HostEvent> {
        self.queue.pop_front()
    }
}

/// What audio production did during one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioOutcome {
    /// No sink attached
    Stub,

    /// Play cursor has not moved since the last fill
    Idle,

    /// Regions written and handed back
    Filled { bytes: usize, regions: usize },

    /// Fill skipped this tick; retried on the next one
    Skipped(PipelineError),
}

/// Outcome of a single tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// Index of the tick, starting at 0
    pub tick: u64,

    /// Resize events drained this tick
    pub resize_events: usize,

    /// Most recent resize failure this tick, if any
    pub resize_error: Option<PipelineError>,

    /// Pattern was rendered into a live surface
    pub rendered: bool,

    pub audio: AudioOutcome,

    /// Rectangles used for presentation, `None` if nothing was presented
    pub presented: Option<BlitRects>,

    pub close_requested: bool,
}

impl TickReport {
    fn new(tick: u64) -> Self {
        Self {
            tick,
            resize_events: 0,
            resize_error: None,
            rendered: false,
            audio: AudioOutcome::Stub,
            presented: None,
            close_requested: false,
        }
    }
}

/// Totals reported when the pipeline shuts down
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub surface_allocations: u64,
    pub surface_releases: u64,
    pub audio_frames_written: u64,
    pub audio_bytes_written: u64,
    pub configured_pitch_hz: u32,

    /// Dominant frequency of the produced audio, when a monitor was attached
    pub measured_pitch_hz: Option<f32>,
}

/// Presentation context owning the surface, the ring and the audio capability
#[derive(Debug)]
pub struct Pipeline {
    surface: FrameSurface,
    allocator: SurfaceAllocator,
    config: SurfaceConfig,

    ring: AudioRing,
    tone: ToneGenerator,
    audio: AudioBackend,
    monitor: Option<AudioMonitor>,
    sink_healthy: bool,

    phase_x: i32,
    phase_y: i32,
    tick: u64,
    audio_bytes_written: u64,
}

impl Pipeline {
    /// Build the context and allocate the initial surface.
    ///
    /// A failed initial allocation is logged; the surface stays empty until
    /// the next resize.
    pub fn new(
        config: SurfaceConfig,
        ring: AudioRing,
        tone: ToneGenerator,
        audio: AudioBackend,
    ) -> Self {
        let mut pipeline = Self {
            surface: FrameSurface::empty(),
            allocator: SurfaceAllocator::new(config.release_order),
            config,
            ring,
            tone,
            audio,
            monitor: None,
            sink_healthy: true,
            phase_x: 0,
            phase_y: 0,
            tick: 0,
            audio_bytes_written: 0,
        };

        let (width, height) = (pipeline.config.initial_width, pipeline.config.initial_height);
        if let Err(e) = pipeline.allocator.resize(&mut pipeline.surface, width, height) {
            warn!("Initial surface allocation failed: {}", e);
        }
        info!(
            "Pipeline ready: surface {}x{}, ring {} bytes, audio backend '{}'",
            pipeline.surface.width(),
            pipeline.surface.height(),
            pipeline.ring.capacity_bytes(),
            pipeline.audio.name()
        );
        pipeline
    }

    /// Observe every filled region with `monitor`
    pub fn with_monitor(mut self, monitor: AudioMonitor) -> Self {
        self.monitor = Some(monitor);
        self
    }

    pub fn surface(&self) -> &FrameSurface {
        &self.surface
    }

    pub fn allocator(&self) -> &SurfaceAllocator {
        &self.allocator
    }

    pub fn ring(&self) -> &AudioRing {
        &self.ring
    }

    pub fn tone(&self) -> &ToneGenerator {
        &self.tone
    }

    /// Retune or change volume between ticks
    pub fn tone_mut(&mut self) -> &mut ToneGenerator {
        &mut self.tone
    }

    pub fn backend_name(&self) -> &str {
        self.audio.name()
    }

    /// Ticks completed so far
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Pattern phase used by the next render
    pub fn phase(&self) -> (i32, i32) {
        (self.phase_x, self.phase_y)
    }

    /// Run one iteration of the loop
    pub fn tick(
        &mut self,
        events: &mut dyn EventSource,
        target: &mut dyn PresentTarget,
    ) -> TickReport {
        let mut report = TickReport::new(self.tick);

        // One allocator call per notification, in queue order
        while let Some(event) = events.poll_event() {
            match event {
                HostEvent::Resized { width, height } => {
                    report.resize_events += 1;
                    match self.allocator.resize(&mut self.surface, width, height) {
                        Ok(()) => info!("Surface resized to {}x{}", width, height),
                        Err(e) => {
                            warn!("Resize to {}x{} skipped: {}", width, height, e);
                            report.resize_error = Some(e);
                        }
                    }
                }
                HostEvent::CloseRequested => report.close_requested = true,
            }
        }

        if self.surface.is_live() {
            render_gradient(&mut self.surface, self.phase_x, self.phase_y);
            report.rendered = true;
        }

        report.audio = self.fill_audio();
        report.presented = present(&self.surface, target);

        self.phase_x = self.phase_x.wrapping_add(self.config.phase_step_x);
        self.phase_y = self.phase_y.wrapping_add(self.config.phase_step_y);
        self.tick += 1;
        report
    }

    fn fill_audio(&mut self) -> AudioOutcome {
        let AudioBackend::Available(sink) = &mut self.audio else {
            return AudioOutcome::Stub;
        };

        let play_cursor = match sink.play_cursor() {
            Ok(cursor) => cursor,
            Err(e) => return skip_audio(&mut self.sink_healthy, e),
        };

        let plan = self.ring.plan_write(play_cursor);
        if plan.is_idle() {
            debug!("Audio idle at play cursor {}", play_cursor);
            return AudioOutcome::Idle;
        }

        let mut lock = match self.ring.lock() {
            Ok(lock) => lock,
            Err(e) => return skip_audio(&mut self.sink_healthy, e),
        };

        let mut bytes = 0;
        let mut regions = 0;
        let mut monitor_failed = false;
        for region in plan.regions() {
            if let Err(e) = self.tone.fill(&mut lock, region) {
                drop(lock);
                return skip_audio(&mut self.sink_healthy, e);
            }
            if let (Some(monitor), Some(written)) = (self.monitor.as_mut(), lock.region(region)) {
                if let Err(e) = monitor.capture(written) {
                    warn!("Audio monitor stopped: {}", e);
                    monitor_failed = true;
                }
            }
            bytes += region.size;
            regions += 1;
        }
        // Hand the filled regions back to the consumer
        drop(lock);

        if monitor_failed {
            self.monitor = None;
        }
        if !self.sink_healthy {
            info!("Audio sink '{}' available again", self.audio.name());
            self.sink_healthy = true;
        }
        self.audio_bytes_written += bytes as u64;
        debug!("Audio filled {} bytes in {} region(s): {:?}", bytes, regions, plan);
        AudioOutcome::Filled { bytes, regions }
    }

    /// Release the surface and ring, finalize recording outputs
    pub fn shutdown(mut self) -> Result<RunSummary, OutputError> {
        self.allocator.release(&mut self.surface);

        let measured_pitch_hz = match self.monitor.take() {
            Some(monitor) => monitor.finish()?,
            None => None,
        };

        let summary = RunSummary {
            ticks: self.tick,
            surface_allocations: self.allocator.allocations(),
            surface_releases: self.allocator.releases(),
            audio_frames_written: self.tone.frames_written(),
            audio_bytes_written: self.audio_bytes_written,
            configured_pitch_hz: self.tone.frequency_hz(),
            measured_pitch_hz,
        };
        info!("Pipeline shut down after {} ticks", summary.ticks);
        Ok(summary)
    }
}

/// Record a skipped fill; warns only on the first skip after a healthy tick
fn skip_audio(sink_healthy: &mut bool, error: PipelineError) -> AudioOutcome {
    if *sink_healthy {
        warn!("Audio fill skipped: {}", error);
        *sink_healthy = false;
    } else {
        debug!("Audio fill skipped: {}", error);
    }
    AudioOutcome::Skipped(error)
}
