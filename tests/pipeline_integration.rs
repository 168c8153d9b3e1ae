//! End-to-end runs of the tick loop against a software display and a
//! clock-driven consumer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use blitwave::audio::{
    AudioBackend, AudioMonitor, AudioRing, PlayCursor, SimulatedSink, ToneGenerator,
};
use blitwave::error::PipelineError;
use blitwave::params::{
    AnalysisConfig, AudioFormat, HostConfig, RecordingConfig, RingConfig, SurfaceConfig,
    ToneConfig,
};
use blitwave::pipeline::{AudioOutcome, HostEvent, Pipeline, ScriptedEvents};
use blitwave::video::{gradient_pixel, FrameRecorder, Pixel, PresentTarget, SoftwareTarget};

struct Harness {
    pipeline: Pipeline,
    clock: PlayCursor,
    sink: Arc<AtomicBool>,
    host: HostConfig,
    format: AudioFormat,
}

fn harness(surface: SurfaceConfig) -> Harness {
    let format = AudioFormat::default();
    let ring = AudioRing::with_config(format, &RingConfig::default()).unwrap();
    let sink = SimulatedSink::new(PlayCursor::new(ring.capacity_bytes(), ring.bytes_per_frame()));
    let clock = sink.cursor();
    let connection = sink.connection();
    let tone = ToneGenerator::new(&ToneConfig::default(), &format);
    let pipeline = Pipeline::new(surface, ring, tone, AudioBackend::Available(Box::new(sink)));
    Harness {
        pipeline,
        clock,
        sink: connection,
        host: HostConfig::default(),
        format,
    }
}

fn small_surface() -> SurfaceConfig {
    SurfaceConfig {
        initial_width: 64,
        initial_height: 36,
        ..SurfaceConfig::default()
    }
}

#[test]
fn steady_run_keeps_write_cursor_on_play_cursor() {
    let mut h = harness(small_surface());
    let mut target = SoftwareTarget::new(128, 72);
    let mut events = ScriptedEvents::new();
    let frames_per_tick = h.host.frames_per_tick(h.format.sample_rate_hz);

    for _ in 0..45 {
        h.clock.advance_frames(frames_per_tick);
        let report = h.pipeline.tick(&mut events, &mut target);
        assert!(matches!(report.audio, AudioOutcome::Filled { .. }));
        assert_eq!(h.pipeline.ring().lock_offset(), h.clock.get());
    }

    // 45 ticks of 1600 frames wrap the one-second ring once
    assert_eq!(h.pipeline.ring().write_cursor_samples(), 45 * 1600);
    assert_eq!(target.presents(), 45);

    let summary = h.pipeline.shutdown().unwrap();
    assert_eq!(summary.audio_bytes_written, 45 * 1600 * 4);
}

#[test]
fn presented_frame_shows_latest_phase() {
    let mut h = harness(small_surface());
    let mut target = SoftwareTarget::new(64, 36);
    let mut events = ScriptedEvents::new();

    for _ in 0..3 {
        h.pipeline.tick(&mut events, &mut target);
    }
    // Third tick rendered with phase (2, 4)
    assert_eq!(target.pixel(10, 5), Some(gradient_pixel(10, 5, 2, 4)));
    assert_eq!(target.pixel(0, 0), Some(Pixel::rgb(0, 4, 2)));
}

#[test]
fn lost_sink_skips_audio_then_recovers() {
    let mut h = harness(small_surface());
    let mut target = SoftwareTarget::new(8, 8);
    let mut events = ScriptedEvents::new();

    h.clock.advance_frames(100);
    h.sink.store(false, Ordering::Release);
    let report = h.pipeline.tick(&mut events, &mut target);
    assert!(matches!(
        report.audio,
        AudioOutcome::Skipped(PipelineError::SinkUnavailable(_))
    ));
    assert!(report.presented.is_some());
    assert_eq!(h.pipeline.ring().write_cursor_samples(), 0);

    h.sink.store(true, Ordering::Release);
    let report = h.pipeline.tick(&mut events, &mut target);
    assert_eq!(report.audio, AudioOutcome::Filled { bytes: 400, regions: 1 });
}

#[test]
fn resize_storm_follows_host_window() {
    let mut h = harness(small_surface());
    let host = HostConfig {
        window_width: 64,
        window_height: 36,
        resize_every: 2,
        ..HostConfig::default()
    };
    let mut target = SoftwareTarget::new(host.window_width, host.window_height);
    let mut events = ScriptedEvents::new();

    for tick in 0..8 {
        if let Some((width, height)) = host.resize_at(tick) {
            target.resize(width, height);
            events.push(HostEvent::Resized { width, height });
        }
        let report = h.pipeline.tick(&mut events, &mut target);
        let surface = h.pipeline.surface();
        assert_eq!(surface.width(), target.size().0);
        assert_eq!(report.presented.map(|r| r.src.width), Some(surface.width()));
    }
    // Initial allocation plus resizes at ticks 2, 4 and 6
    assert_eq!(h.pipeline.allocator().allocations(), 4);
    assert_eq!(h.pipeline.allocator().releases(), 3);
}

#[test]
fn stub_backend_runs_video_only() {
    let format = AudioFormat::default();
    let ring = AudioRing::with_config(format, &RingConfig::default()).unwrap();
    let tone = ToneGenerator::new(&ToneConfig::default(), &format);
    let mut pipeline = Pipeline::new(small_surface(), ring, tone, AudioBackend::Stub);
    let mut target = SoftwareTarget::new(64, 36);

    for _ in 0..5 {
        let report = pipeline.tick(&mut ScriptedEvents::new(), &mut target);
        assert_eq!(report.audio, AudioOutcome::Stub);
        assert!(report.rendered);
    }
    let summary = pipeline.shutdown().unwrap();
    assert_eq!(summary.audio_frames_written, 0);
    assert_eq!(summary.ticks, 5);
}

#[test]
fn recording_writes_frames_and_audio() {
    let dir = tempfile::tempdir().unwrap();
    let mut recording = RecordingConfig::new(dir.path());
    recording.capture_every = 10;

    let mut recorder = FrameRecorder::new(recording.clone()).unwrap();
    let monitor = AudioMonitor::new(AudioFormat::default(), AnalysisConfig::default())
        .with_wav(&recording.audio_path())
        .unwrap();

    let mut h = harness(small_surface());
    h.pipeline = h.pipeline.with_monitor(monitor);
    let mut target = SoftwareTarget::new(64, 36);
    let mut events = ScriptedEvents::new();
    let frames_per_tick = h.host.frames_per_tick(h.format.sample_rate_hz);

    for tick in 0..30 {
        h.clock.advance_frames(frames_per_tick);
        let report = h.pipeline.tick(&mut events, &mut target);
        if report.presented.is_some() {
            recorder.capture(tick, &target).unwrap();
        }
    }
    assert_eq!(recorder.saved(), 3);
    assert!(recording.frames_dir().join("frame_00002.png").exists());

    let summary = h.pipeline.shutdown().unwrap();
    let measured = summary.measured_pitch_hz.unwrap();
    let bin_width = AnalysisConfig::default().bin_width_hz(48_000);
    assert!((measured - 48_000.0 / 187.0).abs() <= bin_width);

    let reader = hound::WavReader::open(recording.audio_path()).unwrap();
    assert_eq!(reader.len() as u64, 30 * 1600 * 2);
}
