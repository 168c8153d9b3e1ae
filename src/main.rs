//! Blitwave - software framebuffer and streaming tone generator
//!
//! Headless host: drives the tick loop against an in-memory display and a
//! clock-paced audio consumer, optionally recording frames and audio.

use std::error::Error;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info, warn};

use blitwave::audio::{
    AudioBackend, AudioMonitor, AudioRing, PlayCursor, SimulatedSink, ToneGenerator,
};
use blitwave::cli::Args;
use blitwave::params::AnalysisConfig;
use blitwave::pipeline::{AudioOutcome, HostEvent, Pipeline, ScriptedEvents};
use blitwave::video::{FrameRecorder, SoftwareTarget};

/// Audio capability chosen at startup
struct Backend {
    audio: AudioBackend,

    /// Present when the host clock drives playback
    clock: Option<PlayCursor>,
}

fn select_backend(args: &Args, ring: &AudioRing) -> Backend {
    if args.no_audio {
        info!("Audio disabled");
        return Backend {
            audio: AudioBackend::Stub,
            clock: None,
        };
    }

    if args.device {
        #[cfg(feature = "device")]
        match blitwave::audio::CpalSink::open(ring) {
            Ok(sink) => {
                return Backend {
                    audio: AudioBackend::Available(Box::new(sink)),
                    clock: None,
                }
            }
            Err(e) => warn!("{}; falling back to simulated playback", e),
        }

        #[cfg(not(feature = "device"))]
        warn!("Built without the `device` feature; falling back to simulated playback");
    }

    let sink = SimulatedSink::new(PlayCursor::new(ring.capacity_bytes(), ring.bytes_per_frame()));
    let clock = sink.cursor();
    info!("Audio: simulated playback");
    Backend {
        audio: AudioBackend::Available(Box::new(sink)),
        clock: Some(clock),
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let host = args.host_config();
    let format = args.audio_format();
    let analysis = AnalysisConfig::default();
    analysis
        .validate()
        .map_err(|e| format!("Invalid analysis config: {}", e))?;

    let ring = AudioRing::with_config(format, &args.ring_config())?;
    let tone = ToneGenerator::new(&args.tone_config(), &format);
    let backend = select_backend(&args, &ring);
    // A real device sets the pace; otherwise run as fast as possible
    let realtime = backend.clock.is_none() && !matches!(backend.audio, AudioBackend::Stub);

    let recording = args.recording_config();
    let mut recorder = recording.clone().map(FrameRecorder::new).transpose()?;
    let mut monitor = AudioMonitor::new(format, analysis);
    if let Some(config) = &recording {
        monitor = monitor.with_wav(&config.audio_path())?;
    }

    let mut pipeline =
        Pipeline::new(args.surface_config(), ring, tone, backend.audio).with_monitor(monitor);
    let mut target = SoftwareTarget::new(host.window_width, host.window_height);
    let mut events = ScriptedEvents::new();

    let frames_per_tick = host.frames_per_tick(format.sample_rate_hz);
    let tick_interval = Duration::from_secs_f64(1.0 / host.fps.max(1) as f64);
    let started = Instant::now();
    let mut audio_skips = 0u64;

    for tick in 0..host.ticks {
        if let Some((width, height)) = host.resize_at(tick) {
            target.resize(width, height);
            events.push(HostEvent::Resized { width, height });
        }
        if let Some(clock) = &backend.clock {
            clock.advance_frames(frames_per_tick);
        }

        let report = pipeline.tick(&mut events, &mut target);
        if matches!(report.audio, AudioOutcome::Skipped(_)) {
            audio_skips += 1;
        }

        if let (Some(recorder), Some(_)) = (recorder.as_mut(), report.presented) {
            if let Err(e) = recorder.capture(tick, &target) {
                warn!("Failed to save frame {}: {}", tick, e);
            }
        }

        if report.close_requested {
            info!("Close requested at tick {}", tick);
            break;
        }

        if realtime {
            let deadline = started + tick_interval.mul_f64((tick + 1) as f64);
            std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
        }
    }

    let summary = pipeline.shutdown()?;
    info!(
        "Ran {} ticks in {:.2?}: {} surface allocations, {} audio frames, {} audio skips",
        summary.ticks,
        started.elapsed(),
        summary.surface_allocations,
        summary.audio_frames_written,
        audio_skips
    );
    match summary.measured_pitch_hz {
        Some(measured) => info!(
            "Tone pitch: configured {} Hz, measured {:.1} Hz",
            summary.configured_pitch_hz, measured
        ),
        None => info!("Not enough audio produced to measure pitch"),
    }
    if let Some(recorder) = &recorder {
        info!(
            "Saved {} frames and audio to {}",
            recorder.saved(),
            recorder.config().output_dir.display()
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
