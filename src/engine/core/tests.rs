use super::*;
use std::time::{Duration, Instant};

use rustfft::num_complex::Complex;

use crate::engine::backend::{SyntheticBackend, SyntheticSignal};
use crate::error::{AudioError, Edge};
use crate::source::{LiveCapture, RecordedCursor};

const N: usize = 1024;

/// 16 kHz / 1024 puts 1 kHz exactly on bin 64.
fn tone(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 16_000.0).sin())
        .collect()
}

fn recorded_engine(len: usize) -> SpectrumEngine {
    let cursor = RecordedCursor::new(tone(len), N);
    SpectrumEngine::new(AppConfig::default(), cursor.into()).unwrap()
}

fn live_engine() -> SpectrumEngine {
    live_engine_with(AppConfig::default())
}

fn live_engine_with(config: AppConfig) -> SpectrumEngine {
    let backend = SyntheticBackend::new(SyntheticSignal::Tone {
        frequency: 1000.0,
        amplitude: 1.0,
    })
    .with_period(Duration::from_millis(2));
    let capture = LiveCapture::new(Box::new(backend), &config);
    SpectrumEngine::new(config, capture.into()).unwrap()
}

struct TruncatingTransform;

impl Transform for TruncatingTransform {
    fn window_size(&self) -> usize {
        N
    }

    fn process(&mut self, _window: &[f32]) -> &[Complex<f32>] {
        &[]
    }
}

#[test]
fn test_scrub_forward_to_end() {
    let mut engine = recorded_engine(5000);

    for _ in 0..4 {
        let frame = engine.handle(Command::Advance).unwrap().unwrap();
        assert_eq!(frame.bin_count(), N / 2 + 1);
        assert_eq!(frame.peak().map(|(bin, _)| bin), Some(64));
    }

    let err = engine.handle(Command::Advance).unwrap_err();
    assert!(err.is_benign());
    assert_eq!(
        err,
        SpectroError::Pipeline(PipelineError::AtBoundary {
            edge: Edge::End,
            position: 4096
        })
    );
    assert!(engine.latest().is_some());
    assert_eq!(engine.metrics().windows_emitted, 4);
}

#[test]
fn test_rewind_before_two_windows_is_noop() {
    let mut engine = recorded_engine(5000);
    assert!(engine.handle(Command::Rewind).unwrap_err().is_benign());
    assert!(engine.latest().is_none());

    engine.handle(Command::Advance).unwrap();
    assert!(engine.handle(Command::Rewind).is_err());

    engine.handle(Command::Advance).unwrap();
    engine.handle(Command::Rewind).unwrap();
    match engine.source() {
        SampleSource::Recorded(cursor) => assert_eq!(cursor.position(), N),
        SampleSource::Live(_) => unreachable!(),
    }
}

#[test]
fn test_peek_keeps_window_resident() {
    let mut engine = recorded_engine(2 * N);
    engine.handle(Command::Advance).unwrap();
    assert_eq!(engine.ring().len(), N);
    assert_eq!(engine.tick().unwrap(), None);
    assert_eq!(engine.ring().len(), N);
}

#[test]
fn test_live_commands_rejected_for_recorded_source() {
    let mut engine = recorded_engine(N);
    let err = engine.handle(Command::StartCapture).unwrap_err();
    assert_eq!(
        err,
        SpectroError::Pipeline(PipelineError::UnsupportedCommand {
            command: "StartCapture",
            source: "recorded"
        })
    );
    assert!(!err.is_benign());
}

#[test]
fn test_scrub_commands_rejected_for_live_source() {
    let mut engine = live_engine();
    assert!(matches!(
        engine.handle(Command::Advance),
        Err(SpectroError::Pipeline(PipelineError::UnsupportedCommand { .. }))
    ));
}

#[test]
fn test_live_tick_skips_until_window_fills() {
    let mut engine = live_engine();
    assert_eq!(engine.tick().unwrap(), None);
    assert_eq!(engine.metrics().ticks_skipped, 1);
}

#[test]
fn test_live_capture_produces_frames() {
    let mut engine = live_engine();
    engine.handle(Command::StartCapture).unwrap();
    assert_eq!(
        engine.handle(Command::StartCapture).unwrap_err(),
        SpectroError::Audio(AudioError::AlreadyRunning)
    );

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut peaks = Vec::new();
    while peaks.len() < 3 && Instant::now() < deadline {
        if let Some(frame) = engine.tick().unwrap() {
            peaks.push(frame.peak().map(|(bin, _)| bin));
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    engine.handle(Command::StopCapture).unwrap();

    assert_eq!(peaks.len(), 3);
    assert!(peaks.iter().all(|p| *p == Some(64)));
    assert!(engine.metrics().samples_written >= 3 * N as u64);
    assert!(engine.metrics().callback_deliveries > 0);
}

#[test]
fn test_window_mismatch_rejected() {
    let cursor = RecordedCursor::new(tone(N), 512);
    assert!(matches!(
        SpectrumEngine::new(AppConfig::default(), cursor.into()),
        Err(PipelineError::InvalidConfig { .. })
    ));
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = AppConfig::default();
    config.audio.sample_rate = 0;
    let cursor = RecordedCursor::new(tone(N), N);
    assert!(SpectrumEngine::new(config, cursor.into()).is_err());
}

#[test]
fn test_short_transform_output_is_reported() {
    let mut engine = recorded_engine(N).with_transform(Box::new(TruncatingTransform));
    assert_eq!(
        engine.handle(Command::Advance).unwrap_err(),
        SpectroError::Pipeline(PipelineError::BinCountMismatch {
            expected: N / 2 + 1,
            actual: 0
        })
    );
}

#[test]
fn test_axis_labels_follow_config() {
    let engine = recorded_engine(N);
    let freq = engine.frequency_labels();
    assert_eq!(freq.last().map(|l| l.text.as_str()), Some("8.0 kHz"));
    let db = engine.db_labels();
    assert_eq!(db.first().map(|l| l.text.as_str()), Some("-80dB"));
}

#[test]
fn test_command_json() {
    let json = serde_json::to_string(&Command::TogglePause).unwrap();
    assert_eq!(json, "\"TogglePause\"");
    let parsed: Command = serde_json::from_str("\"Rewind\"").unwrap();
    assert_eq!(parsed, Command::Rewind);
}

fn two_window_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.window.ring_windows = 2;
    config
}

fn is_silent(frame: &SpectrumFrame) -> bool {
    frame.clamped_db.iter().all(|db| *db == -80.0)
}

#[test]
fn test_scrub_shows_written_window_with_larger_ring() {
    // [silence, tone, silence]
    let mut samples = vec![0.0; N];
    samples.extend(tone(N));
    samples.extend(vec![0.0; N]);
    let cursor = RecordedCursor::new(samples, N);
    let mut engine = SpectrumEngine::new(two_window_config(), cursor.into()).unwrap();
    assert_eq!(engine.ring().capacity(), 2 * N);

    assert!(is_silent(engine.handle(Command::Advance).unwrap().unwrap()));

    let frame = engine.handle(Command::Advance).unwrap().unwrap();
    assert_eq!(frame.peak().map(|(bin, _)| bin), Some(64));
    assert_eq!(engine.ring().len(), N);

    assert!(is_silent(engine.handle(Command::Advance).unwrap().unwrap()));

    let frame = engine.handle(Command::Rewind).unwrap().unwrap();
    assert_eq!(frame.peak().map(|(bin, _)| bin), Some(64));

    let frame = engine.handle(Command::Rewind).unwrap().unwrap();
    assert!(is_silent(frame));
    assert_eq!(engine.ring().len(), N);
}

#[test]
fn test_live_frames_with_larger_ring() {
    let mut engine = live_engine_with(two_window_config());
    assert_eq!(engine.ring().capacity(), 2 * N);
    engine.handle(Command::StartCapture).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut peaks = Vec::new();
    while peaks.len() < 3 && Instant::now() < deadline {
        if let Some(frame) = engine.tick().unwrap() {
            peaks.push(frame.peak().map(|(bin, _)| bin));
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    engine.handle(Command::StopCapture).unwrap();

    assert_eq!(peaks.len(), 3);
    assert!(peaks.iter().all(|p| *p == Some(64)));
    assert!(engine.ring().len() <= 2 * N);
}

#[test]
fn test_restart_while_capturing_keeps_buffered_samples() {
    let mut engine = live_engine_with(two_window_config());
    engine.handle(Command::StartCapture).unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while engine.ring().is_empty() && Instant::now() < deadline {
        engine.tick().unwrap();
        std::thread::sleep(Duration::from_millis(1));
    }
    let buffered = engine.ring().len();
    assert!(buffered > 0);

    assert_eq!(
        engine.handle(Command::StartCapture).unwrap_err(),
        SpectroError::Audio(AudioError::AlreadyRunning)
    );
    assert_eq!(engine.ring().len(), buffered);
    engine.handle(Command::StopCapture).unwrap();
}
