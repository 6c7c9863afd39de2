use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use super::{ActiveStream, CaptureBackend, StreamFault, StreamRequest};
use crate::audio::callback::CaptureCallback;
use crate::error::AudioError;

/// Signal generated by [`SyntheticBackend`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyntheticSignal {
    /// Sine tone at `frequency` Hz with peak `amplitude`
    Tone { frequency: f32, amplitude: f32 },
    /// The subsystem reports no input; the callback fills silence
    NoInput,
}

/// Headless backend that drives the callback from a timer thread.
///
/// Used by the CLI when no device is wanted and by tests that need the real
/// two-thread interaction without audio hardware.
pub struct SyntheticBackend {
    signal: SyntheticSignal,
    period: Option<Duration>,
}

impl SyntheticBackend {
    pub fn new(signal: SyntheticSignal) -> Self {
        Self {
            signal,
            period: None,
        }
    }

    /// Override the delivery cadence (defaults to frames / sample rate).
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }
}

impl CaptureBackend for SyntheticBackend {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    fn open(
        &self,
        request: StreamRequest,
        mut callback: CaptureCallback,
        _fault: Arc<StreamFault>,
    ) -> Result<Box<dyn ActiveStream>, AudioError> {
        if request.sample_rate == 0 || request.frames_per_buffer == 0 {
            return Err(AudioError::DeviceOpenFailed {
                reason: "sample rate and frames per buffer must be non-zero".to_string(),
            });
        }

        let frames = request.frames_per_buffer as usize;
        let channels = callback.channels();
        let period = self.period.unwrap_or_else(|| {
            Duration::from_secs_f64(frames as f64 / request.sample_rate as f64)
        });
        let signal = self.signal;
        let request_rate = request.sample_rate as f64;

        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("synthetic-capture".to_string())
            .spawn(move || {
                let mut block = vec![0.0_f32; frames * channels];
                let step = 1.0 / request_rate;
                let mut phase = 0.0_f64;
                while thread_running.load(Ordering::Acquire) {
                    match signal {
                        SyntheticSignal::Tone {
                            frequency,
                            amplitude,
                        } => {
                            for frame in block.chunks_mut(channels) {
                                let value = amplitude
                                    * (std::f64::consts::TAU * phase).sin() as f32;
                                frame.fill(value);
                                // phase in cycles, wrapped to [0, 1)
                                phase = (phase + frequency as f64 * step).fract();
                            }
                            callback.on_frames(Some(&block), frames);
                        }
                        SyntheticSignal::NoInput => {
                            callback.on_frames(None, frames);
                        }
                    }
                    thread::sleep(period);
                }
                debug!("[SyntheticBackend] Delivery thread exiting");
            })
            .map_err(|e| AudioError::DeviceOpenFailed {
                reason: format!("failed to spawn delivery thread: {}", e),
            })?;

        Ok(Box::new(SyntheticStream {
            running,
            handle: Some(handle),
        }))
    }
}

struct SyntheticStream {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ActiveStream for SyntheticStream {
    fn close(mut self: Box<Self>) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("[SyntheticBackend] Delivery thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::ring_buffer::RingBuffer;
    use crate::audio::transport::{self, TransportStats};

    fn open(signal: SyntheticSignal) -> (Box<dyn ActiveStream>, transport::SampleConsumer) {
        let stats = Arc::new(TransportStats::default());
        let (tx, rx) = transport::channel(4096, Arc::clone(&stats));
        let callback = CaptureCallback::new(tx, Arc::new(AtomicBool::new(false)), 1, stats);
        let request = StreamRequest {
            sample_rate: 16_000,
            frames_per_buffer: 64,
            channels: 1,
        };
        let stream = SyntheticBackend::new(signal)
            .with_period(Duration::from_millis(1))
            .open(request, callback, Arc::new(StreamFault::default()))
            .unwrap();
        (stream, rx)
    }

    #[test]
    fn test_tone_delivers_whole_frames() {
        let (stream, mut rx) = open(SyntheticSignal::Tone {
            frequency: 1000.0,
            amplitude: 0.5,
        });
        thread::sleep(Duration::from_millis(30));
        stream.close();

        let stats = rx.stats();
        assert!(stats.deliveries > 0);
        assert_eq!(stats.samples_pushed + stats.samples_dropped, stats.deliveries * 64);

        let mut ring = RingBuffer::new(4096);
        rx.drain_into(&mut ring);
        assert!(ring.to_vec().iter().all(|s| s.abs() <= 0.5 + 1e-6));
    }

    #[test]
    fn test_no_deliveries_after_close() {
        let (stream, rx) = open(SyntheticSignal::NoInput);
        thread::sleep(Duration::from_millis(10));
        stream.close();
        let after_close = rx.stats().deliveries;
        thread::sleep(Duration::from_millis(20));
        assert_eq!(rx.stats().deliveries, after_close);
    }

    #[test]
    fn test_tone_phase_stays_continuous() {
        let (stream, mut rx) = open(SyntheticSignal::Tone {
            frequency: 1000.0,
            amplitude: 1.0,
        });
        thread::sleep(Duration::from_millis(30));
        stream.close();

        let mut ring = RingBuffer::new(4096);
        rx.drain_into(&mut ring);
        let samples = ring.to_vec();
        assert!(samples.len() >= 128);
        // 16 samples per cycle at 1 kHz / 16 kHz
        for (i, s) in samples.iter().take(128).enumerate() {
            let expected = (2.0 * std::f32::consts::PI * i as f32 / 16.0).sin();
            assert!((s - expected).abs() < 1e-4, "sample {}: {} vs {}", i, s, expected);
        }
    }

    #[test]
    fn test_rejects_zero_rate() {
        let stats = Arc::new(TransportStats::default());
        let (tx, _rx) = transport::channel(16, Arc::clone(&stats));
        let callback = CaptureCallback::new(tx, Arc::new(AtomicBool::new(false)), 1, stats);
        let request = StreamRequest {
            sample_rate: 0,
            frames_per_buffer: 64,
            channels: 1,
        };
        let result = SyntheticBackend::new(SyntheticSignal::NoInput).open(
            request,
            callback,
            Arc::new(StreamFault::default()),
        );
        assert!(matches!(result, Err(AudioError::DeviceOpenFailed { .. })));
    }
}
