//! Capture callback - real-time frame delivery into the sample transport
//!
//! The audio subsystem calls [`CaptureCallback::on_frames`] repeatedly, on its
//! own thread, for as long as capture is running. Each call pushes exactly
//! the delivered frame count (times the channel count) into the transport.
//!
//! # Design
//! The callback struct is designed for real-time safety:
//! - No heap allocations during audio processing
//! - No mutex locks (only lock-free atomic operations and the rtrb queue)
//! - No blocking I/O or logging
//! - Bounded execution time, linear in the frame count
//!
//! # Architecture
//! ```text
//! LiveCapture::start()
//!   └─> CaptureCallback::new()
//!       └─> CaptureBackend::open()
//!           └─> CaptureCallback::on_frames() [Audio thread]
//!               ├─> paused?  -> zero-length contribution
//!               ├─> no input -> silence frames
//!               └─> input    -> mono/stereo copy into SampleProducer
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::transport::{SampleProducer, TransportStats};

/// Per-stream state owned by the audio thread.
pub struct CaptureCallback {
    transport: SampleProducer,
    /// Shared pause flag; when set, deliveries contribute nothing
    paused: Arc<AtomicBool>,
    /// Samples per frame (1 = mono, 2 = stereo interleaved)
    channels: usize,
    stats: Arc<TransportStats>,
}

impl CaptureCallback {
    /// # Panics
    /// Panics unless `channels` is 1 or 2
    pub fn new(
        transport: SampleProducer,
        paused: Arc<AtomicBool>,
        channels: usize,
        stats: Arc<TransportStats>,
    ) -> Self {
        assert!(
            channels == 1 || channels == 2,
            "channels must be 1 (mono) or 2 (stereo)"
        );
        Self {
            transport,
            paused,
            channels,
            stats,
        }
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Deliver `frames` frames from the audio subsystem.
    ///
    /// `input` is `None` when the subsystem reports no input for this period;
    /// silence is pushed in its place so the sample clock keeps advancing.
    /// Returns the number of samples accepted by the transport.
    pub fn on_frames(&mut self, input: Option<&[f32]>, frames: usize) -> usize {
        // Real-time audio callback - NO ALLOCATIONS, LOCKS, OR BLOCKING!
        self.stats.record_delivery();

        if self.paused.load(Ordering::Relaxed) {
            return 0;
        }

        let expected = frames * self.channels;
        match input {
            None => self.transport.push_silence(expected),
            Some(data) => {
                let available = data.len().min(expected);
                let mut accepted = self.transport.push_slice(&data[..available]);
                if available < expected {
                    // Short delivery: pad so the frame count stays exact
                    accepted += self.transport.push_silence(expected - available);
                }
                accepted
            }
        }
    }
}
