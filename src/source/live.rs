//! LiveCapture - input device as a sample source
//!
//! State machine:
//!
//! ```text
//!          start() ok
//!   Idle ─────────────> Capturing
//!    ^                      │
//!    └──── stop() / device failure
//! ```
//!
//! The device stream runs the [`CaptureCallback`] on the audio subsystem's
//! thread; this struct lives on the consumer thread and pulls delivered
//! samples into the consumer's ring with [`LiveCapture::pump`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::audio::callback::CaptureCallback;
use crate::audio::ring_buffer::RingBuffer;
use crate::audio::transport::{self, SampleConsumer, TransportSnapshot, TransportStats};
use crate::config::AppConfig;
use crate::engine::backend::{ActiveStream, CaptureBackend, StreamFault, StreamRequest};
use crate::error::{log_audio_error, AudioError};

/// Capture lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureState {
    Idle,
    Capturing,
}

/// Live input source backed by a [`CaptureBackend`]
pub struct LiveCapture {
    backend: Box<dyn CaptureBackend>,
    request: StreamRequest,
    transport_capacity: usize,
    state: CaptureState,
    paused: Arc<AtomicBool>,
    stats: Arc<TransportStats>,
    fault: Arc<StreamFault>,
    stream: Option<Box<dyn ActiveStream>>,
    feed: Option<SampleConsumer>,
}

impl LiveCapture {
    pub fn new(backend: Box<dyn CaptureBackend>, config: &AppConfig) -> Self {
        Self {
            backend,
            request: StreamRequest::from(&config.audio),
            transport_capacity: config.transport_capacity(),
            state: CaptureState::Idle,
            paused: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(TransportStats::default()),
            fault: Arc::new(StreamFault::default()),
            stream: None,
            feed: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_capturing(&self) -> bool {
        self.state == CaptureState::Capturing
    }

    /// Open the input device and begin delivering samples.
    ///
    /// On failure the state stays `Idle`.
    ///
    /// # Errors
    /// - `AlreadyRunning` if capture is already active
    /// - `UnsupportedChannels` if the configured layout is not mono/stereo
    /// - `DeviceUnavailable` / `DeviceOpenFailed` from the backend
    pub fn start(&mut self) -> Result<(), AudioError> {
        if self.state == CaptureState::Capturing {
            return Err(AudioError::AlreadyRunning);
        }
        if !(1..=2).contains(&self.request.channels) {
            let err = AudioError::UnsupportedChannels {
                channels: self.request.channels,
            };
            log_audio_error(&err, "start");
            return Err(err);
        }

        // Fresh transport per stream: the previous producer died with the
        // previous stream.
        let (producer, consumer) =
            transport::channel(self.transport_capacity, Arc::clone(&self.stats));
        let callback = CaptureCallback::new(
            producer,
            Arc::clone(&self.paused),
            self.request.channels as usize,
            Arc::clone(&self.stats),
        );
        self.fault.take();

        let stream = self
            .backend
            .open(self.request, callback, Arc::clone(&self.fault))
            .map_err(|err| {
                log_audio_error(&err, "start");
                err
            })?;

        self.stream = Some(stream);
        self.feed = Some(consumer);
        self.state = CaptureState::Capturing;
        info!(
            "[LiveCapture] Capturing via {} at {} Hz, {} frames/callback, {} channel(s)",
            self.backend.name(),
            self.request.sample_rate,
            self.request.frames_per_buffer,
            self.request.channels
        );
        Ok(())
    }

    /// Close the stream and return to `Idle`.
    ///
    /// Safe to call when already idle. When this returns, no further
    /// callback invocation will happen. Samples already delivered stay
    /// available to [`pump`](LiveCapture::pump).
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.close();
            info!("[LiveCapture] Capture stopped");
        }
        self.state = CaptureState::Idle;
    }

    /// Suppress writes without tearing down the stream.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    /// Flip the pause flag; returns the new paused state.
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::Relaxed)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    /// Move delivered samples into `ring`.
    ///
    /// Never blocks. If the device reported a failure since the last pump,
    /// the remaining samples are still moved, capture returns to `Idle`, and
    /// `StreamFailure` is returned.
    pub fn pump(&mut self, ring: &mut RingBuffer<f32>) -> Result<usize, AudioError> {
        let moved = match self.feed.as_mut() {
            Some(feed) => feed.drain_into(ring),
            None => 0,
        };
        if moved > 0 {
            debug!("[LiveCapture] Pumped {} samples", moved);
        }

        if self.state == CaptureState::Capturing {
            if let Some(reason) = self.fault.take() {
                self.stop();
                let err = AudioError::StreamFailure { reason };
                log_audio_error(&err, "pump");
                return Err(err);
            }
        }
        Ok(moved)
    }

    pub fn stats(&self) -> TransportSnapshot {
        self.stats.snapshot()
    }

    /// Handle the backend's error callback writes into.
    pub fn fault_handle(&self) -> Arc<StreamFault> {
        Arc::clone(&self.fault)
    }
}

impl Drop for LiveCapture {
    fn drop(&mut self) {
        self.stop();
    }
}
