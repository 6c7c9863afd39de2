//! Capture backend abstractions.
//!
//! A backend knows how to open an input stream and drive a
//! [`CaptureCallback`] from the audio subsystem's own thread. Everything
//! above the backend (transport, ring, windowing) is device-agnostic.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::audio::callback::CaptureCallback;
use crate::config::AudioConfig;
use crate::error::AudioError;

/// Parameters requested from the input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRequest {
    pub sample_rate: u32,
    pub frames_per_buffer: u32,
    pub channels: u16,
}

impl From<&AudioConfig> for StreamRequest {
    fn from(config: &AudioConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            frames_per_buffer: config.frames_per_buffer,
            channels: config.channels,
        }
    }
}

/// Failure reported asynchronously by the audio subsystem.
///
/// Written from the backend's error callback, read by the consumer on its
/// next pump. The data callback never touches it.
#[derive(Debug, Default)]
pub struct StreamFault {
    failed: AtomicBool,
    reason: Mutex<Option<String>>,
}

impl StreamFault {
    pub fn report(&self, reason: impl Into<String>) {
        if let Ok(mut slot) = self.reason.lock() {
            slot.get_or_insert_with(|| reason.into());
        }
        self.failed.store(true, Ordering::Release);
    }

    pub fn is_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    /// Take the recorded failure and clear the flag.
    pub fn take(&self) -> Option<String> {
        if !self.failed.swap(false, Ordering::AcqRel) {
            return None;
        }
        let reason = self
            .reason
            .lock()
            .ok()
            .and_then(|mut slot| slot.take())
            .unwrap_or_else(|| "unknown stream error".to_string());
        Some(reason)
    }
}

/// An open input stream.
pub trait ActiveStream {
    /// Stop and close the stream.
    ///
    /// Must not return until the audio subsystem has finished any in-flight
    /// callback invocation; no invocation may start afterwards.
    fn close(self: Box<Self>);
}

/// Trait implemented by input backends.
pub trait CaptureBackend {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Open and start an input stream that feeds `callback`.
    ///
    /// # Errors
    /// - `DeviceUnavailable` when there is no input device
    /// - `DeviceOpenFailed` when the stream cannot be configured or started
    fn open(
        &self,
        request: StreamRequest,
        callback: CaptureCallback,
        fault: std::sync::Arc<StreamFault>,
    ) -> Result<Box<dyn ActiveStream>, AudioError>;
}

#[cfg(not(target_os = "android"))]
mod cpal;
#[cfg(not(target_os = "android"))]
pub use self::cpal::CpalBackend;

mod synthetic;
pub use synthetic::{SyntheticBackend, SyntheticSignal};
