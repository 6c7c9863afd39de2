//! CPAL-based capture backend for desktop platforms (Linux, macOS, Windows)
//!
//! Opens the default input device at the requested sample rate, channel
//! count and fixed callback size, with 32-bit float samples.

use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{info, warn};

use super::{ActiveStream, CaptureBackend, StreamFault, StreamRequest};
use crate::audio::callback::CaptureCallback;
use crate::error::AudioError;

/// Capture from the host's default input device
#[derive(Debug, Default)]
pub struct CpalBackend;

impl CpalBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CaptureBackend for CpalBackend {
    fn name(&self) -> &'static str {
        "cpal"
    }

    fn open(
        &self,
        request: StreamRequest,
        mut callback: CaptureCallback,
        fault: Arc<StreamFault>,
    ) -> Result<Box<dyn ActiveStream>, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(AudioError::DeviceUnavailable)?;

        if let Ok(name) = device.name() {
            info!("[CpalBackend] Using input device '{}'", name);
        }

        let stream_config = cpal::StreamConfig {
            channels: request.channels,
            sample_rate: cpal::SampleRate(request.sample_rate),
            buffer_size: cpal::BufferSize::Fixed(request.frames_per_buffer),
        };
        let channels = request.channels.max(1) as usize;

        let err_fault = Arc::clone(&fault);
        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    callback.on_frames(Some(data), data.len() / channels);
                },
                move |err| err_fault.report(err.to_string()),
                None,
            )
            .map_err(map_build_error)?;

        stream.play().map_err(|e| AudioError::DeviceOpenFailed {
            reason: format!("Input start failed: {}", e),
        })?;

        Ok(Box::new(CpalStream { stream }))
    }
}

fn map_build_error(err: cpal::BuildStreamError) -> AudioError {
    match err {
        cpal::BuildStreamError::DeviceNotAvailable => AudioError::DeviceUnavailable,
        other => AudioError::DeviceOpenFailed {
            reason: other.to_string(),
        },
    }
}

struct CpalStream {
    stream: cpal::Stream,
}

impl ActiveStream for CpalStream {
    fn close(self: Box<Self>) {
        if let Err(err) = self.stream.pause() {
            warn!("[CpalBackend] Failed to pause input stream: {}", err);
        }
        // Dropping the stream joins the host's callback thread.
        drop(self.stream);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_device_maps_to_unavailable() {
        assert_eq!(
            map_build_error(cpal::BuildStreamError::DeviceNotAvailable),
            AudioError::DeviceUnavailable
        );
        assert!(matches!(
            map_build_error(cpal::BuildStreamError::StreamConfigNotSupported),
            AudioError::DeviceOpenFailed { .. }
        ));
    }
}
