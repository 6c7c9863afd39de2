// Audio capture error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Audio error code constants
///
/// Error code range: 1001-1005
pub struct AudioErrorCodes {}

impl AudioErrorCodes {
    /// No default input device exists
    pub const DEVICE_UNAVAILABLE: i32 = 1001;

    /// The input stream could not be configured or started
    pub const DEVICE_OPEN_FAILED: i32 = 1002;

    /// Capture is already running
    pub const ALREADY_RUNNING: i32 = 1003;

    /// The device reported a failure while capturing
    pub const STREAM_FAILURE: i32 = 1004;

    /// Requested channel count is not mono or stereo
    pub const UNSUPPORTED_CHANNELS: i32 = 1005;
}

/// Log an audio error with structured context
///
/// This function logs audio errors with structured fields including:
/// - error_code: Numeric error code for programmatic handling
/// - component: The component where the error occurred
/// - message: Human-readable error message
/// - context: Additional contextual information
pub fn log_audio_error(err: &AudioError, context: &str) {
    error!(
        "Audio error in {}: code={}, component=LiveCapture, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Audio capture errors
///
/// None of these are fatal to the process: capture stays (or returns to)
/// `Idle` and the caller decides what to report.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// No default input device exists
    DeviceUnavailable,

    /// The input stream could not be configured or started
    DeviceOpenFailed { reason: String },

    /// Capture is already running
    AlreadyRunning,

    /// The device reported a failure while capturing
    StreamFailure { reason: String },

    /// Requested channel count is not mono or stereo
    UnsupportedChannels { channels: u16 },
}

impl ErrorCode for AudioError {
    fn code(&self) -> i32 {
        match self {
            AudioError::DeviceUnavailable => AudioErrorCodes::DEVICE_UNAVAILABLE,
            AudioError::DeviceOpenFailed { .. } => AudioErrorCodes::DEVICE_OPEN_FAILED,
            AudioError::AlreadyRunning => AudioErrorCodes::ALREADY_RUNNING,
            AudioError::StreamFailure { .. } => AudioErrorCodes::STREAM_FAILURE,
            AudioError::UnsupportedChannels { .. } => AudioErrorCodes::UNSUPPORTED_CHANNELS,
        }
    }

    fn message(&self) -> String {
        match self {
            AudioError::DeviceUnavailable => "No default input device available".to_string(),
            AudioError::DeviceOpenFailed { reason } => {
                format!("Failed to open input stream: {}", reason)
            }
            AudioError::AlreadyRunning => {
                "Capture already running. Call stop() first.".to_string()
            }
            AudioError::StreamFailure { reason } => {
                format!("Input stream failed: {}", reason)
            }
            AudioError::UnsupportedChannels { channels } => {
                format!("Only mono or stereo capture is supported (got {})", channels)
            }
        }
    }
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AudioError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AudioError {}
