// Error types for the spectrum pipeline
//
// This module defines custom error types for capture and buffering operations,
// providing structured error handling with numeric codes for callers that
// report errors across a process or UI boundary.

mod audio;
mod pipeline;

use std::fmt;

pub use audio::{log_audio_error, AudioError, AudioErrorCodes};
pub use pipeline::{log_pipeline_error, Edge, PipelineError, PipelineErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the capture and buffering layers.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Umbrella error returned by the engine command surface
#[derive(Debug, Clone, PartialEq)]
pub enum SpectroError {
    Audio(AudioError),
    Pipeline(PipelineError),
}

impl SpectroError {
    /// True for errors the caller should treat as "skip this tick / ignore this key"
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            SpectroError::Pipeline(PipelineError::InsufficientData { .. })
                | SpectroError::Pipeline(PipelineError::AtBoundary { .. })
        )
    }
}

impl ErrorCode for SpectroError {
    fn code(&self) -> i32 {
        match self {
            SpectroError::Audio(err) => err.code(),
            SpectroError::Pipeline(err) => err.code(),
        }
    }

    fn message(&self) -> String {
        match self {
            SpectroError::Audio(err) => err.message(),
            SpectroError::Pipeline(err) => err.message(),
        }
    }
}

impl fmt::Display for SpectroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectroError::Audio(err) => fmt::Display::fmt(err, f),
            SpectroError::Pipeline(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for SpectroError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpectroError::Audio(err) => Some(err),
            SpectroError::Pipeline(err) => Some(err),
        }
    }
}

impl From<AudioError> for SpectroError {
    fn from(err: AudioError) -> Self {
        SpectroError::Audio(err)
    }
}

impl From<PipelineError> for SpectroError {
    fn from(err: PipelineError) -> Self {
        SpectroError::Pipeline(err)
    }
}
