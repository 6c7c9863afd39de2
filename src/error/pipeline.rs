// Buffering and windowing error types

use crate::error::ErrorCode;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline error code constants
///
/// Error code range: 2001-2006
pub struct PipelineErrorCodes {}

impl PipelineErrorCodes {
    /// Fewer samples buffered than the requested window
    pub const INSUFFICIENT_DATA: i32 = 2001;

    /// Scrub request past the edge of the recorded data
    pub const AT_BOUNDARY: i32 = 2002;

    /// Fewer samples loaded than expected
    pub const SHORT_READ: i32 = 2003;

    /// Transform produced a bin count that does not match the window
    pub const BIN_COUNT_MISMATCH: i32 = 2004;

    /// Command does not apply to the active sample source
    pub const UNSUPPORTED_COMMAND: i32 = 2005;

    /// Configuration values are inconsistent
    pub const INVALID_CONFIG: i32 = 2006;
}

/// Which edge of the recorded data a scrub request ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Start,
    End,
}

/// Log a pipeline error
///
/// Pipeline errors are recoverable, so they go out at warn level.
pub fn log_pipeline_error(err: &PipelineError, context: &str) {
    warn!(
        "Pipeline error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Buffering, windowing and loading errors
///
/// All variants are local and recoverable: the caller skips the tick,
/// ignores the command, or proceeds with partial data.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A window was requested before enough samples accumulated
    InsufficientData { requested: usize, available: usize },

    /// A scrub advance/rewind was requested past the array's edge
    AtBoundary { edge: Edge, position: usize },

    /// Fewer samples were loaded than expected
    ShortRead { expected: usize, loaded: usize },

    /// Transform output does not hold `N/2 + 1` bins
    BinCountMismatch { expected: usize, actual: usize },

    /// Command issued against a source that cannot honor it
    UnsupportedCommand {
        command: &'static str,
        source: &'static str,
    },

    /// Configuration values are inconsistent
    InvalidConfig { reason: String },
}

impl ErrorCode for PipelineError {
    fn code(&self) -> i32 {
        match self {
            PipelineError::InsufficientData { .. } => PipelineErrorCodes::INSUFFICIENT_DATA,
            PipelineError::AtBoundary { .. } => PipelineErrorCodes::AT_BOUNDARY,
            PipelineError::ShortRead { .. } => PipelineErrorCodes::SHORT_READ,
            PipelineError::BinCountMismatch { .. } => PipelineErrorCodes::BIN_COUNT_MISMATCH,
            PipelineError::UnsupportedCommand { .. } => PipelineErrorCodes::UNSUPPORTED_COMMAND,
            PipelineError::InvalidConfig { .. } => PipelineErrorCodes::INVALID_CONFIG,
        }
    }

    fn message(&self) -> String {
        match self {
            PipelineError::InsufficientData {
                requested,
                available,
            } => {
                format!(
                    "Insufficient data: need {} samples, {} buffered",
                    requested, available
                )
            }
            PipelineError::AtBoundary { edge, position } => {
                let edge = match edge {
                    Edge::Start => "start",
                    Edge::End => "end",
                };
                format!("Already at {} of recording (position {})", edge, position)
            }
            PipelineError::ShortRead { expected, loaded } => {
                format!("Short read: expected {} samples, loaded {}", expected, loaded)
            }
            PipelineError::BinCountMismatch { expected, actual } => {
                format!("Expected {} frequency bins, got {}", expected, actual)
            }
            PipelineError::UnsupportedCommand { command, source } => {
                format!("{} is not available for {} source", command, source)
            }
            PipelineError::InvalidConfig { reason } => {
                format!("Invalid configuration: {}", reason)
            }
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PipelineError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for PipelineError {}
