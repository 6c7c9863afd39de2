// Spectro Ring - real-time sample buffering and windowing for spectrum display
// Lock-free capture path feeding a fixed-window FFT pipeline

// Module declarations
pub mod analysis;
pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod source;
pub mod telemetry;

// Re-exports for convenience
pub use analysis::{AxisLabel, DbRange, RealFft, SpectrumFrame, Transform};
pub use audio::{ExtractMode, RingBuffer, WindowExtractor};
pub use config::AppConfig;
pub use engine::{Command, SpectrumEngine};
pub use error::{AudioError, ErrorCode, PipelineError, SpectroError};
pub use source::{LiveCapture, RecordedCursor, SampleSource};
