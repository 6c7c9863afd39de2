//! SpectrumEngine: the explicitly owned pipeline context.
//!
//! One engine owns one sample source, the consumer-side ring buffer, the
//! window extractor, the transform and the last derived frame. It lives on
//! the consumer thread; the only cross-thread traffic is the capture
//! transport inside [`LiveCapture`](crate::source::LiveCapture).

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::analysis::axis::{self, AxisLabel};
use crate::analysis::fft::{RealFft, Transform};
use crate::analysis::spectrum::{DbRange, SpectrumFrame};
use crate::audio::ring_buffer::RingBuffer;
use crate::audio::window::{ExtractMode, WindowExtractor};
use crate::config::AppConfig;
use crate::error::{log_pipeline_error, ErrorCode, PipelineError, SpectroError};
use crate::source::SampleSource;
use crate::telemetry::{MetricsSnapshot, PipelineMetrics};

/// Interactive commands from the control surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    StartCapture,
    StopCapture,
    TogglePause,
    /// Show the next window of recorded data
    Advance,
    /// Show the window before the current one
    Rewind,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::StartCapture => "StartCapture",
            Command::StopCapture => "StopCapture",
            Command::TogglePause => "TogglePause",
            Command::Advance => "Advance",
            Command::Rewind => "Rewind",
        }
    }
}

/// Pipeline context: source -> ring -> window -> transform -> frame
pub struct SpectrumEngine {
    config: AppConfig,
    source: SampleSource,
    ring: RingBuffer<f32>,
    extractor: WindowExtractor<f32>,
    transform: Box<dyn Transform>,
    range: DbRange,
    metrics: PipelineMetrics,
    latest: Option<SpectrumFrame>,
}

impl SpectrumEngine {
    /// Build an engine around `source` using the rustfft transform.
    ///
    /// # Errors
    /// `InvalidConfig` if the configuration does not validate or a recorded
    /// source was built for a different window size.
    pub fn new(config: AppConfig, source: SampleSource) -> Result<Self, PipelineError> {
        config.validate().map_err(|err| {
            log_pipeline_error(&err, "SpectrumEngine::new");
            err
        })?;

        let window_size = config.window.window_size;
        if let SampleSource::Recorded(cursor) = &source {
            if cursor.window_size() != window_size {
                return Err(PipelineError::InvalidConfig {
                    reason: format!(
                        "recorded cursor window {} does not match configured window {}",
                        cursor.window_size(),
                        window_size
                    ),
                });
            }
        }

        info!(
            "[SpectrumEngine] {} source, window {}, ring {}, range [{}, {}] dB",
            source.kind(),
            window_size,
            config.ring_capacity(),
            config.display.db_min,
            config.display.db_max
        );

        Ok(Self {
            ring: RingBuffer::new(config.ring_capacity()),
            extractor: WindowExtractor::new(window_size),
            transform: Box::new(RealFft::new(window_size)),
            range: DbRange::new(config.display.db_min, config.display.db_max),
            metrics: PipelineMetrics::new(config.telemetry.log_every_n_windows),
            latest: None,
            source,
            config,
        })
    }

    /// Replace the transform stage.
    ///
    /// # Panics
    /// Panics if the transform was planned for a different window size
    pub fn with_transform(mut self, transform: Box<dyn Transform>) -> Self {
        assert_eq!(
            transform.window_size(),
            self.extractor.window_size(),
            "transform window size must match the extractor"
        );
        self.transform = transform;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn source(&self) -> &SampleSource {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut SampleSource {
        &mut self.source
    }

    pub fn ring(&self) -> &RingBuffer<f32> {
        &self.ring
    }

    /// The most recently derived frame
    pub fn latest(&self) -> Option<&SpectrumFrame> {
        self.latest.as_ref()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn frequency_labels(&self) -> Vec<AxisLabel> {
        axis::frequency_labels(self.config.audio.sample_rate, self.config.display.frequency_labels)
    }

    pub fn db_labels(&self) -> Vec<AxisLabel> {
        axis::db_labels(self.range, self.config.display.db_labels)
    }

    /// One consumer-thread iteration.
    ///
    /// Moves delivered samples into the ring and, on the live path, drains
    /// one window through the transform. Never blocks: with fewer than N
    /// samples buffered the tick is skipped and `Ok(None)` is returned.
    /// Recorded sources only produce frames through [`handle`](Self::handle).
    pub fn tick(&mut self) -> Result<Option<&SpectrumFrame>, SpectroError> {
        let resident = self.ring.len();
        let pumped = self.source.pump(&mut self.ring);

        if let SampleSource::Live(capture) = &self.source {
            self.metrics.record_transport(capture.stats());
        }
        let pumped = pumped?;
        if pumped > 0 {
            self.metrics
                .record_written(pumped, resident, self.ring.capacity());
        }

        let mode = self.source.extract_mode();
        if mode == ExtractMode::Peek {
            return Ok(None);
        }

        match self.analyze(mode) {
            Ok(()) => Ok(self.latest.as_ref()),
            Err(PipelineError::InsufficientData {
                requested,
                available,
            }) => {
                debug!(
                    "[SpectrumEngine] Skipping tick: {} of {} samples buffered",
                    available, requested
                );
                self.metrics.record_skip();
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Apply a control command.
    ///
    /// Advance and rewind return the new frame. Scrubbing past either edge
    /// reports `AtBoundary` and leaves the cursor and the last frame as they
    /// were. Commands that do not apply to the active source report
    /// `UnsupportedCommand`.
    pub fn handle(&mut self, command: Command) -> Result<Option<&SpectrumFrame>, SpectroError> {
        let resident = self.ring.len();
        let source_kind = self.source.kind();
        let unsupported = || -> SpectroError {
            PipelineError::UnsupportedCommand {
                command: command.name(),
                source: source_kind,
            }
            .into()
        };

        match (&mut self.source, command) {
            (SampleSource::Live(capture), Command::StartCapture) => {
                capture.start()?;
                self.ring.clear();
                Ok(None)
            }
            (SampleSource::Live(capture), Command::StopCapture) => {
                capture.stop();
                Ok(None)
            }
            (SampleSource::Live(capture), Command::TogglePause) => {
                let paused = capture.toggle_pause();
                info!("[SpectrumEngine] Capture {}", if paused { "paused" } else { "resumed" });
                Ok(None)
            }
            (SampleSource::Recorded(cursor), Command::Advance | Command::Rewind) => {
                let moved = if command == Command::Advance {
                    cursor.advance(&mut self.ring)
                } else {
                    cursor.rewind(&mut self.ring)
                };
                let window_size = cursor.window_size();
                if let Err(err) = moved {
                    info!("[SpectrumEngine] {} ignored: {}", command.name(), err.message());
                    return Err(err.into());
                }

                self.metrics
                    .record_written(window_size, resident, self.ring.capacity());
                // Peek reads from the oldest sample; only the window just
                // written may stay resident.
                self.ring.retain_newest(window_size);
                self.analyze(ExtractMode::Peek)?;
                Ok(self.latest.as_ref())
            }
            _ => Err(unsupported()),
        }
    }

    fn analyze(&mut self, mode: ExtractMode) -> Result<(), PipelineError> {
        let window_size = self.extractor.window_size();
        let window = self.extractor.extract(&mut self.ring, mode)?;
        let bins = self.transform.process(window);
        let frame = SpectrumFrame::derive(bins, window_size, self.range).map_err(|err| {
            log_pipeline_error(&err, "SpectrumEngine::analyze");
            err
        })?;

        self.latest = Some(frame);
        self.metrics.record_window();
        self.metrics
            .record_occupancy(self.ring.len(), self.ring.capacity());
        Ok(())
    }
}

#[cfg(test)]
mod tests;
