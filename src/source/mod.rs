//! Sample sources feeding the consumer's ring buffer.
//!
//! | Source            | Producer thread         | Extraction mode        |
//! |-------------------|-------------------------|------------------------|
//! | [`LiveCapture`]   | audio subsystem callback| [`ExtractMode::Drain`] |
//! | [`RecordedCursor`]| consumer (on command)   | [`ExtractMode::Peek`]  |

pub mod live;
pub mod recorded;

pub use live::{CaptureState, LiveCapture};
pub use recorded::{load_raw_file, load_wav_file, read_raw_samples, LoadedSamples, RecordedCursor};

use crate::audio::ring_buffer::RingBuffer;
use crate::audio::window::ExtractMode;
use crate::error::AudioError;

/// The active producer of samples
pub enum SampleSource {
    Live(LiveCapture),
    Recorded(RecordedCursor),
}

impl SampleSource {
    pub fn kind(&self) -> &'static str {
        match self {
            SampleSource::Live(_) => "live",
            SampleSource::Recorded(_) => "recorded",
        }
    }

    /// How windows are taken from the ring for this source.
    pub fn extract_mode(&self) -> ExtractMode {
        match self {
            SampleSource::Live(_) => ExtractMode::Drain,
            SampleSource::Recorded(_) => ExtractMode::Peek,
        }
    }

    /// Move any asynchronously produced samples into `ring`.
    ///
    /// Recorded data only enters the ring on explicit advance/rewind, so
    /// this is a no-op for [`SampleSource::Recorded`].
    pub fn pump(&mut self, ring: &mut RingBuffer<f32>) -> Result<usize, AudioError> {
        match self {
            SampleSource::Live(capture) => capture.pump(ring),
            SampleSource::Recorded(_) => Ok(0),
        }
    }
}

impl From<LiveCapture> for SampleSource {
    fn from(capture: LiveCapture) -> Self {
        SampleSource::Live(capture)
    }
}

impl From<RecordedCursor> for SampleSource {
    fn from(cursor: RecordedCursor) -> Self {
        SampleSource::Recorded(cursor)
    }
}
