//! RecordedCursor - scrubbing over pre-loaded samples
//!
//! The cursor owns an immutable array of samples and a block-aligned
//! position. Each advance copies the next window into the ring; each rewind
//! steps back two windows and re-advances one, which yields the window
//! before the one currently shown.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use hound::{SampleFormat, WavReader};
use log::{debug, info};

use crate::audio::ring_buffer::RingBuffer;
use crate::error::{log_pipeline_error, Edge, PipelineError};

/// Samples produced by one of the loaders.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSamples {
    pub samples: Vec<f32>,
    /// Number of samples the source was expected to hold
    pub expected: usize,
}

impl LoadedSamples {
    /// `ShortRead` if fewer samples were loaded than expected.
    pub fn short_read(&self) -> Option<PipelineError> {
        (self.samples.len() < self.expected).then(|| PipelineError::ShortRead {
            expected: self.expected,
            loaded: self.samples.len(),
        })
    }

    fn report(self, origin: &str) -> Self {
        match self.short_read() {
            Some(err) => log_pipeline_error(&err, origin),
            None => info!(
                "[RecordedCursor] Loaded {} samples from {}",
                self.samples.len(),
                origin
            ),
        }
        self
    }
}

/// Read up to `expected` little-endian `f32` samples from `reader`.
///
/// Stops early at end of input; trailing bytes that do not form a whole
/// sample are discarded. A short read is logged, not returned as an error.
pub fn read_raw_samples<R: Read>(reader: R, expected: usize) -> io::Result<LoadedSamples> {
    let mut bytes = Vec::new();
    reader
        .take(expected.saturating_mul(4) as u64)
        .read_to_end(&mut bytes)?;

    let samples = bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok(LoadedSamples { samples, expected }.report("raw stream"))
}

/// Load a flat binary file of little-endian `f32` samples.
pub fn load_raw_file<P: AsRef<Path>>(path: P, expected: usize) -> io::Result<LoadedSamples> {
    let file = File::open(&path)?;
    let loaded = read_raw_samples(BufReader::new(file), expected)?;
    debug!("[RecordedCursor] Raw file {:?}", path.as_ref());
    Ok(loaded)
}

/// Load a WAV file, keeping the first channel.
///
/// Integer formats are normalized to `[-1.0, 1.0]`. A file whose data chunk
/// is truncated yields the samples decoded before the truncation.
pub fn load_wav_file<P: AsRef<Path>>(path: P) -> io::Result<LoadedSamples> {
    let mut reader = WavReader::open(&path).map_err(wav_error)?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;
    let expected = reader.duration() as usize;

    let decoded: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map_while(Result::ok)
            .step_by(channels)
            .collect(),
        SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .samples::<i32>()
                .map_while(Result::ok)
                .step_by(channels)
                .map(|s| s as f32 / scale)
                .collect()
        }
    };

    info!(
        "[RecordedCursor] WAV {:?}: {} Hz, {} channel(s), {} bits",
        path.as_ref(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample
    );
    Ok(LoadedSamples {
        samples: decoded,
        expected,
    }
    .report("wav file"))
}

fn wav_error(err: hound::Error) -> io::Error {
    match err {
        hound::Error::IoError(err) => err,
        other => io::Error::new(io::ErrorKind::InvalidData, other),
    }
}

/// Block-aligned cursor over recorded samples
#[derive(Debug, Clone)]
pub struct RecordedCursor {
    samples: Vec<f32>,
    window_size: usize,
    position: usize,
}

impl RecordedCursor {
    /// # Panics
    /// Panics if `window_size` is 0
    pub fn new(samples: Vec<f32>, window_size: usize) -> Self {
        assert!(window_size > 0, "window_size must be greater than 0");
        Self {
            samples,
            window_size,
            position: 0,
        }
    }

    /// Cursor over whatever a loader returned, short or not.
    pub fn from_loaded(loaded: LoadedSamples, window_size: usize) -> Self {
        Self::new(loaded.samples, window_size)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Number of recorded samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Copy the next window into `ring` and move forward by one window.
    ///
    /// Returns the new position. At the end of the data this is a no-op that
    /// reports `AtBoundary`; nothing is written.
    pub fn advance(&mut self, ring: &mut RingBuffer<f32>) -> Result<usize, PipelineError> {
        let n = self.window_size;
        if self.position + n > self.samples.len() {
            return Err(PipelineError::AtBoundary {
                edge: Edge::End,
                position: self.position,
            });
        }

        ring.write_block(&self.samples[self.position..self.position + n]);
        self.position += n;
        debug!("[RecordedCursor] Advanced to {}", self.position);
        Ok(self.position)
    }

    /// Step back to the window before the one last shown.
    ///
    /// Requires at least two windows behind the cursor; otherwise a no-op
    /// that reports `AtBoundary`.
    pub fn rewind(&mut self, ring: &mut RingBuffer<f32>) -> Result<usize, PipelineError> {
        let n = self.window_size;
        if self.position < 2 * n {
            return Err(PipelineError::AtBoundary {
                edge: Edge::Start,
                position: self.position,
            });
        }

        // position <= len, so the window at position - 2N always fits
        self.position -= 2 * n;
        self.advance(ring)
    }
}
