// Spectrum module - per-window magnitude and dB view
//
// Derivation is a pure function of the complex bins, the window size and
// the display range:
//
//   magnitude[k] = sqrt(re^2 + im^2)
//   db[k]        = 20 * log10(2 * magnitude[k] / N)
//   clamped[k]   = clamp(db[k], dB_min, dB_max)
//
// Silent bins give -inf before clamping and dB_min after.

use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Display range in dB
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DbRange {
    pub min: f32,
    pub max: f32,
}

impl DbRange {
    /// # Panics
    /// Panics unless `min < max`
    pub fn new(min: f32, max: f32) -> Self {
        assert!(min < max, "dB range min {} must be below max {}", min, max);
        Self { min, max }
    }

    /// Clamp into the range; NaN maps to `min`.
    pub fn clamp(&self, db: f32) -> f32 {
        if db.is_nan() {
            self.min
        } else {
            db.clamp(self.min, self.max)
        }
    }

    /// Position of a clamped value within the range, 0.0 at `min`, 1.0 at `max`
    pub fn fill_ratio(&self, clamped_db: f32) -> f32 {
        (self.clamp(clamped_db) - self.min) / (self.max - self.min)
    }
}

impl Default for DbRange {
    fn default() -> Self {
        Self::new(-80.0, 0.0)
    }
}

/// Magnitude and dB per frequency bin for one window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumFrame {
    pub window_size: usize,
    pub range: DbRange,
    pub magnitudes: Vec<f32>,
    /// Unclamped dB (may hold -inf)
    pub db: Vec<f32>,
    pub clamped_db: Vec<f32>,
}

impl SpectrumFrame {
    /// Derive the frame from transform output.
    ///
    /// Only the first `N/2 + 1` bins are used; a transform that returns the
    /// full mirrored spectrum is accepted.
    ///
    /// # Errors
    /// `BinCountMismatch` if fewer than `N/2 + 1` bins are supplied
    pub fn derive(
        bins: &[Complex<f32>],
        window_size: usize,
        range: DbRange,
    ) -> Result<Self, PipelineError> {
        let expected = window_size / 2 + 1;
        if window_size == 0 || bins.len() < expected {
            return Err(PipelineError::BinCountMismatch {
                expected,
                actual: bins.len(),
            });
        }

        let n = window_size as f64;
        let mut magnitudes = Vec::with_capacity(expected);
        let mut db = Vec::with_capacity(expected);
        let mut clamped_db = Vec::with_capacity(expected);

        for bin in &bins[..expected] {
            let re = bin.re as f64;
            let im = bin.im as f64;
            let magnitude = (re * re + im * im).sqrt();
            let level = (20.0 * (2.0 * magnitude / n).log10()) as f32;

            magnitudes.push(magnitude as f32);
            db.push(level);
            clamped_db.push(range.clamp(level));
        }

        Ok(Self {
            window_size,
            range,
            magnitudes,
            db,
            clamped_db,
        })
    }

    pub fn bin_count(&self) -> usize {
        self.magnitudes.len()
    }

    /// Bar heights in `[0, 1]`, one per bin
    pub fn fill_ratios(&self) -> Vec<f32> {
        self.clamped_db
            .iter()
            .map(|&db| self.range.fill_ratio(db))
            .collect()
    }

    /// Bin index and magnitude of the strongest bin
    pub fn peak(&self) -> Option<(usize, f32)> {
        self.magnitudes
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (bin, magnitude)| match best {
                Some((_, top)) if top >= magnitude => best,
                _ => Some((bin, magnitude)),
            })
    }
}
