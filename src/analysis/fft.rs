// FFT module - real-input forward transform
//
// The pipeline hands the transform exactly N real samples and expects
// N/2 + 1 complex bins back (DC through Nyquist). No window function is
// applied; the samples are transformed as extracted.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Forward transform from a real window to complex frequency bins
pub trait Transform {
    /// Window size N this transform was planned for
    fn window_size(&self) -> usize;

    /// Transform `window` (exactly N samples) into `N/2 + 1` bins.
    fn process(&mut self, window: &[f32]) -> &[Complex<f32>];
}

/// rustfft-backed transform, planned once at construction
pub struct RealFft {
    fft: Arc<dyn Fft<f32>>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl RealFft {
    /// # Panics
    /// Panics if `window_size` is 0
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "window_size must be greater than 0");
        let fft = FftPlanner::new().plan_fft_forward(window_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        Self {
            fft,
            buffer: vec![Complex::new(0.0, 0.0); window_size],
            scratch,
        }
    }
}

impl Transform for RealFft {
    fn window_size(&self) -> usize {
        self.buffer.len()
    }

    fn process(&mut self, window: &[f32]) -> &[Complex<f32>] {
        assert_eq!(
            window.len(),
            self.buffer.len(),
            "transform expects exactly {} samples",
            self.buffer.len()
        );

        for (slot, &sample) in self.buffer.iter_mut().zip(window) {
            *slot = Complex::new(sample, 0.0);
        }
        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        &self.buffer[..self.buffer.len() / 2 + 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_count() {
        let mut fft = RealFft::new(1024);
        assert_eq!(fft.process(&[0.0; 1024]).len(), 513);

        let mut fft = RealFft::new(8);
        assert_eq!(fft.process(&[0.0; 8]).len(), 5);
    }

    #[test]
    fn test_dc_input() {
        let mut fft = RealFft::new(16);
        let bins = fft.process(&[1.0; 16]);
        assert!((bins[0].re - 16.0).abs() < 1e-4);
        assert!(bins[1..].iter().all(|c| c.norm() < 1e-4));
    }

    #[test]
    fn test_sine_lands_in_its_bin() {
        let n = 1024;
        let window: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * 64.0 * i as f32 / n as f32).sin())
            .collect();

        let mut fft = RealFft::new(n);
        let bins = fft.process(&window);
        assert!((bins[64].norm() - 512.0).abs() < 0.5);
        assert!(bins[63].norm() < 0.5);
        assert!(bins[65].norm() < 0.5);
    }

    #[test]
    #[should_panic(expected = "transform expects exactly 8 samples")]
    fn test_wrong_length_panics() {
        let mut fft = RealFft::new(8);
        fft.process(&[0.0; 4]);
    }
}
