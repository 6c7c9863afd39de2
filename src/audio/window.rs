//! Window extraction - fixed-size, contiguous blocks for the transform stage
//!
//! The extractor owns the transform-ready buffer and fills it from a
//! [`RingBuffer`] in one of two modes:
//!
//! - [`ExtractMode::Drain`] is used on the live-capture path: every window is
//!   consumed from the ring before it is handed to the transform, so the next
//!   window is made only of newer samples.
//! - [`ExtractMode::Peek`] is used on the recorded-cursor path: the cursor,
//!   not the ring, owns position advancement, so extraction leaves the ring's
//!   cursors untouched.

use serde::{Deserialize, Serialize};

use super::ring_buffer::RingBuffer;
use crate::error::PipelineError;

/// Whether extraction consumes the samples it copies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractMode {
    /// Copy without moving the ring's read cursor
    Peek,
    /// Copy and consume
    Drain,
}

/// Pulls exactly `N` contiguous samples out of a ring buffer.
#[derive(Debug, Clone)]
pub struct WindowExtractor<T = f32>
where
    T: Copy + Default,
{
    window: Vec<T>,
}

impl<T> WindowExtractor<T>
where
    T: Copy + Default,
{
    /// # Panics
    /// Panics if `window_size` is 0
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "window_size must be greater than 0");
        Self {
            window: vec![T::default(); window_size],
        }
    }

    pub fn window_size(&self) -> usize {
        self.window.len()
    }

    /// The last successfully extracted window.
    pub fn window(&self) -> &[T] {
        &self.window
    }

    /// Fill the window from `ring`.
    ///
    /// Fails with `InsufficientData` when fewer than `N` samples are
    /// resident; in that case neither the window nor the ring is modified.
    ///
    /// # Panics
    /// Panics if the window is larger than the ring's capacity, since such a
    /// window could never be filled.
    pub fn extract(
        &mut self,
        ring: &mut RingBuffer<T>,
        mode: ExtractMode,
    ) -> Result<&[T], PipelineError> {
        assert!(
            self.window.len() <= ring.capacity(),
            "window size {} exceeds ring capacity {}",
            self.window.len(),
            ring.capacity()
        );

        match mode {
            ExtractMode::Peek => ring.peek_into(&mut self.window)?,
            ExtractMode::Drain => ring.read_into(&mut self.window)?,
        }
        Ok(&self.window)
    }
}
