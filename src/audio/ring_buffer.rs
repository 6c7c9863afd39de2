// RingBuffer - fixed-capacity circular sample store with overwrite-on-overflow
//
// The buffer is owned by a single thread (the consumer). Samples produced on
// the audio callback thread reach it through the lock-free transport in
// `audio::transport`, so no cursor here is ever shared across threads.
//
// Layout:
//
//   data:  | . | s | x | x | x | e | . | . |
//                ^start            ^end        size = (end - start) mod C
//
// When `size == capacity`, `start == end` and the next write evicts the
// oldest element by advancing `start` along with `end`.

use crate::error::PipelineError;

/// Fixed-capacity ring buffer with overwrite-oldest semantics.
///
/// Writes never fail and never block: once full, each new element silently
/// replaces the oldest one. Reads of an empty buffer yield `T::default()`.
#[derive(Debug, Clone)]
pub struct RingBuffer<T>
where
    T: Copy + Default,
{
    data: Vec<T>,
    start: usize,
    end: usize,
    size: usize,
}

impl<T> RingBuffer<T>
where
    T: Copy + Default,
{
    /// Create a ring buffer holding at most `capacity` elements.
    ///
    /// # Panics
    /// Panics if `capacity` is 0
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");
        Self {
            data: vec![T::default(); capacity],
            start: 0,
            end: 0,
            size: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of elements currently resident.
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.size == self.capacity()
    }

    /// Read cursor (index of the oldest element).
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Write cursor (index the next write lands on).
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Drop all resident elements. Storage is kept.
    pub fn clear(&mut self) {
        self.start = 0;
        self.end = 0;
        self.size = 0;
    }

    /// Insert one element, evicting the oldest when full.
    #[inline]
    pub fn write(&mut self, value: T) {
        let capacity = self.capacity();
        self.data[self.end] = value;
        self.end = (self.end + 1) % capacity;

        if self.size < capacity {
            self.size += 1;
        } else {
            self.start = (self.start + 1) % capacity;
        }
    }

    /// Insert `values` in order with the same overwrite rule as [`write`].
    ///
    /// If `values` is longer than the capacity, only the most recent
    /// `capacity` elements survive.
    ///
    /// [`write`]: RingBuffer::write
    pub fn write_block(&mut self, values: &[T]) {
        let capacity = self.capacity();
        if values.is_empty() {
            return;
        }

        // Everything older than the last `capacity` values would be evicted
        // by this same call anyway.
        let values = if values.len() > capacity {
            &values[values.len() - capacity..]
        } else {
            values
        };

        let count = values.len();
        let first = count.min(capacity - self.end);
        self.data[self.end..self.end + first].copy_from_slice(&values[..first]);
        let second = count - first;
        if second > 0 {
            self.data[..second].copy_from_slice(&values[first..]);
        }
        self.end = (self.end + count) % capacity;

        let overflow = (self.size + count).saturating_sub(capacity);
        self.size = (self.size + count).min(capacity);
        if overflow > 0 {
            self.start = (self.start + overflow) % capacity;
        }
        debug_assert_eq!((self.start + self.size) % capacity, self.end);
    }

    /// Remove and return the oldest element, or `T::default()` when empty.
    ///
    /// Callers must check [`len`](RingBuffer::len) before relying on real data.
    #[inline]
    pub fn read(&mut self) -> T {
        if self.size == 0 {
            return T::default();
        }
        let value = self.data[self.start];
        self.start = (self.start + 1) % self.capacity();
        self.size -= 1;
        value
    }

    /// Copy the oldest `out.len()` elements into `out` without consuming them.
    ///
    /// The copy follows the single wrap-around split of the circular layout:
    /// up to the end of the backing array first, then from index 0.
    pub fn peek_into(&self, out: &mut [T]) -> Result<(), PipelineError> {
        let count = out.len();
        if count > self.size {
            return Err(PipelineError::InsufficientData {
                requested: count,
                available: self.size,
            });
        }

        let first = count.min(self.capacity() - self.start);
        out[..first].copy_from_slice(&self.data[self.start..self.start + first]);
        let second = count - first;
        if second > 0 {
            out[first..].copy_from_slice(&self.data[..second]);
        }
        Ok(())
    }

    /// Copy the oldest `out.len()` elements into `out` and consume them.
    pub fn read_into(&mut self, out: &mut [T]) -> Result<(), PipelineError> {
        self.peek_into(out)?;
        self.consume(out.len());
        Ok(())
    }

    /// Remove and return the oldest `count` elements.
    ///
    /// Never returns a partial block: fewer than `count` resident elements is
    /// reported as `InsufficientData` and the buffer is left untouched.
    pub fn read_block(&mut self, count: usize) -> Result<Vec<T>, PipelineError> {
        let mut block = vec![T::default(); count];
        self.read_into(&mut block)?;
        Ok(block)
    }

    /// Resident elements, oldest first.
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = vec![T::default(); self.size];
        // size elements are always resident
        let _ = self.peek_into(&mut out);
        out
    }

    /// Drop the oldest elements so that at most `count` remain.
    pub fn retain_newest(&mut self, count: usize) {
        if self.size > count {
            self.consume(self.size - count);
        }
    }

    fn consume(&mut self, count: usize) {
        debug_assert!(count <= self.size);
        self.start = (self.start + count) % self.capacity();
        self.size -= count;
    }
}
