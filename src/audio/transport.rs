// Sample transport - lock-free SPSC hand-off from the capture callback thread
//
// The audio subsystem invokes the capture callback on a thread this crate
// does not control. That thread never touches the consumer's RingBuffer.
// Instead it pushes into an rtrb queue (wait-free on both ends) and the
// consumer drains the queue into its ring at the start of each tick:
//
//   callback thread:  frames ──push──> [ rtrb SPSC queue ]
//   consumer thread:                   [ rtrb SPSC queue ] ──drain──> RingBuffer
//
// Overwrite-oldest happens in the RingBuffer. If the queue itself fills up
// (the consumer stalled for longer than the configured headroom), incoming
// samples are dropped and counted; ordering is never violated.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rtrb::{Consumer, Producer};
use serde::{Deserialize, Serialize};

use super::ring_buffer::RingBuffer;

/// Counters shared between the callback thread and the consumer.
///
/// All updates are `Relaxed`: the counters are informational and never used
/// to synchronize sample data (rtrb does that).
#[derive(Debug, Default)]
pub struct TransportStats {
    deliveries: AtomicU64,
    samples_pushed: AtomicU64,
    samples_dropped: AtomicU64,
}

/// Point-in-time copy of [`TransportStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportSnapshot {
    pub deliveries: u64,
    pub samples_pushed: u64,
    pub samples_dropped: u64,
}

impl TransportStats {
    pub fn record_delivery(&self) {
        self.deliveries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> TransportSnapshot {
        TransportSnapshot {
            deliveries: self.deliveries.load(Ordering::Relaxed),
            samples_pushed: self.samples_pushed.load(Ordering::Relaxed),
            samples_dropped: self.samples_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Create a transport able to hold `capacity` samples in flight.
///
/// # Panics
/// Panics if `capacity` is 0
pub fn channel(capacity: usize, stats: Arc<TransportStats>) -> (SampleProducer, SampleConsumer) {
    assert!(capacity > 0, "transport capacity must be greater than 0");
    let (producer, consumer) = rtrb::RingBuffer::new(capacity);
    (
        SampleProducer {
            producer,
            stats: Arc::clone(&stats),
        },
        SampleConsumer { consumer, stats },
    )
}

/// Callback-thread half of the transport.
///
/// Every method is wait-free and allocation-free.
pub struct SampleProducer {
    producer: Producer<f32>,
    stats: Arc<TransportStats>,
}

impl SampleProducer {
    /// Push as many samples as fit; the rest are counted as dropped.
    ///
    /// Returns the number of samples accepted.
    pub fn push_slice(&mut self, samples: &[f32]) -> usize {
        let accepted = samples.len().min(self.producer.slots());
        if accepted > 0 {
            if let Ok(chunk) = self.producer.write_chunk_uninit(accepted) {
                chunk.fill_from_iter(samples[..accepted].iter().copied());
            }
        }
        self.account(samples.len(), accepted);
        accepted
    }

    /// Push `count` zero samples.
    pub fn push_silence(&mut self, count: usize) -> usize {
        let accepted = count.min(self.producer.slots());
        if accepted > 0 {
            if let Ok(chunk) = self.producer.write_chunk_uninit(accepted) {
                chunk.fill_from_iter(std::iter::repeat(0.0_f32));
            }
        }
        self.account(count, accepted);
        accepted
    }

    fn account(&self, requested: usize, accepted: usize) {
        self.stats
            .samples_pushed
            .fetch_add(accepted as u64, Ordering::Relaxed);
        if requested > accepted {
            self.stats
                .samples_dropped
                .fetch_add((requested - accepted) as u64, Ordering::Relaxed);
        }
    }
}

/// Consumer-thread half of the transport.
pub struct SampleConsumer {
    consumer: Consumer<f32>,
    stats: Arc<TransportStats>,
}

impl SampleConsumer {
    /// Samples waiting to be drained.
    pub fn pending(&self) -> usize {
        self.consumer.slots()
    }

    /// Move every pending sample into `ring`, oldest first.
    ///
    /// Returns the number of samples moved.
    pub fn drain_into(&mut self, ring: &mut RingBuffer<f32>) -> usize {
        let available = self.consumer.slots();
        if available == 0 {
            return 0;
        }
        match self.consumer.read_chunk(available) {
            Ok(chunk) => {
                let (first, second) = chunk.as_slices();
                ring.write_block(first);
                ring.write_block(second);
                chunk.commit_all();
                available
            }
            Err(_) => 0,
        }
    }

    pub fn stats(&self) -> TransportSnapshot {
        self.stats.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_cross_in_order() {
        let stats = Arc::new(TransportStats::default());
        let (mut tx, mut rx) = channel(16, stats);
        assert_eq!(tx.push_slice(&[1.0, 2.0, 3.0]), 3);
        assert_eq!(tx.push_silence(2), 2);
        assert_eq!(rx.pending(), 5);

        let mut ring = RingBuffer::new(8);
        assert_eq!(rx.drain_into(&mut ring), 5);
        assert_eq!(ring.to_vec(), vec![1.0, 2.0, 3.0, 0.0, 0.0]);
        assert_eq!(rx.pending(), 0);
    }

    #[test]
    fn test_full_queue_drops_and_counts() {
        let stats = Arc::new(TransportStats::default());
        let (mut tx, mut rx) = channel(4, Arc::clone(&stats));
        assert_eq!(tx.push_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), 4);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.samples_pushed, 4);
        assert_eq!(snapshot.samples_dropped, 2);

        let mut ring = RingBuffer::new(4);
        rx.drain_into(&mut ring);
        assert_eq!(ring.to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_drain_applies_ring_overwrite() {
        let stats = Arc::new(TransportStats::default());
        let (mut tx, mut rx) = channel(32, stats);
        let samples: Vec<f32> = (0..12).map(|v| v as f32).collect();
        tx.push_slice(&samples);

        let mut ring = RingBuffer::new(8);
        rx.drain_into(&mut ring);
        assert_eq!(ring.to_vec(), (4..12).map(|v| v as f32).collect::<Vec<_>>());
    }

    #[test]
    fn test_cross_thread_order() {
        let stats = Arc::new(TransportStats::default());
        let (mut tx, mut rx) = channel(64, stats);
        let producer = std::thread::spawn(move || {
            let mut next = 0.0_f32;
            let mut sent = 0;
            while sent < 1000 {
                let len = 10usize.min(1000 - sent);
                let block: Vec<f32> = (0..len).map(|i| next + i as f32).collect();
                let accepted = tx.push_slice(&block);
                next += accepted as f32;
                sent += accepted;
                if accepted < block.len() {
                    std::thread::yield_now();
                }
            }
        });

        let mut ring = RingBuffer::new(1000);
        while ring.len() < 1000 {
            rx.drain_into(&mut ring);
            std::thread::yield_now();
        }
        producer.join().unwrap();
        assert_eq!(
            ring.to_vec(),
            (0..1000).map(|v| v as f32).collect::<Vec<_>>()
        );
    }
}
