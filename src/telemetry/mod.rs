//! Pipeline metrics.
//!
//! Counters are owned by the consumer thread and updated once per tick; the
//! callback side reports through [`TransportSnapshot`] instead. A summary is
//! logged every `log_every_n_windows` emitted windows.

use log::info;
use serde::{Deserialize, Serialize};

use crate::audio::transport::TransportSnapshot;

/// Point-in-time copy of the pipeline counters for CLI/JSON reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub windows_emitted: u64,
    /// Ticks that found fewer than N samples buffered
    pub ticks_skipped: u64,
    /// Samples moved into the ring (pumped or copied by the cursor)
    pub samples_written: u64,
    /// Samples the ring evicted to make room for newer ones
    pub samples_overwritten: u64,
    /// Samples the callback could not hand over because the transport was full
    pub samples_dropped: u64,
    pub callback_deliveries: u64,
    /// Ring occupancy after the last tick, 0-100
    pub ring_occupancy_percent: f32,
}

/// Consumer-side counters
#[derive(Debug, Clone)]
pub struct PipelineMetrics {
    current: MetricsSnapshot,
    log_every_n_windows: u64,
}

impl PipelineMetrics {
    pub fn new(log_every_n_windows: u64) -> Self {
        Self {
            current: MetricsSnapshot::default(),
            log_every_n_windows,
        }
    }

    /// Record `written` samples entering a ring that held `resident_before`
    /// of `capacity` slots.
    pub fn record_written(&mut self, written: usize, resident_before: usize, capacity: usize) {
        let free = capacity.saturating_sub(resident_before);
        self.current.samples_written += written as u64;
        self.current.samples_overwritten += written.saturating_sub(free) as u64;
    }

    pub fn record_skip(&mut self) {
        self.current.ticks_skipped += 1;
    }

    /// Count an emitted window and log a summary on the configured cadence.
    pub fn record_window(&mut self) {
        self.current.windows_emitted += 1;
        if self.log_every_n_windows > 0
            && self.current.windows_emitted % self.log_every_n_windows == 0
        {
            self.log_summary();
        }
    }

    pub fn record_occupancy(&mut self, len: usize, capacity: usize) {
        self.current.ring_occupancy_percent = if capacity == 0 {
            0.0
        } else {
            (len as f32 / capacity as f32 * 100.0).clamp(0.0, 100.0)
        };
    }

    pub fn record_transport(&mut self, transport: TransportSnapshot) {
        self.current.samples_dropped = transport.samples_dropped;
        self.current.callback_deliveries = transport.deliveries;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.current
    }

    pub fn log_summary(&self) {
        let m = &self.current;
        info!(
            "[Telemetry] windows={} skipped={} written={} overwritten={} dropped={} deliveries={} ring={:.0}%",
            m.windows_emitted,
            m.ticks_skipped,
            m.samples_written,
            m.samples_overwritten,
            m.samples_dropped,
            m.callback_deliveries,
            m.ring_occupancy_percent
        );
    }
}
