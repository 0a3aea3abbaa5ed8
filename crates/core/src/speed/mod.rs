//! Throughput and ETA estimation for in-flight uploads.
//!
//! The estimator keeps a small fixed-capacity window of `(timestamp, bytes)`
//! samples per item and derives a smoothed rate from the window endpoints.
//! Timestamps are injected by the caller so estimates are deterministic under
//! test.

mod format;

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use format::{format_bytes, format_duration};

/// Default number of samples kept per item.
pub const DEFAULT_WINDOW_CAPACITY: usize = 5;

/// A raw progress sample. Never leaves the estimator's window.
#[derive(Debug, Clone, Copy)]
struct SpeedSample {
    timestamp: DateTime<Utc>,
    loaded_bytes: u64,
}

#[derive(Debug, Default)]
struct ItemWindow {
    samples: VecDeque<SpeedSample>,
    total_bytes: u64,
}

/// Smoothed throughput estimate for one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedEstimate {
    /// Bytes per second over the current window.
    pub bytes_per_second: f64,
    /// Estimated seconds remaining; `None` when the rate is zero.
    pub eta_seconds: Option<f64>,
}

/// Sliding-window throughput/ETA calculator, keyed by item id.
#[derive(Debug)]
pub struct SpeedEstimator {
    capacity: usize,
    windows: HashMap<Uuid, ItemWindow>,
}

impl SpeedEstimator {
    /// Creates an estimator with the given per-item window capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(2),
            windows: HashMap::new(),
        }
    }

    /// Records a progress observation for an item.
    ///
    /// Once the window is full the oldest sample is evicted (FIFO).
    pub fn observe(
        &mut self,
        item_id: Uuid,
        loaded_bytes: u64,
        total_bytes: u64,
        now: DateTime<Utc>,
    ) {
        let window = self.windows.entry(item_id).or_default();
        window.total_bytes = total_bytes;
        window.samples.push_back(SpeedSample {
            timestamp: now,
            loaded_bytes,
        });
        while window.samples.len() > self.capacity {
            window.samples.pop_front();
        }
    }

    /// Drops all samples for an item.
    ///
    /// Must be called when a new file is attached so samples from a previous
    /// file never bleed into the next upload's estimate.
    pub fn reset(&mut self, item_id: Uuid) {
        self.windows.remove(&item_id);
    }

    /// Returns the current estimate for an item.
    ///
    /// `None` with fewer than two samples or when no time has elapsed
    /// between the window endpoints; never zero or NaN in those cases.
    pub fn estimate(&self, item_id: Uuid) -> Option<SpeedEstimate> {
        let window = self.windows.get(&item_id)?;
        let oldest = window.samples.front()?;
        let newest = window.samples.back()?;
        if window.samples.len() < 2 {
            return None;
        }

        let elapsed_ms = newest
            .timestamp
            .signed_duration_since(oldest.timestamp)
            .num_milliseconds();
        if elapsed_ms <= 0 {
            return None;
        }

        let transferred = newest.loaded_bytes.saturating_sub(oldest.loaded_bytes);
        let bytes_per_second = transferred as f64 / (elapsed_ms as f64 / 1000.0);

        let eta_seconds = if bytes_per_second > 0.0 {
            let remaining = window.total_bytes.saturating_sub(newest.loaded_bytes);
            Some(remaining as f64 / bytes_per_second)
        } else {
            None
        };

        Some(SpeedEstimate {
            bytes_per_second,
            eta_seconds,
        })
    }

    /// Number of items with sample state, for test assertions.
    pub fn tracked_items(&self) -> usize {
        self.windows.len()
    }
}

impl Default for SpeedEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        "2026-01-15T10:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_no_samples_yields_none() {
        let estimator = SpeedEstimator::default();
        assert!(estimator.estimate(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_single_sample_yields_none() {
        let mut estimator = SpeedEstimator::default();
        let id = Uuid::new_v4();
        estimator.observe(id, 1000, 10_000, t0());
        assert!(estimator.estimate(id).is_none());
    }

    #[test]
    fn test_two_samples_yield_rate_and_eta() {
        let mut estimator = SpeedEstimator::default();
        let id = Uuid::new_v4();
        estimator.reset(id);
        estimator.observe(id, 0, 1_000_000, t0());
        estimator.observe(id, 500_000, 1_000_000, t0() + Duration::seconds(2));

        let estimate = estimator.estimate(id).unwrap();
        assert_eq!(estimate.bytes_per_second, 250_000.0);
        assert_eq!(estimate.eta_seconds, Some(2.0));
    }

    #[test]
    fn test_zero_elapsed_yields_none() {
        let mut estimator = SpeedEstimator::default();
        let id = Uuid::new_v4();
        estimator.observe(id, 0, 1_000, t0());
        estimator.observe(id, 500, 1_000, t0());
        assert!(estimator.estimate(id).is_none());
    }

    #[test]
    fn test_stalled_transfer_has_no_eta() {
        let mut estimator = SpeedEstimator::default();
        let id = Uuid::new_v4();
        estimator.observe(id, 500, 1_000, t0());
        estimator.observe(id, 500, 1_000, t0() + Duration::seconds(5));

        let estimate = estimator.estimate(id).unwrap();
        assert_eq!(estimate.bytes_per_second, 0.0);
        assert!(estimate.eta_seconds.is_none());
    }

    #[test]
    fn test_window_evicts_oldest_fifo() {
        let mut estimator = SpeedEstimator::new(3);
        let id = Uuid::new_v4();
        // First sample is slow; once evicted only the fast tail remains.
        estimator.observe(id, 0, 10_000, t0());
        estimator.observe(id, 100, 10_000, t0() + Duration::seconds(10));
        estimator.observe(id, 1_100, 10_000, t0() + Duration::seconds(11));
        estimator.observe(id, 2_100, 10_000, t0() + Duration::seconds(12));

        let estimate = estimator.estimate(id).unwrap();
        // Window endpoints are now (100 @ 10s) and (2100 @ 12s).
        assert_eq!(estimate.bytes_per_second, 1_000.0);
    }

    #[test]
    fn test_reset_clears_samples() {
        let mut estimator = SpeedEstimator::default();
        let id = Uuid::new_v4();
        estimator.observe(id, 0, 1_000, t0());
        estimator.observe(id, 500, 1_000, t0() + Duration::seconds(1));
        assert!(estimator.estimate(id).is_some());

        estimator.reset(id);
        assert!(estimator.estimate(id).is_none());
        assert_eq!(estimator.tracked_items(), 0);
    }

    #[test]
    fn test_items_are_tracked_independently() {
        let mut estimator = SpeedEstimator::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        estimator.observe(a, 0, 1_000, t0());
        estimator.observe(a, 100, 1_000, t0() + Duration::seconds(1));
        estimator.observe(b, 0, 1_000, t0());

        assert!(estimator.estimate(a).is_some());
        assert!(estimator.estimate(b).is_none());
        estimator.reset(a);
        assert!(estimator.estimate(a).is_none());
        assert_eq!(estimator.tracked_items(), 1);
    }
}
