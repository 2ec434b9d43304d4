//! In-memory latency histogram for the scrape pipeline.
//!
//! One sample per successful `GET /api/fetchAllShipData`: the wall-clock
//! time of the four concurrent filter fetches plus aggregation. A run where
//! some filters failed still counts, since it produced a payload. Runs that
//! return 500 are not recorded, and neither are rejected methods.

use std::sync::Mutex;
use std::time::Duration;

/// Shared run latency, in milliseconds. The ship-data handler records and
/// `/stats/latency` reads. Upstream timeouts cap a run at roughly the client
/// timeout, well under the 10 minute ceiling.
pub struct LatencyStats {
    inner: Mutex<hdrhistogram::Histogram<u64>>,
}

impl LatencyStats {
    /// Tracks 1ms to 10min, 3 significant figures.
    pub fn new() -> Self {
        let histogram = hdrhistogram::Histogram::new_with_bounds(1, 600_000, 3)
            .expect("valid histogram bounds");
        Self {
            inner: Mutex::new(histogram),
        }
    }

    /// Sub-millisecond runs count as 1ms; anything past the ceiling saturates.
    pub fn record_ms(&self, ms: u64) {
        if let Ok(mut h) = self.inner.lock() {
            h.saturating_record(ms.max(1));
        }
    }

    pub fn record(&self, d: Duration) {
        let ms = d.as_millis().min(u128::from(u64::MAX)) as u64;
        self.record_ms(ms);
    }

    /// (p50, p95, p99) run latency in ms. All None before the first run.
    pub fn percentiles(&self) -> (Option<u64>, Option<u64>, Option<u64>) {
        let Ok(h) = self.inner.lock() else {
            return (None, None, None);
        };
        if h.len() == 0 {
            return (None, None, None);
        }
        let p50 = h.value_at_quantile(0.5);
        let p95 = h.value_at_quantile(0.95);
        let p99 = h.value_at_quantile(0.99);
        (Some(p50), Some(p95), Some(p99))
    }

    /// Successful runs recorded so far.
    pub fn len(&self) -> u64 {
        self.inner.lock().map(|h| h.len()).unwrap_or(0)
    }
}

impl Default for LatencyStats {
    fn default() -> Self {
        Self::new()
    }
}
