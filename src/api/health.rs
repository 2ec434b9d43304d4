//! Shared health state for the /health endpoint.
//! Updated by the ship-data handler after each successful pipeline run;
//! runs that fail before producing a payload are not counted.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct HealthState {
    /// Completed pipeline runs since startup.
    pub runs_total: AtomicU64,
    /// Unix seconds of the last completed run (0 = none).
    pub last_run_at_secs: AtomicU64,
    /// Filters that came back as errors in the last run.
    pub last_failed_filters: AtomicU64,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_run(&self, at_secs: u64, failed_filters: usize) {
        self.runs_total.fetch_add(1, Ordering::Relaxed);
        self.last_run_at_secs.store(at_secs, Ordering::Relaxed);
        self.last_failed_filters
            .store(failed_filters as u64, Ordering::Relaxed);
    }

    pub fn runs_total(&self) -> u64 {
        self.runs_total.load(Ordering::Relaxed)
    }

    pub fn last_run_at_secs(&self) -> u64 {
        self.last_run_at_secs.load(Ordering::Relaxed)
    }

    pub fn last_failed_filters(&self) -> u64 {
        self.last_failed_filters.load(Ordering::Relaxed)
    }
}
