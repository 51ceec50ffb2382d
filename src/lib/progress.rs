//! Progress tracking utilities
//!
//! This module provides a progress tracker for logging throughput at regular
//! intervals while streaming records. The tracker maintains an internal count
//! and logs when interval boundaries are crossed.

use log::info;
use std::time::Instant;

use crate::logging::{format_count, format_rate};

/// Progress tracker that logs elapsed time and throughput at interval
/// boundaries.
///
/// # Example
/// ```
/// use pairclass_lib::progress::ProgressTracker;
///
/// let mut tracker = ProgressTracker::new("Processed records").with_interval(100);
/// for _ in 0..250 {
///     tracker.log_if_needed(1); // logs at 100, 200
/// }
/// tracker.log_final(); // logs "Processed records 250 (complete)"
/// ```
pub struct ProgressTracker {
    /// The logging interval - progress is logged when count crosses multiples of this.
    interval: u64,
    /// Message prefix for log output.
    message: String,
    /// Internal count of items processed.
    count: u64,
    /// Start of the run, for elapsed time and throughput.
    start_time: Instant,
}

impl ProgressTracker {
    /// Create a new progress tracker with the specified message.
    ///
    /// The tracker starts with a count of 0 and a default interval of 1,000,000.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { interval: 1_000_000, message: message.into(), count: 0, start_time: Instant::now() }
    }

    /// Set the logging interval.
    ///
    /// Progress will be logged each time the count crosses a multiple of this
    /// interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Add to the count and log if an interval boundary was crossed.
    ///
    /// Returns `true` if the final count is exactly a multiple of the
    /// interval, which [`ProgressTracker::log_final`] uses to avoid a
    /// duplicate final message.
    pub fn log_if_needed(&mut self, additional: u64) -> bool {
        if additional == 0 {
            return self.count > 0 && self.count % self.interval == 0;
        }

        let prev = self.count;
        self.count += additional;

        let prev_intervals = prev / self.interval;
        let new_intervals = self.count / self.interval;
        for i in (prev_intervals + 1)..=new_intervals {
            let milestone = i * self.interval;
            let elapsed = self.start_time.elapsed();
            info!(
                "{} {} ({})",
                self.message,
                format_count(milestone),
                format_rate(milestone, elapsed)
            );
        }

        self.count % self.interval == 0
    }

    /// Log final progress if the count is not exactly on an interval
    /// boundary.
    pub fn log_final(&mut self) {
        if !self.log_if_needed(0) && self.count > 0 {
            info!("{} {} (complete)", self.message, format_count(self.count));
        }
    }

    /// Get the current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}
