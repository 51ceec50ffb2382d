//! Logging utilities for formatted output.
//!
//! This module provides consistent, user-friendly formatting helpers and the
//! end-of-run classification summary.

use std::time::Duration;

use crate::driver::RunSummary;
use crate::pair_type::PairType;

/// Formats a count with thousands separators.
///
/// # Examples
///
/// ```
/// use pairclass_lib::logging::format_count;
///
/// assert_eq!(format_count(1234567), "1,234,567");
/// assert_eq!(format_count(42), "42");
/// ```
#[must_use]
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a fraction as a percentage with the given decimal places.
///
/// # Examples
///
/// ```
/// use pairclass_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(0.5, 1), "50.0%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0, decimals = decimals)
}

/// Formats a duration in human-readable form.
///
/// # Examples
///
/// ```
/// use pairclass_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Formats a throughput rate with appropriate units.
///
/// # Examples
///
/// ```
/// use pairclass_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(1000, Duration::from_secs(1)), "1,000 records/s");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} records/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} records/s", format_count(rate as u64))
    } else {
        let per_min = count as f64 / (secs / 60.0);
        format!("{per_min:.1} records/min")
    }
}

/// Logs a formatted summary of one classification run.
#[allow(clippy::cast_precision_loss)]
pub fn log_classification_summary(summary: &RunSummary) {
    log::info!("Pair Classification Summary:");
    log::info!("  Input records: {}", format_count(summary.processed + summary.skipped));
    log::info!("  Classified records: {}", format_count(summary.processed));
    log::info!("  Skipped records: {}", format_count(summary.skipped));
    log::info!("  Fragments: {}", format_count(summary.fragments));

    let total = summary.stats.total();
    if total > 0 {
        let paired_rate = summary.stats.paired() as f64 / total as f64;
        log::info!("  Paired rate: {}", format_percent(paired_rate, 2));
    }

    for &pt in &PairType::ALL {
        let count = summary.stats.count(pt);
        if count > 0 {
            log::info!("    {}: {}", pt.as_str(), format_count(count));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.9543, 2), "95.43%");
        assert_eq!(format_percent(0.5, 1), "50.0%");
        assert_eq!(format_percent(1.0, 0), "100%");
        assert_eq!(format_percent(0.0, 2), "0.00%");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(Duration::from_secs(45)), "45s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m");
        assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h");
        assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
    }

    #[test]
    fn test_format_rate() {
        assert_eq!(format_rate(1000, Duration::from_secs(1)), "1,000 records/s");
        assert_eq!(format_rate(60, Duration::from_secs(60)), "1 records/s");
        assert_eq!(format_rate(30, Duration::from_secs(60)), "30.0 records/min");
        assert!(format_rate(1000, Duration::from_nanos(1)).contains("records/s"));
    }

    #[test]
    fn test_log_classification_summary() {
        use crate::stats::PairStats;

        let mut stats = PairStats::new(990);
        stats.record(PairType::PerfectUnique);
        stats.record(PairType::PerfectUnique);
        stats.record(PairType::Unpaired);
        let summary = RunSummary { processed: 3, skipped: 1, fragments: 2, stats };
        log_classification_summary(&summary);
    }
}
