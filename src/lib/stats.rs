//! Per-type counters, the insert-size histogram, and their TSV metric rows.

use anyhow::{Context, Result};
use fgoxide::io::DelimFile;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::pair_type::PairType;

/// A serializable metrics row with a stable name for error messages.
pub trait Metric: Serialize {
    /// Human-readable name of this metric family.
    fn metric_name() -> &'static str;
}

/// Accumulated classification statistics for one run.
///
/// Counters are keyed by [`PairType::index`]. The histogram covers realized
/// distances in `[0, bound]`; anything larger is clipped into the final
/// bucket so a handful of chimeric fragments cannot blow up the output size.
#[derive(Debug, Clone)]
pub struct PairStats {
    counts: [u64; PairType::ALL.len()],
    histogram: Vec<u64>,
    bound: u64,
}

impl PairStats {
    /// Creates empty statistics with the given histogram bound.
    #[must_use]
    pub fn new(histogram_bound: u64) -> Self {
        let buckets = usize::try_from(histogram_bound).unwrap_or(usize::MAX - 1) + 1;
        Self { counts: [0; PairType::ALL.len()], histogram: vec![0; buckets], bound: histogram_bound }
    }

    /// Counts one classified record.
    pub fn record(&mut self, pair_type: PairType) {
        self.counts[pair_type.index()] += 1;
    }

    /// Adds one realized distance to the histogram, clipping to the bound.
    pub fn record_distance(&mut self, distance: u64) {
        let clipped = distance.min(self.bound);
        let bucket = usize::try_from(clipped).unwrap_or(self.histogram.len() - 1);
        self.histogram[bucket] += 1;
    }

    /// Count of records assigned the given type.
    #[must_use]
    pub fn count(&self, pair_type: PairType) -> u64 {
        self.counts[pair_type.index()]
    }

    /// Total records counted across all types.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Records counted as members of committed pairs.
    #[must_use]
    pub fn paired(&self) -> u64 {
        self.total() - self.count(PairType::Unpaired)
    }

    /// One row per pair type, in desirability order, with the fraction of
    /// all counted records.
    #[must_use]
    pub fn type_rows(&self) -> Vec<PairTypeMetric> {
        let total = self.total();
        PairType::ALL
            .iter()
            .map(|&pt| PairTypeMetric {
                pair_type: pt.as_str().to_string(),
                count: self.count(pt),
                fraction: if total == 0 {
                    0.0
                } else {
                    self.count(pt) as f64 / total as f64
                },
            })
            .collect()
    }

    /// One row per non-empty histogram bucket, in ascending distance order.
    #[must_use]
    pub fn histogram_rows(&self) -> Vec<InsertSizeMetric> {
        self.histogram
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(distance, &count)| InsertSizeMetric { insert_size: distance as u64, count })
            .collect()
    }
}

/// Per-type classification counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PairTypeMetric {
    /// Stable pair type name.
    pub pair_type: String,
    /// Number of records assigned this type.
    pub count: u64,
    /// Fraction of all counted records.
    pub fraction: f64,
}

impl Metric for PairTypeMetric {
    fn metric_name() -> &'static str {
        "pair type"
    }
}

/// Insert-size histogram row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InsertSizeMetric {
    /// Realized distance (clipped to the histogram bound).
    pub insert_size: u64,
    /// Number of committed pairs with this distance.
    pub count: u64,
}

impl Metric for InsertSizeMetric {
    fn metric_name() -> &'static str {
        "insert size"
    }
}

/// Writes metric rows to a TSV file with consistent error context.
pub fn write_metrics<P: AsRef<Path>, T: Metric>(path: P, metrics: &[T]) -> Result<()> {
    let path_ref = path.as_ref();
    DelimFile::default().write_tsv(&path_ref, metrics).with_context(|| {
        format!("Failed to write {} metrics: {}", T::metric_name(), path_ref.display())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_counts_by_type() {
        let mut stats = PairStats::new(990);
        stats.record(PairType::Perfect);
        stats.record(PairType::Perfect);
        stats.record(PairType::Unpaired);
        assert_eq!(stats.count(PairType::Perfect), 2);
        assert_eq!(stats.count(PairType::Unpaired), 1);
        assert_eq!(stats.total(), 3);
        assert_eq!(stats.paired(), 2);
    }

    #[test]
    fn test_histogram_clipping() {
        let mut stats = PairStats::new(990);
        stats.record_distance(301);
        stats.record_distance(301);
        stats.record_distance(990);
        // Distances beyond the bound land in the final bucket.
        stats.record_distance(991);
        stats.record_distance(1_000_000);

        let rows = stats.histogram_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], InsertSizeMetric { insert_size: 301, count: 2 });
        assert_eq!(rows[1], InsertSizeMetric { insert_size: 990, count: 3 });
    }

    #[test]
    fn test_type_rows_cover_all_types_in_order() {
        let mut stats = PairStats::new(10);
        stats.record(PairType::PerfectUnique);
        let rows = stats.type_rows();
        assert_eq!(rows.len(), PairType::ALL.len());
        for (row, pt) in rows.iter().zip(PairType::ALL.iter()) {
            assert_eq!(row.pair_type, pt.as_str());
        }
        assert!((rows[PairType::PerfectUnique.index()].fraction - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fractions_on_empty_stats() {
        let stats = PairStats::new(10);
        for row in stats.type_rows() {
            assert_eq!(row.count, 0);
            assert_eq!(row.fraction, 0.0);
        }
    }

    #[test]
    fn test_write_metrics_roundtrip() -> Result<()> {
        let temp_file = NamedTempFile::new()?;
        let mut stats = PairStats::new(990);
        stats.record_distance(301);
        stats.record_distance(250);

        write_metrics(temp_file.path(), &stats.histogram_rows())?;

        let read_back: Vec<InsertSizeMetric> =
            DelimFile::default().read_tsv(&temp_file.path())?;
        assert_eq!(read_back, stats.histogram_rows());

        let content = fs::read_to_string(temp_file.path())?;
        assert!(content.contains("insert_size"));
        Ok(())
    }

    #[test]
    fn test_write_metrics_invalid_path() {
        let rows = vec![InsertSizeMetric { insert_size: 1, count: 1 }];
        let result = write_metrics("/invalid/path/metrics.txt", &rows);
        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("Failed to write insert size metrics"));
    }
}
