//! The stream driver: groups queryname-ordered records into fragments,
//! resolves each group, and forwards enriched records to the sink.
//!
//! The driver is single-threaded and pull-based. It owns the fragment-id
//! counter and the statistics; the resolver and classifier stay pure. A
//! cancellation flag, if installed, is honored only at fragment-group
//! boundaries so no group is ever emitted half-finished.

use anyhow::Result;
use bstr::ByteSlice;
use log::{info, warn};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::distance::DistanceModel;
use crate::pair_type::PairType;
use crate::progress::ProgressTracker;
use crate::record::{EnrichedRecord, InputRecord, MappingRecord, MateInfo, ReadEnd};
use crate::resolver::resolve;
use crate::stats::PairStats;

/// Destination for enriched records. The driver writes each fragment's
/// records contiguously, in an order it controls.
pub trait PairSink<P> {
    /// Writes one enriched record.
    ///
    /// # Errors
    /// Any error aborts the run.
    fn write(&mut self, record: EnrichedRecord<P>) -> Result<()>;
}

impl<P> PairSink<P> for Vec<EnrichedRecord<P>> {
    fn write(&mut self, record: EnrichedRecord<P>) -> Result<()> {
        self.push(record);
        Ok(())
    }
}

/// Why one input record was dropped instead of classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The source flagged the record unmapped.
    Unmapped,
    /// The record names a reference absent from the reference table.
    UnknownReference,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unmapped => f.write_str("record is unmapped"),
            SkipReason::UnknownReference => f.write_str("unknown reference sequence"),
        }
    }
}

/// Rate-limited skip diagnostics: the first `limit` skips are logged
/// individually, the rest only show up in the final summary count.
pub struct SkipReporter {
    limit: u64,
    total: u64,
}

impl SkipReporter {
    /// Creates a reporter that logs at most `limit` individual messages.
    #[must_use]
    pub fn new(limit: u64) -> Self {
        Self { limit, total: 0 }
    }

    /// Counts one skipped record, logging it individually while the limit
    /// has not been reached. The limit-th message carries the suppression
    /// notice so exactly `limit` diagnostics are emitted. Returns whether an
    /// individual message was logged.
    pub fn report(&mut self, reason: SkipReason, name: &[u8]) -> bool {
        self.total += 1;
        if self.total > self.limit {
            return false;
        }
        if self.total == self.limit {
            warn!(
                "Skipping record '{}': {} (further skips reported only in the final summary)",
                name.as_bstr(),
                reason
            );
        } else {
            warn!("Skipping record '{}': {}", name.as_bstr(), reason);
        }
        true
    }

    /// Number of individually logged skips.
    #[must_use]
    pub fn reported(&self) -> u64 {
        self.total.min(self.limit)
    }

    /// Total skipped records, logged or not.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Logs the final skip count, if any records were skipped.
    pub fn log_summary(&self) {
        if self.total > 0 {
            info!("Skipped {} records in total", self.total);
        }
    }
}

/// Driver tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Progress message interval, in processed records.
    pub progress_interval: u64,
    /// Maximum individually logged skip diagnostics.
    pub skip_report_limit: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { progress_interval: 1_000_000, skip_report_limit: 100 }
    }
}

/// Final accounting for one run, retrievable after the stream completes.
#[derive(Debug)]
pub struct RunSummary {
    /// Records classified and emitted.
    pub processed: u64,
    /// Records dropped before grouping.
    pub skipped: u64,
    /// Fragment groups flushed.
    pub fragments: u64,
    /// Per-type counts and the distance histogram.
    pub stats: PairStats,
}

/// One record waiting in an open fragment group.
struct Pending<P> {
    name: Vec<u8>,
    mapping: MappingRecord,
    payload: P,
}

/// Strips a single trailing end-tag suffix (`/1` or `/2`) from a read name.
#[must_use]
pub fn base_name(name: &[u8]) -> &[u8] {
    match name {
        [rest @ .., b'/', b'1' | b'2'] => rest,
        _ => name,
    }
}

/// The classification pipeline over one queryname-ordered record stream.
pub struct StreamDriver {
    model: DistanceModel,
    references: HashSet<String>,
    config: DriverConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl StreamDriver {
    /// Creates a driver over the given distance model and reference table.
    /// Only membership in the table is consulted.
    #[must_use]
    pub fn new(model: DistanceModel, references: HashSet<String>, config: DriverConfig) -> Self {
        Self { model, references, config, cancel: None }
    }

    /// Installs a cancellation flag, checked at fragment-group boundaries.
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Consumes the record stream, writing every classified record to the
    /// sink. Input must be grouped by fragment base name (case-insensitive,
    /// end-tag suffix stripped); the driver does not detect violations.
    ///
    /// # Errors
    /// Source and sink failures abort the run.
    pub fn run<P, I, S>(&self, records: I, sink: &mut S) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<InputRecord<P>>>,
        S: PairSink<P>,
    {
        let mut stats = PairStats::new(self.model.histogram_bound());
        let mut skips = SkipReporter::new(self.config.skip_report_limit);
        let mut progress = ProgressTracker::new("Processed records")
            .with_interval(self.config.progress_interval);

        let mut current_key: Option<Vec<u8>> = None;
        let mut end_a: Vec<Pending<P>> = Vec::new();
        let mut end_b: Vec<Pending<P>> = Vec::new();
        let mut next_pair_id: u64 = 1;
        let mut fragments: u64 = 0;
        let mut processed: u64 = 0;

        for item in records {
            // Honor cancellation only between groups.
            if current_key.is_none() && self.cancelled() {
                info!("Cancellation requested; stopping at fragment boundary");
                break;
            }

            let record = item?;
            progress.log_if_needed(1);

            let Some(mapping) = record.mapping else {
                skips.report(SkipReason::Unmapped, &record.name);
                continue;
            };
            if !self.references.contains(&mapping.ref_name) {
                skips.report(SkipReason::UnknownReference, &record.name);
                continue;
            }

            let key = base_name(&record.name).to_ascii_lowercase();
            if current_key.as_deref() != Some(key.as_slice()) {
                if current_key.is_some() {
                    self.flush_group(next_pair_id, &mut end_a, &mut end_b, &mut stats, sink)?;
                    next_pair_id += 1;
                    fragments += 1;
                    if self.cancelled() {
                        info!("Cancellation requested; stopping at fragment boundary");
                        current_key = None;
                        break;
                    }
                }
                current_key = Some(key);
            }

            processed += 1;
            let pending = Pending { name: record.name, mapping, payload: record.payload };
            match pending.mapping.read_end {
                ReadEnd::First => end_a.push(pending),
                ReadEnd::Second => end_b.push(pending),
                ReadEnd::Unspecified => {
                    if end_a.is_empty() {
                        end_a.push(pending);
                    } else {
                        end_b.push(pending);
                    }
                }
            }
        }

        if current_key.is_some() {
            self.flush_group(next_pair_id, &mut end_a, &mut end_b, &mut stats, sink)?;
            fragments += 1;
        }

        progress.log_final();
        skips.log_summary();

        Ok(RunSummary { processed, skipped: skips.total(), fragments, stats })
    }

    /// Resolves one complete fragment group and emits every member record.
    /// Pairs go out first (end A then end B), then leftover singletons.
    fn flush_group<P, S>(
        &self,
        pair_id: u64,
        end_a: &mut Vec<Pending<P>>,
        end_b: &mut Vec<Pending<P>>,
        stats: &mut PairStats,
        sink: &mut S,
    ) -> Result<()>
    where
        S: PairSink<P>,
    {
        let maps_a: Vec<MappingRecord> = end_a.iter().map(|p| p.mapping.clone()).collect();
        let maps_b: Vec<MappingRecord> = end_b.iter().map(|p| p.mapping.clone()).collect();
        let resolution = resolve(&maps_a, &maps_b, &self.model);

        let mut slots_a: Vec<Option<Pending<P>>> = end_a.drain(..).map(Some).collect();
        let mut slots_b: Vec<Option<Pending<P>>> = end_b.drain(..).map(Some).collect();

        for pair in &resolution.pairs {
            stats.record(pair.pair_type);
            stats.record_distance(pair.distance);

            let a = slots_a[pair.a].take().expect("pair member consumed twice");
            let b = slots_b[pair.b].take().expect("pair member consumed twice");
            // Ties on start coordinate leave end A upstream, matching the
            // classifier's ordering.
            let a_upstream = a.mapping.start <= b.mapping.start;
            let signed = i64::try_from(pair.distance).unwrap_or(i64::MAX);

            let mate_of_a = MateInfo {
                ref_name: b.mapping.ref_name.clone(),
                start: b.mapping.start,
                strand: b.mapping.strand,
            };
            let mate_of_b = MateInfo {
                ref_name: a.mapping.ref_name.clone(),
                start: a.mapping.start,
                strand: a.mapping.strand,
            };

            sink.write(EnrichedRecord {
                name: a.name,
                mapping: a.mapping,
                payload: a.payload,
                pair_id,
                pair_type: pair.pair_type,
                mate: Some(mate_of_a),
                distance: if a_upstream { signed } else { -signed },
            })?;
            sink.write(EnrichedRecord {
                name: b.name,
                mapping: b.mapping,
                payload: b.payload,
                pair_id,
                pair_type: pair.pair_type,
                mate: Some(mate_of_b),
                distance: if a_upstream { -signed } else { signed },
            })?;
        }

        // Singleton mate fields point at a representative mapping on the
        // opposite end, purely for downstream locus linkage.
        let rep_a = maps_a.first().map(|m| MateInfo {
            ref_name: m.ref_name.clone(),
            start: m.start,
            strand: m.strand,
        });
        let rep_b = maps_b.first().map(|m| MateInfo {
            ref_name: m.ref_name.clone(),
            start: m.start,
            strand: m.strand,
        });

        for &i in &resolution.unpaired_a {
            stats.record(PairType::Unpaired);
            let rec = slots_a[i].take().expect("singleton consumed twice");
            sink.write(EnrichedRecord {
                name: rec.name,
                mapping: rec.mapping,
                payload: rec.payload,
                pair_id,
                pair_type: PairType::Unpaired,
                mate: rep_b.clone(),
                distance: 0,
            })?;
        }
        for &j in &resolution.unpaired_b {
            stats.record(PairType::Unpaired);
            let rec = slots_b[j].take().expect("singleton consumed twice");
            sink.write(EnrichedRecord {
                name: rec.name,
                mapping: rec.mapping,
                payload: rec.payload,
                pair_id,
                pair_type: PairType::Unpaired,
                mate: rep_a.clone(),
                distance: 0,
            })?;
        }

        Ok(())
    }
}
