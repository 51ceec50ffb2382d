//! Classify paired-end alignments by insert size and orientation.
//!
//! Reads a queryname-grouped BAM, resolves each fragment's candidate
//! mappings into pairs, and writes every record back out enriched with a
//! fragment id (`pi` tag), a pair type (`pt` tag), mate fields, and the
//! signed inferred insert size. Per-type counts and an insert-size histogram
//! can be written as TSV metrics.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use pairclass_lib::bam_io::{create_bam_reader, create_bam_writer, BamWriter};
use pairclass_lib::distance::{DistanceModel, PairOrientation};
use pairclass_lib::driver::{DriverConfig, PairSink, StreamDriver};
use pairclass_lib::logging::log_classification_summary;
use pairclass_lib::record::{EnrichedRecord, InputRecord, MappingRecord, ReadEnd, Strand};
use pairclass_lib::stats::write_metrics;
use pairclass_lib::validation::{validate_file_exists, validate_min_max, validate_positive};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use noodles::core::Position;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record::Flags;
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::alignment::record_buf::RecordBuf;
use noodles::sam::Header;

use crate::commands::command::Command;

/// Expected relative orientation of a correctly formed pair.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrientationArg {
    /// Forward then reverse (standard paired-end).
    Fr,
    /// Reverse then forward (mate-pair).
    Rf,
    /// Both ends on the same strand.
    Tandem,
}

impl From<OrientationArg> for PairOrientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Fr => PairOrientation::Fr,
            OrientationArg::Rf => PairOrientation::Rf,
            OrientationArg::Tandem => PairOrientation::Tandem,
        }
    }
}

/// Classify read pairs by insert size and orientation.
///
/// The input must be grouped by read name (queryname sort) so that all
/// candidate mappings of one fragment are adjacent.
#[derive(Debug, Parser)]
#[command(
    name = "classify",
    about = "Classify read pairs by insert size and orientation",
    long_about = r#"
Classify paired-end alignments against an expected insert-size interval.

Each fragment's candidate mappings (end A x end B) are evaluated against the
accepted interval [D - floor(D*P/100), D + floor(D*P/100)] and the expected
orientation, then greedily matched in priority order: in-range pairs first,
then too-small, then wrong-orientation variants. Records left without a
partner are emitted as unpaired singletons.

Every input record is written back out with:

  pi    fragment id (shared by all records of one fragment)
  pt    pair type (perfect, dist_small, orient_wrong, ..., unpaired)

plus mate reference/position/strand fields, the signed insert size in TLEN,
and the properly-paired flag set for committed pairs.

EXAMPLES:

  # Classify with a 500bp +/- 10% insert interval
  pairclass classify -i grouped.bam -o classified.bam -d 500 -p 10

  # Mate-pair library with metrics
  pairclass classify -i grouped.bam -o classified.bam \
    --orientation rf --metrics types.tsv --histogram sizes.tsv
"#
)]
pub struct Classify {
    /// Input queryname-grouped BAM file.
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output BAM file.
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Nominal insert size in bases.
    #[arg(short = 'd', long = "distance", default_value = "500")]
    pub distance: u64,

    /// Allowed deviation from the nominal insert size, in percent (0-100).
    #[arg(short = 'p', long = "deviation", default_value = "10")]
    pub deviation: u8,

    /// Expected pair orientation.
    #[arg(long = "orientation", value_enum, default_value = "fr")]
    pub orientation: OrientationArg,

    /// Optional TSV output with per-type counts.
    #[arg(long = "metrics")]
    pub metrics: Option<PathBuf>,

    /// Optional TSV output with the insert-size histogram.
    #[arg(long = "histogram")]
    pub histogram: Option<PathBuf>,

    /// Progress message interval, in records.
    #[arg(long = "progress-interval", default_value = "1000000")]
    pub progress_interval: u64,

    /// Maximum individually logged skipped records.
    #[arg(long = "skip-report-limit", default_value = "100")]
    pub skip_report_limit: u64,
}

impl Classify {
    fn validate(&self) -> Result<()> {
        validate_file_exists(&self.input, "Input BAM")?;
        validate_positive(self.distance, "distance")?;
        validate_min_max(self.deviation, 0, 100, "deviation")?;
        Ok(())
    }
}

impl Command for Classify {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.validate()?;
        debug!("Command line: {command_line}");

        let (mut reader, header) = create_bam_reader(&self.input)?;
        let writer = create_bam_writer(&self.output, &header)?;

        // Reference names by id for record conversion, and ids by name for
        // mate field rewriting.
        let ref_names: Vec<String> = header
            .reference_sequences()
            .keys()
            .map(|name| name.to_string())
            .collect();
        let references: HashSet<String> = ref_names.iter().cloned().collect();
        let ref_ids: HashMap<String, usize> =
            ref_names.iter().enumerate().map(|(i, name)| (name.clone(), i)).collect();

        let model = DistanceModel::new(self.distance, self.deviation, self.orientation.into());
        info!(
            "Accepting insert sizes in [{}, {}], orientation {:?}",
            model.min_dist(),
            model.max_dist(),
            self.orientation
        );

        let config = DriverConfig {
            progress_interval: self.progress_interval,
            skip_report_limit: self.skip_report_limit,
        };
        let driver = StreamDriver::new(model, references, config);

        let source = std::iter::from_fn(|| {
            let mut record = RecordBuf::default();
            match reader.read_record_buf(&header, &mut record) {
                Ok(0) => None,
                Ok(_) => Some(Ok(to_input_record(record, &ref_names))),
                Err(e) => Some(Err(anyhow::Error::new(e).context("Failed to read BAM record"))),
            }
        });

        let mut sink = BamSink { writer, header: &header, ref_ids: &ref_ids };
        let summary = driver.run(source, &mut sink)?;
        sink.writer.finish(&header).context("Failed to finalize output BAM")?;

        if let Some(path) = &self.metrics {
            write_metrics(path, &summary.stats.type_rows())?;
        }
        if let Some(path) = &self.histogram {
            write_metrics(path, &summary.stats.histogram_rows())?;
        }

        log_classification_summary(&summary);
        Ok(())
    }
}

/// Converts one decoded BAM record into the driver's input form. Unmapped
/// records and records without usable coordinates carry no mapping and are
/// skipped by the driver.
fn to_input_record(record: RecordBuf, ref_names: &[String]) -> InputRecord<RecordBuf> {
    let flags = record.flags();
    let name = record.name().map_or_else(Vec::new, |n| Vec::from(<_ as AsRef<[u8]>>::as_ref(n)));

    let mapping = if flags.is_unmapped() {
        None
    } else {
        match (record.reference_sequence_id(), record.alignment_start(), record.alignment_end()) {
            (Some(id), Some(start), Some(end)) if id < ref_names.len() => Some(MappingRecord {
                ref_name: ref_names[id].clone(),
                start: start.get() as u64,
                end: end.get() as u64,
                strand: if flags.is_reverse_complemented() {
                    Strand::Reverse
                } else {
                    Strand::Forward
                },
                mismatches: edit_distance(&record),
                read_end: if flags.is_first_segment() {
                    ReadEnd::First
                } else if flags.is_last_segment() {
                    ReadEnd::Second
                } else {
                    ReadEnd::Unspecified
                },
            }),
            _ => None,
        }
    };

    InputRecord { name, mapping, payload: record }
}

/// Edit distance from the NM tag, defaulting to zero when absent.
fn edit_distance(record: &RecordBuf) -> u32 {
    const NM: Tag = Tag::new(b'N', b'M');
    record
        .data()
        .get(&NM)
        .and_then(|value| value.as_int())
        .and_then(|value| u32::try_from(value).ok())
        .unwrap_or(0)
}

/// Writes enriched records back to BAM, rewriting flags, mate fields, TLEN,
/// and the classification tags on the original record.
struct BamSink<'a> {
    writer: BamWriter,
    header: &'a Header,
    ref_ids: &'a HashMap<String, usize>,
}

impl PairSink<RecordBuf> for BamSink<'_> {
    fn write(&mut self, record: EnrichedRecord<RecordBuf>) -> Result<()> {
        let proper = record.is_proper_pair();
        let mut buf = record.payload;
        let mut flags = buf.flags();

        if proper {
            flags.insert(Flags::PROPERLY_SEGMENTED);
        } else {
            flags.remove(Flags::PROPERLY_SEGMENTED);
        }

        if let Some(mate) = &record.mate {
            if let Some(&id) = self.ref_ids.get(&mate.ref_name) {
                *buf.mate_reference_sequence_id_mut() = Some(id);
            }
            *buf.mate_alignment_start_mut() = Position::new(mate.start as usize);
            if mate.strand.is_reverse() {
                flags.insert(Flags::MATE_REVERSE_COMPLEMENTED);
            } else {
                flags.remove(Flags::MATE_REVERSE_COMPLEMENTED);
            }
        }

        *buf.template_length_mut() = i32::try_from(record.distance).unwrap_or(0);
        *buf.flags_mut() = flags;

        let data = buf.data_mut();
        data.insert(
            Tag::new(b'p', b'i'),
            Value::UInt32(u32::try_from(record.pair_id).unwrap_or(u32::MAX)),
        );
        data.insert(Tag::new(b'p', b't'), Value::String(record.pair_type.as_str().into()));

        self.writer
            .write_alignment_record(self.header, &buf)
            .context("Failed to write BAM record")?;
        Ok(())
    }
}
