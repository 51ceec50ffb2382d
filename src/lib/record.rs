//! Core record types for the classification engine.
//!
//! The engine is deliberately independent of any file format: the BAM adapter
//! in the CLI converts decoded records into [`MappingRecord`]s and carries the
//! original record along as an opaque payload, so enrichment can be written
//! back without the engine ever owning alignment-format types.

use crate::pair_type::PairType;

/// Strand of a mapping on the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strand {
    /// Forward (plus) strand.
    Forward,
    /// Reverse (minus) strand.
    Reverse,
}

impl Strand {
    /// Returns true for the reverse strand.
    #[must_use]
    pub fn is_reverse(self) -> bool {
        matches!(self, Strand::Reverse)
    }

    /// Single-character representation (`+` / `-`).
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

/// Which end of the sequenced fragment a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadEnd {
    /// First end of the fragment (R1).
    First,
    /// Second end of the fragment (R2).
    Second,
    /// End not recorded by the source; routed to whichever end group is free.
    Unspecified,
}

/// One candidate alignment of one read end.
///
/// Coordinates are 1-based and inclusive with `start <= end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRecord {
    /// Reference (chromosome) name.
    pub ref_name: String,
    /// 1-based start coordinate.
    pub start: u64,
    /// 1-based inclusive end coordinate.
    pub end: u64,
    /// Mapping strand.
    pub strand: Strand,
    /// Edit-distance / mismatch count of the alignment.
    pub mismatches: u32,
    /// Which fragment end this record belongs to.
    pub read_end: ReadEnd,
}

/// Location of the committed mate, attached to enriched records for
/// downstream locus linkage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MateInfo {
    /// Mate reference name.
    pub ref_name: String,
    /// Mate 1-based start coordinate.
    pub start: u64,
    /// Mate strand.
    pub strand: Strand,
}

/// One record handed to the stream driver.
///
/// `mapping` is `None` for records flagged unmapped by the source; such
/// records are skipped and counted. `payload` is carried through untouched.
#[derive(Debug, Clone)]
pub struct InputRecord<P> {
    /// Read name as reported by the source, end suffix included.
    pub name: Vec<u8>,
    /// The candidate mapping, or `None` for unmapped records.
    pub mapping: Option<MappingRecord>,
    /// Opaque payload returned on the matching output record.
    pub payload: P,
}

/// One fully classified output record.
///
/// Exactly one enriched record is emitted per consumed input record.
#[derive(Debug, Clone)]
pub struct EnrichedRecord<P> {
    /// Read name, unchanged from the input.
    pub name: Vec<u8>,
    /// The mapping this record was built from.
    pub mapping: MappingRecord,
    /// Payload carried over from the input record.
    pub payload: P,
    /// Fragment id, shared by all records of one fragment group.
    pub pair_id: u64,
    /// Assigned pair type.
    pub pair_type: PairType,
    /// Location of the committed mate, or a representative location on the
    /// opposite end for unpaired singletons (if that end is non-empty).
    pub mate: Option<MateInfo>,
    /// Signed inferred distance: positive if this record is the upstream
    /// member of its pair, negative if downstream, zero for singletons.
    pub distance: i64,
}

impl<P> EnrichedRecord<P> {
    /// True when this record is a member of a well-formed pair.
    #[must_use]
    pub fn is_proper_pair(&self) -> bool {
        self.pair_type.is_pair()
    }
}
