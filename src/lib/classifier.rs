//! Geometric classification of one candidate pair.
//!
//! Given one mapping from each end, [`classify`] determines the realized
//! genomic distance and which mutually exclusive geometry the combination
//! falls into. It is a pure function: the group resolver decides what to do
//! with the result, including dropping `OrientWrongTooLarge` candidates.

use crate::distance::DistanceModel;
use crate::record::MappingRecord;

/// Geometry of one candidate pair relative to the distance model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Geometry {
    /// Expected orientation, distance within `[min_dist, max_dist]`.
    Perfect,
    /// Expected orientation, distance below `min_dist`.
    TooSmall,
    /// Expected orientation, distance above `max_dist`.
    TooLarge,
    /// Unexpected orientation, distance within the interval.
    OrientWrong,
    /// Unexpected orientation, distance below `min_dist`.
    OrientWrongTooSmall,
    /// Unexpected orientation, distance above `max_dist`. Never committed
    /// from multi-candidate buckets; the 1x1 case falls back to a plain
    /// wrong-orientation pair since there is no alternative.
    OrientWrongTooLarge,
}

/// One classified candidate combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Geometry bucket the combination falls into.
    pub geometry: Geometry,
    /// Realized genomic distance (fragment span).
    pub distance: u64,
}

/// Classifies the combination of one end-A and one end-B mapping.
///
/// The record with the smaller start coordinate is taken as upstream (ties
/// resolve to `a`). The realized distance is the full span from the upstream
/// start to the downstream end, inclusive. Coordinates are compared without
/// regard to reference names; callers must only pass mappings on the same
/// reference.
#[must_use]
pub fn classify(a: &MappingRecord, b: &MappingRecord, model: &DistanceModel) -> Candidate {
    let (upstream, downstream) = if a.start <= b.start { (a, b) } else { (b, a) };
    let distance = downstream.end.saturating_sub(upstream.start) + 1;

    let geometry = if model.in_configuration(upstream.strand, downstream.strand) {
        if distance < model.min_dist() {
            Geometry::TooSmall
        } else if distance > model.max_dist() {
            Geometry::TooLarge
        } else {
            Geometry::Perfect
        }
    } else if distance < model.min_dist() {
        Geometry::OrientWrongTooSmall
    } else if distance > model.max_dist() {
        Geometry::OrientWrongTooLarge
    } else {
        Geometry::OrientWrong
    };

    Candidate { geometry, distance }
}
