//! The distance model: accepted insert-size interval and expected relative
//! orientation of a well-formed pair.

use crate::record::Strand;

/// Expected relative strand configuration of a correctly oriented pair.
///
/// Naming follows the usual paired-end vocabulary: `FR` is the "innie"
/// configuration produced by standard paired-end libraries, `RF` the "outie"
/// configuration of mate-pair libraries, and `Tandem` requires both ends on
/// the same strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOrientation {
    /// Forward then reverse: the upstream end maps forward.
    Fr,
    /// Reverse then forward: the upstream end maps reverse.
    Rf,
    /// Both ends on the same strand.
    Tandem,
}

/// Derived acceptance parameters for candidate pairs.
///
/// The interval is `[D - floor(D*P/100), D + floor(D*P/100)]` for nominal
/// distance `D` and deviation percent `P`. Parameters are validated by the
/// CLI layer; construction itself cannot fail.
#[derive(Debug, Clone, Copy)]
pub struct DistanceModel {
    min_dist: u64,
    max_dist: u64,
    orientation: PairOrientation,
}

impl DistanceModel {
    /// Builds the model from the configured nominal distance and deviation.
    #[must_use]
    pub fn new(nominal: u64, deviation_percent: u8, orientation: PairOrientation) -> Self {
        let dev = nominal * u64::from(deviation_percent) / 100;
        Self { min_dist: nominal - dev, max_dist: nominal + dev, orientation }
    }

    /// Lower bound of the accepted distance interval.
    #[must_use]
    pub fn min_dist(&self) -> u64 {
        self.min_dist
    }

    /// Upper bound of the accepted distance interval.
    #[must_use]
    pub fn max_dist(&self) -> u64 {
        self.max_dist
    }

    /// Configured orientation mode.
    #[must_use]
    pub fn orientation(&self) -> PairOrientation {
        self.orientation
    }

    /// Upper bound of the insert-size histogram (`3 * max_dist`); larger
    /// realized distances are clipped into the final bucket.
    #[must_use]
    pub fn histogram_bound(&self) -> u64 {
        self.max_dist.saturating_mul(3)
    }

    /// True iff the strand combination matches the configured mode,
    /// independent of which record is upstream.
    #[must_use]
    pub fn strands_match(&self, a: Strand, b: Strand) -> bool {
        match self.orientation {
            PairOrientation::Fr | PairOrientation::Rf => a != b,
            PairOrientation::Tandem => a == b,
        }
    }

    /// True iff the upstream/downstream strand assignment matches the
    /// expected configuration. Subsumes [`DistanceModel::strands_match`] for
    /// the coordinate-ordered pair.
    #[must_use]
    pub fn in_configuration(&self, upstream: Strand, downstream: Strand) -> bool {
        match self.orientation {
            PairOrientation::Fr => {
                upstream == Strand::Forward && downstream == Strand::Reverse
            }
            PairOrientation::Rf => {
                upstream == Strand::Reverse && downstream == Strand::Forward
            }
            PairOrientation::Tandem => upstream == downstream,
        }
    }
}
