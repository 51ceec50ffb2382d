//! The closed set of pair classifications.

use std::fmt;

/// Classification assigned to each fragment, ordered by descending
/// desirability. `*Unique` variants are produced only by promotion of a
/// committed pair whose two ends each carried exactly one candidate mapping;
/// the classifier itself never assigns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairType {
    /// Distance within the accepted interval, expected orientation.
    Perfect,
    /// [`PairType::Perfect`] with a single candidate on each end.
    PerfectUnique,
    /// Expected orientation, distance below the accepted interval.
    DistSmall,
    /// [`PairType::DistSmall`] with a single candidate on each end.
    DistSmallUnique,
    /// Expected orientation, distance above the accepted interval.
    DistLarge,
    /// [`PairType::DistLarge`] with a single candidate on each end.
    DistLargeUnique,
    /// Distance within the accepted interval, unexpected orientation.
    OrientWrong,
    /// [`PairType::OrientWrong`] with a single candidate on each end.
    OrientWrongUnique,
    /// Unexpected orientation and distance below the accepted interval.
    OrientDistSmall,
    /// [`PairType::OrientDistSmall`] with a single candidate on each end.
    OrientDistSmallUnique,
    /// Unexpected orientation and distance above the accepted interval.
    OrientDistLarge,
    /// [`PairType::OrientDistLarge`] with a single candidate on each end.
    OrientDistLargeUnique,
    /// Singleton: the record could not be committed to any pair.
    Unpaired,
}

impl PairType {
    /// All variants in desirability order. Drives metrics output and the
    /// per-type counter layout.
    pub const ALL: [PairType; 13] = [
        PairType::Perfect,
        PairType::PerfectUnique,
        PairType::DistSmall,
        PairType::DistSmallUnique,
        PairType::DistLarge,
        PairType::DistLargeUnique,
        PairType::OrientWrong,
        PairType::OrientWrongUnique,
        PairType::OrientDistSmall,
        PairType::OrientDistSmallUnique,
        PairType::OrientDistLarge,
        PairType::OrientDistLargeUnique,
        PairType::Unpaired,
    ];

    /// Stable name used in metrics files and the `pt` BAM tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PairType::Perfect => "perfect",
            PairType::PerfectUnique => "perfect_unique",
            PairType::DistSmall => "dist_small",
            PairType::DistSmallUnique => "dist_small_unique",
            PairType::DistLarge => "dist_large",
            PairType::DistLargeUnique => "dist_large_unique",
            PairType::OrientWrong => "orient_wrong",
            PairType::OrientWrongUnique => "orient_wrong_unique",
            PairType::OrientDistSmall => "orient_dist_small",
            PairType::OrientDistSmallUnique => "orient_dist_small_unique",
            PairType::OrientDistLarge => "orient_dist_large",
            PairType::OrientDistLargeUnique => "orient_dist_large_unique",
            PairType::Unpaired => "unpaired",
        }
    }

    /// Index into [`PairType::ALL`], used by the per-type counters.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            PairType::Perfect => 0,
            PairType::PerfectUnique => 1,
            PairType::DistSmall => 2,
            PairType::DistSmallUnique => 3,
            PairType::DistLarge => 4,
            PairType::DistLargeUnique => 5,
            PairType::OrientWrong => 6,
            PairType::OrientWrongUnique => 7,
            PairType::OrientDistSmall => 8,
            PairType::OrientDistSmallUnique => 9,
            PairType::OrientDistLarge => 10,
            PairType::OrientDistLargeUnique => 11,
            PairType::Unpaired => 12,
        }
    }

    /// True for every classification that represents a committed pair.
    #[must_use]
    pub fn is_pair(self) -> bool {
        !matches!(self, PairType::Unpaired)
    }

    /// True for the promoted single-candidate variants.
    #[must_use]
    pub fn is_unique(self) -> bool {
        matches!(
            self,
            PairType::PerfectUnique
                | PairType::DistSmallUnique
                | PairType::DistLargeUnique
                | PairType::OrientWrongUnique
                | PairType::OrientDistSmallUnique
                | PairType::OrientDistLargeUnique
        )
    }

    /// Rewrites a committed pair's type to its `*Unique` variant when both
    /// ends carried exactly one candidate mapping. All other inputs are
    /// returned unchanged.
    #[must_use]
    pub fn promote_unique(self, count_a: usize, count_b: usize) -> Self {
        if count_a != 1 || count_b != 1 {
            return self;
        }
        match self {
            PairType::Perfect => PairType::PerfectUnique,
            PairType::DistSmall => PairType::DistSmallUnique,
            PairType::DistLarge => PairType::DistLargeUnique,
            PairType::OrientWrong => PairType::OrientWrongUnique,
            PairType::OrientDistSmall => PairType::OrientDistSmallUnique,
            PairType::OrientDistLarge => PairType::OrientDistLargeUnique,
            other => other,
        }
    }
}

impl fmt::Display for PairType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotion_rewrites_base_types() {
        assert_eq!(PairType::Perfect.promote_unique(1, 1), PairType::PerfectUnique);
        assert_eq!(PairType::DistSmall.promote_unique(1, 1), PairType::DistSmallUnique);
        assert_eq!(PairType::DistLarge.promote_unique(1, 1), PairType::DistLargeUnique);
        assert_eq!(PairType::OrientWrong.promote_unique(1, 1), PairType::OrientWrongUnique);
        assert_eq!(PairType::OrientDistSmall.promote_unique(1, 1), PairType::OrientDistSmallUnique);
        assert_eq!(PairType::OrientDistLarge.promote_unique(1, 1), PairType::OrientDistLargeUnique);
    }

    #[test]
    fn test_promotion_requires_single_candidates() {
        assert_eq!(PairType::Perfect.promote_unique(2, 1), PairType::Perfect);
        assert_eq!(PairType::Perfect.promote_unique(1, 3), PairType::Perfect);
        assert_eq!(PairType::Unpaired.promote_unique(1, 1), PairType::Unpaired);
        // Already-promoted types are left alone.
        assert_eq!(PairType::PerfectUnique.promote_unique(1, 1), PairType::PerfectUnique);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, pt) in PairType::ALL.iter().enumerate() {
            assert_eq!(pt.index(), i);
        }
    }

    #[test]
    fn test_is_pair() {
        assert!(PairType::Perfect.is_pair());
        assert!(PairType::OrientDistLargeUnique.is_pair());
        assert!(!PairType::Unpaired.is_pair());
    }
}
