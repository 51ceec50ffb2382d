//! The combinatorial group resolver.
//!
//! For one fragment's end-A and end-B candidate sets, the resolver evaluates
//! every pairwise combination through the classifier, buckets the results in
//! priority order, and greedily commits pairs while enforcing that each
//! mapping record is consumed by at most one emitted pair. Records left over
//! after all buckets are processed become unpaired singletons.
//!
//! Combinations whose ends map to different references are never pairable:
//! the classifier compares coordinates only, so the reference check happens
//! here, before any geometric evaluation.
//!
//! The greedy, priority-ordered, first-writer-wins commitment (including the
//! per-bucket "largest distance wins" reductions) is a deliberate contract:
//! it is not a globally optimal bipartite matching and must not be replaced
//! with one.

use crate::classifier::{classify, Geometry};
use crate::distance::DistanceModel;
use crate::pair_type::PairType;
use crate::record::MappingRecord;

/// A committed pairing decision, indexing into the end-A and end-B slices
/// handed to [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadPair {
    /// Index of the committed end-A record.
    pub a: usize,
    /// Index of the committed end-B record.
    pub b: usize,
    /// Assigned pair type, uniqueness promotion already applied.
    pub pair_type: PairType,
    /// Realized genomic distance of the pair.
    pub distance: u64,
}

/// Output of resolving one fragment group. Every input index appears exactly
/// once, either in `pairs` or in one of the unpaired lists.
#[derive(Debug, Default)]
pub struct GroupResolution {
    /// Committed pairs, in commit order.
    pub pairs: Vec<ReadPair>,
    /// End-A indices not consumed by any pair.
    pub unpaired_a: Vec<usize>,
    /// End-B indices not consumed by any pair.
    pub unpaired_b: Vec<usize>,
}

/// One bucketed candidate combination.
#[derive(Debug, Clone, Copy)]
struct Bucketed {
    a: usize,
    b: usize,
    geometry: Geometry,
    distance: u64,
}

/// Running-max reduction: keep the single candidate with the largest
/// distance seen so far (closest to the accepted interval).
fn keep_largest(slot: &mut Option<Bucketed>, cand: Bucketed) {
    if slot.map_or(true, |kept| cand.distance > kept.distance) {
        *slot = Some(cand);
    }
}

fn pair_type_for(geometry: Geometry) -> PairType {
    match geometry {
        Geometry::Perfect => PairType::Perfect,
        Geometry::TooSmall => PairType::DistSmall,
        Geometry::TooLarge => PairType::DistLarge,
        Geometry::OrientWrong | Geometry::OrientWrongTooLarge => PairType::OrientWrong,
        Geometry::OrientWrongTooSmall => PairType::OrientDistSmall,
    }
}

/// Resolves one fragment group into committed pairs and singletons.
///
/// Either slice may be empty (other end unmapped or absent), in which case
/// every record of the populated end becomes a singleton.
#[must_use]
pub fn resolve(
    end_a: &[MappingRecord],
    end_b: &[MappingRecord],
    model: &DistanceModel,
) -> GroupResolution {
    if end_a.is_empty() || end_b.is_empty() {
        return GroupResolution {
            pairs: Vec::new(),
            unpaired_a: (0..end_a.len()).collect(),
            unpaired_b: (0..end_b.len()).collect(),
        };
    }

    if end_a.len() == 1 && end_b.len() == 1 {
        return resolve_single(&end_a[0], &end_b[0], model);
    }

    resolve_multi(end_a, end_b, model)
}

/// Exactly one candidate on each end: classify directly and commit. The
/// wrong-orientation-too-large drop signal has no alternative here, so it
/// falls back to a plain wrong-orientation pair with the same distance.
/// Ends on different references cannot pair and both become singletons.
fn resolve_single(a: &MappingRecord, b: &MappingRecord, model: &DistanceModel) -> GroupResolution {
    if a.ref_name != b.ref_name {
        return GroupResolution {
            pairs: Vec::new(),
            unpaired_a: vec![0],
            unpaired_b: vec![0],
        };
    }

    let cand = classify(a, b, model);
    let pair_type = pair_type_for(cand.geometry).promote_unique(1, 1);

    GroupResolution {
        pairs: vec![ReadPair { a: 0, b: 0, pair_type, distance: cand.distance }],
        unpaired_a: Vec::new(),
        unpaired_b: Vec::new(),
    }
}

/// At least one end has multiple candidates: bucket all combinations and
/// commit greedily in priority order.
fn resolve_multi(
    end_a: &[MappingRecord],
    end_b: &[MappingRecord],
    model: &DistanceModel,
) -> GroupResolution {
    let best_a = end_a.iter().map(|r| r.mismatches).min().unwrap_or(0);
    let best_b = end_b.iter().map(|r| r.mismatches).min().unwrap_or(0);

    // Priority-ordered buckets. Lists keep all entries in combination order;
    // Option slots hold a running max by distance.
    let mut perfect_best: Vec<Bucketed> = Vec::new();
    let mut small_best: Option<Bucketed> = None;
    let mut orient_best: Vec<Bucketed> = Vec::new();
    let mut orient_small_best: Option<Bucketed> = None;
    let mut deferred: Vec<Bucketed> = Vec::new();
    let mut orient_deferred: Option<Bucketed> = None;

    for (i, a) in end_a.iter().enumerate() {
        for (j, b) in end_b.iter().enumerate() {
            // Coordinates on different references are not comparable.
            if a.ref_name != b.ref_name {
                continue;
            }
            let cand = classify(a, b, model);
            let both_best = a.mismatches == best_a && b.mismatches == best_b;
            let bucketed =
                Bucketed { a: i, b: j, geometry: cand.geometry, distance: cand.distance };

            match cand.geometry {
                Geometry::Perfect => {
                    if both_best {
                        perfect_best.push(bucketed);
                    } else {
                        deferred.push(bucketed);
                    }
                }
                Geometry::TooSmall => {
                    if both_best {
                        keep_largest(&mut small_best, bucketed);
                    } else {
                        deferred.push(bucketed);
                    }
                }
                Geometry::OrientWrong => {
                    if both_best {
                        orient_best.push(bucketed);
                    } else {
                        keep_largest(&mut orient_deferred, bucketed);
                    }
                }
                Geometry::OrientWrongTooSmall => {
                    if both_best {
                        keep_largest(&mut orient_small_best, bucketed);
                    } else {
                        keep_largest(&mut orient_deferred, bucketed);
                    }
                }
                // Too-large candidates are never committed as pairs; the
                // wrong-orientation variant is dropped entirely.
                Geometry::TooLarge | Geometry::OrientWrongTooLarge => {}
            }
        }
    }

    let mut used_a = vec![false; end_a.len()];
    let mut used_b = vec![false; end_b.len()];
    let mut pairs: Vec<ReadPair> = Vec::new();

    let counts = (end_a.len(), end_b.len());
    let mut commit = |cand: &Bucketed, used_a: &mut [bool], used_b: &mut [bool]| {
        // First-writer-wins: an earlier, higher-priority commit keeps its
        // records.
        if used_a[cand.a] || used_b[cand.b] {
            return;
        }
        used_a[cand.a] = true;
        used_b[cand.b] = true;
        let pair_type = pair_type_for(cand.geometry).promote_unique(counts.0, counts.1);
        pairs.push(ReadPair { a: cand.a, b: cand.b, pair_type, distance: cand.distance });
    };

    for cand in &perfect_best {
        commit(cand, &mut used_a, &mut used_b);
    }
    if let Some(cand) = &small_best {
        commit(cand, &mut used_a, &mut used_b);
    }
    for cand in &orient_best {
        commit(cand, &mut used_a, &mut used_b);
    }
    if let Some(cand) = &orient_small_best {
        commit(cand, &mut used_a, &mut used_b);
    }
    for cand in &deferred {
        commit(cand, &mut used_a, &mut used_b);
    }
    if let Some(cand) = &orient_deferred {
        commit(cand, &mut used_a, &mut used_b);
    }

    let unpaired_a = (0..end_a.len()).filter(|&i| !used_a[i]).collect();
    let unpaired_b = (0..end_b.len()).filter(|&j| !used_b[j]).collect();

    GroupResolution { pairs, unpaired_a, unpaired_b }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::PairOrientation;
    use crate::record::{ReadEnd, Strand};

    fn rec(start: u64, end: u64, strand: Strand, mismatches: u32) -> MappingRecord {
        MappingRecord {
            ref_name: "chr1".to_string(),
            start,
            end,
            strand,
            mismatches,
            read_end: ReadEnd::Unspecified,
        }
    }

    fn fr_model() -> DistanceModel {
        DistanceModel::new(300, 10, PairOrientation::Fr)
    }

    /// Every input index must appear exactly once across pairs and
    /// singletons.
    fn assert_partition(res: &GroupResolution, len_a: usize, len_b: usize) {
        let mut seen_a = vec![0usize; len_a];
        let mut seen_b = vec![0usize; len_b];
        for pair in &res.pairs {
            seen_a[pair.a] += 1;
            seen_b[pair.b] += 1;
        }
        for &i in &res.unpaired_a {
            seen_a[i] += 1;
        }
        for &j in &res.unpaired_b {
            seen_b[j] += 1;
        }
        assert!(seen_a.iter().all(|&n| n == 1), "end A partition violated: {seen_a:?}");
        assert!(seen_b.iter().all(|&n| n == 1), "end B partition violated: {seen_b:?}");
    }

    #[test]
    fn test_one_end_empty() {
        let end_a = vec![
            rec(1000, 1049, Strand::Forward, 0),
            rec(5000, 5049, Strand::Forward, 1),
        ];
        let res = resolve(&end_a, &[], &fr_model());
        assert!(res.pairs.is_empty());
        assert_eq!(res.unpaired_a, vec![0, 1]);
        assert!(res.unpaired_b.is_empty());
        assert_partition(&res, 2, 0);
    }

    #[test]
    fn test_single_candidates_perfect_unique() {
        let a = vec![rec(1000, 1049, Strand::Forward, 0)];
        let b = vec![rec(1251, 1300, Strand::Reverse, 0)];
        let res = resolve(&a, &b, &fr_model());
        assert_eq!(res.pairs.len(), 1);
        assert_eq!(res.pairs[0].pair_type, PairType::PerfectUnique);
        assert_eq!(res.pairs[0].distance, 301);
        assert_partition(&res, 1, 1);
    }

    #[test]
    fn test_single_candidates_dist_small_unique() {
        let a = vec![rec(1000, 1049, Strand::Forward, 0)];
        let b = vec![rec(1200, 1249, Strand::Reverse, 0)];
        let res = resolve(&a, &b, &fr_model());
        assert_eq!(res.pairs[0].pair_type, PairType::DistSmallUnique);
        assert_eq!(res.pairs[0].distance, 250);
    }

    #[test]
    fn test_single_candidates_orient_wrong_too_large_falls_back() {
        // Wrong orientation and too large: a lone candidate has no
        // alternative, so the pair is committed as wrong-orientation.
        let a = vec![rec(1000, 1049, Strand::Reverse, 0)];
        let b = vec![rec(1400, 1449, Strand::Forward, 0)];
        let res = resolve(&a, &b, &fr_model());
        assert_eq!(res.pairs.len(), 1);
        assert_eq!(res.pairs[0].pair_type, PairType::OrientWrongUnique);
        assert_eq!(res.pairs[0].distance, 450);
    }

    #[test]
    fn test_perfect_beats_dist_small_on_shared_record() {
        // b0 forms a perfect pair with a0; b1 forms a too-small pair with
        // the same a0. The perfect candidate must win and b1 becomes a
        // singleton.
        let a = vec![rec(1000, 1049, Strand::Forward, 0)];
        let b = vec![
            rec(1251, 1300, Strand::Reverse, 0),
            rec(1200, 1249, Strand::Reverse, 0),
        ];
        let res = resolve(&a, &b, &fr_model());
        assert_eq!(res.pairs.len(), 1);
        assert_eq!(res.pairs[0].pair_type, PairType::Perfect);
        assert_eq!(res.pairs[0].b, 0);
        assert_eq!(res.unpaired_b, vec![1]);
        assert_partition(&res, 1, 2);
    }

    #[test]
    fn test_no_unique_promotion_with_multiple_candidates() {
        let a = vec![rec(1000, 1049, Strand::Forward, 0)];
        let b = vec![
            rec(1251, 1300, Strand::Reverse, 0),
            rec(9000, 9049, Strand::Reverse, 0),
        ];
        let res = resolve(&a, &b, &fr_model());
        assert_eq!(res.pairs[0].pair_type, PairType::Perfect);
        assert!(!res.pairs[0].pair_type.is_unique());
    }

    #[test]
    fn test_dist_small_running_max_keeps_largest() {
        // Two too-small candidates for the same end-A record: the one with
        // the larger distance (closer to min_dist) must be committed.
        let a = vec![rec(1000, 1049, Strand::Forward, 0)];
        let b = vec![
            rec(1150, 1199, Strand::Reverse, 0), // distance 200
            rec(1210, 1259, Strand::Reverse, 0), // distance 260
        ];
        let res = resolve(&a, &b, &fr_model());
        assert_eq!(res.pairs.len(), 1);
        assert_eq!(res.pairs[0].pair_type, PairType::DistSmall);
        assert_eq!(res.pairs[0].distance, 260);
        assert_eq!(res.pairs[0].b, 1);
        assert_eq!(res.unpaired_b, vec![0]);
    }

    #[test]
    fn test_best_supported_small_beats_deferred_perfect() {
        // (a0, b0) is too-small with both records best-supported; (a1, b0)
        // is perfect but a1 is not best-supported. The best-supported bucket
        // commits first and consumes b0, deferring the perfect candidate
        // into oblivion.
        let a = vec![
            rec(1000, 1049, Strand::Forward, 0),
            rec(950, 999, Strand::Forward, 2),
        ];
        let b = vec![rec(1200, 1249, Strand::Reverse, 0)];
        let res = resolve(&a, &b, &fr_model());
        assert_eq!(res.pairs.len(), 1);
        assert_eq!(res.pairs[0].pair_type, PairType::DistSmall);
        assert_eq!(res.pairs[0].a, 0);
        assert_eq!(res.unpaired_a, vec![1]);
        assert_partition(&res, 2, 1);
    }

    #[test]
    fn test_deferred_perfect_commits_when_unblocked() {
        // Only combination in range is a perfect pair whose end-A record is
        // not best-supported; nothing higher-priority consumes its records,
        // so it commits from the deferred bucket.
        let a = vec![
            rec(1000, 1049, Strand::Forward, 1),
            rec(90_000, 90_049, Strand::Forward, 0),
        ];
        let b = vec![rec(1251, 1300, Strand::Reverse, 0)];
        let res = resolve(&a, &b, &fr_model());
        assert_eq!(res.pairs.len(), 1);
        assert_eq!(res.pairs[0].pair_type, PairType::Perfect);
        assert_eq!(res.pairs[0].a, 0);
        assert_eq!(res.unpaired_a, vec![1]);
    }

    #[test]
    fn test_multiple_perfect_pairs_commit_disjointly() {
        let a = vec![
            rec(1000, 1049, Strand::Forward, 0),
            rec(10_000, 10_049, Strand::Forward, 0),
        ];
        let b = vec![
            rec(1251, 1300, Strand::Reverse, 0),
            rec(10_251, 10_300, Strand::Reverse, 0),
        ];
        let res = resolve(&a, &b, &fr_model());
        assert_eq!(res.pairs.len(), 2);
        assert!(res.unpaired_a.is_empty());
        assert!(res.unpaired_b.is_empty());
        assert_partition(&res, 2, 2);
    }

    #[test]
    fn test_too_large_combinations_fall_through_to_unpaired() {
        // Every combination is too large (correct orientation), which is
        // never committed in a multi-candidate group.
        let a = vec![
            rec(1000, 1049, Strand::Forward, 0),
            rec(2000, 2049, Strand::Forward, 0),
        ];
        let b = vec![rec(99_000, 99_049, Strand::Reverse, 0)];
        let res = resolve(&a, &b, &fr_model());
        assert!(res.pairs.is_empty());
        assert_eq!(res.unpaired_a, vec![0, 1]);
        assert_eq!(res.unpaired_b, vec![0]);
        assert_partition(&res, 2, 1);
    }

    #[test]
    fn test_cross_reference_single_candidates_never_pair() {
        // Coincidentally close coordinates on different chromosomes must not
        // form a pair, even in the always-committing 1x1 case.
        let a = vec![rec(1000, 1049, Strand::Forward, 0)];
        let mut b = rec(1251, 1300, Strand::Reverse, 0);
        b.ref_name = "chr2".to_string();
        let res = resolve(&a, &[b], &fr_model());
        assert!(res.pairs.is_empty());
        assert_eq!(res.unpaired_a, vec![0]);
        assert_eq!(res.unpaired_b, vec![0]);
        assert_partition(&res, 1, 1);
    }

    #[test]
    fn test_cross_reference_candidate_skipped_in_multi_group() {
        // b0 would be a perfect pair by coordinates alone but sits on another
        // chromosome; the same-reference candidate b1 must win instead.
        let a = vec![rec(1000, 1049, Strand::Forward, 0)];
        let mut b0 = rec(1251, 1300, Strand::Reverse, 0);
        b0.ref_name = "chr2".to_string();
        let b1 = rec(1200, 1249, Strand::Reverse, 0);
        let res = resolve(&a, &[b0, b1], &fr_model());
        assert_eq!(res.pairs.len(), 1);
        assert_eq!(res.pairs[0].b, 1);
        assert_eq!(res.pairs[0].pair_type, PairType::DistSmall);
        assert_eq!(res.unpaired_b, vec![0]);
        assert_partition(&res, 1, 2);
    }

    #[test]
    fn test_partition_invariant_dense_group() {
        let a = vec![
            rec(1000, 1049, Strand::Forward, 0),
            rec(1010, 1059, Strand::Forward, 1),
            rec(50_000, 50_049, Strand::Reverse, 0),
        ];
        let b = vec![
            rec(1251, 1300, Strand::Reverse, 0),
            rec(1200, 1249, Strand::Reverse, 2),
            rec(1290, 1339, Strand::Reverse, 0),
        ];
        let res = resolve(&a, &b, &fr_model());
        assert_partition(&res, 3, 3);
        assert!(!res.pairs.is_empty());
    }
}
