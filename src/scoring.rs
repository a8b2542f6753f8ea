use ahash::AHashMap;
use rayon::prelude::*;

use crate::matrix::CompatibilityMatrix;
use crate::models::{AdjacencyPair, DEFAULT_SCORE, Parcel, ParcelScore, ScoredPair};

/// Resolves the matrix score for every directed pair.
///
/// Lookups follow the pair's own ordering; a missing entry stays unresolved
/// rather than borrowing the reverse direction or substituting a default.
pub fn score_pairs(pairs: Vec<AdjacencyPair>, matrix: &CompatibilityMatrix) -> Vec<ScoredPair> {
    pairs
        .into_par_iter()
        .map(|pair| {
            let score = matrix.score(&pair.left_use, &pair.right_use);
            ScoredPair { pair, score }
        })
        .collect()
}

/// Worst-case reduction: each parcel keeps the minimum *resolved* score
/// among the pairs where it sits on the left. A single bad neighbor is
/// meant to dominate the assessment.
///
/// Default policy, preserved exactly: a parcel with no pairs at all, or
/// whose pairs are all unresolved, gets [`DEFAULT_SCORE`]. Unresolved pairs
/// are excluded from the minimum, never coerced to a number.
///
/// Minimum is commutative and associative, so the grouped reduce is safe to
/// run in any order across the rayon pool; the result is deterministic for
/// a fixed pair set and ordered by the input parcel order.
pub fn aggregate_worst_case(parcels: &[Parcel], scored: &[ScoredPair]) -> Vec<ParcelScore> {
    let minimums = scored
        .par_iter()
        .filter_map(|sp| sp.score.map(|score| (sp.pair.left_id, score)))
        .fold(
            AHashMap::default,
            |mut acc: AHashMap<u64, i64>, (id, score)| {
                acc.entry(id)
                    .and_modify(|current| *current = (*current).min(score))
                    .or_insert(score);
                acc
            },
        )
        .reduce(AHashMap::default, |mut left, right| {
            for (id, score) in right {
                left.entry(id)
                    .and_modify(|current| *current = (*current).min(score))
                    .or_insert(score);
            }
            left
        });

    parcels
        .iter()
        .map(|parcel| ParcelScore {
            parcel_id: parcel.id,
            compat_score: minimums.get(&parcel.id).copied().unwrap_or(DEFAULT_SCORE),
        })
        .collect()
}
