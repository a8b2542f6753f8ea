use ahash::AHashMap;
use geo::algorithm::bounding_rect::BoundingRect;
use geo::algorithm::intersects::Intersects;
use log::debug;
use rayon::prelude::*;

use crate::buffering::BufferedRegion;
use crate::models::{AdjacencyPair, Parcel};
use crate::spatial::{RTreeIndex, SpatialIndex};

/// Finds every directed pair of distinct parcels within the adjacency
/// threshold.
///
/// The index holds the bounding boxes of the *buffered* regions; each
/// parcel's *original* footprint queries it, and candidates are confirmed
/// with an exact intersection test against the candidate's buffered
/// geometry. Self-matches are dropped, so a parcel never neighbors itself
/// even at distance zero. Both directions of a neighborship come out
/// independently because every parcel runs its own query.
pub fn find_adjacent_pairs(parcels: &[Parcel], regions: &[BufferedRegion]) -> Vec<AdjacencyPair> {
    let region_by_id: AHashMap<u64, &BufferedRegion> =
        regions.iter().map(|r| (r.parcel_id, r)).collect();
    let use_by_id: AHashMap<u64, &str> = parcels
        .iter()
        .map(|p| (p.id, p.land_use.as_str()))
        .collect();

    let index = RTreeIndex::bulk_load(regions.iter().filter_map(|r| {
        r.region
            .bounding_rect()
            .map(|bbox| (r.parcel_id, bbox))
    }));
    debug!("spatial index built over {} buffered regions", index.len());

    parcels
        .par_iter()
        .flat_map_iter(|parcel| {
            let mut candidates = match parcel.geometry.bounding_rect() {
                Some(bbox) => index.query(&bbox),
                // Degenerate footprint with no extent: no neighbors.
                None => Vec::new(),
            };
            // Stable per-parcel candidate order keeps the emitted pair list
            // deterministic across runs.
            candidates.sort_unstable();

            candidates
                .into_iter()
                .filter(|right_id| *right_id != parcel.id)
                .filter(|right_id| {
                    region_by_id
                        .get(right_id)
                        .is_some_and(|candidate| parcel.geometry.intersects(&candidate.region))
                })
                .filter_map(|right_id| {
                    use_by_id.get(&right_id).map(|right_use| AdjacencyPair {
                        left_id: parcel.id,
                        left_use: parcel.land_use.clone(),
                        right_id,
                        right_use: (*right_use).to_string(),
                    })
                })
                .collect::<Vec<_>>()
        })
        .collect()
}
