use geo_types::MultiPolygon;
use serde::Serialize;

/// Lowest score a policy matrix is expected to assign (least compatible).
pub const MIN_SCORE: i64 = 1;
/// Highest score a policy matrix is expected to assign (most compatible).
pub const MAX_SCORE: i64 = 5;

/// Score given to a parcel with no adjacency pairs, or whose pairs all
/// failed to resolve against the matrix. Biasing toward "fully compatible"
/// keeps incomplete neighbor or matrix data from flagging parcels on its
/// own; a spike at this score in the summary reports is the signal that
/// matrix coverage is incomplete.
pub const DEFAULT_SCORE: i64 = MAX_SCORE;

/// What the loader believes about the coordinate reference of the parcel
/// set. The engine never reprojects; it only flags when distances are
/// interpreted in a space where they may not be metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordSpace {
    /// Linear/metric units; the adjacency distance means what it says.
    Projected,
    /// Degrees. The run proceeds but results carry a caveat.
    Geographic,
    /// No coordinate reference declared at all.
    Unknown,
}

/// A single land unit: polygon boundary (multi-part parcels allowed) plus a
/// land-use classification. Ids are unique within one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    pub id: u64,
    pub geometry: MultiPolygon<f64>,
    pub land_use: String,
}

/// A parcel with its final worst-case compatibility score attached. This is
/// the primary output artifact of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredParcel {
    pub id: u64,
    pub geometry: MultiPolygon<f64>,
    pub land_use: String,
    pub compat_score: i64,
}

/// One directed pair of distinct parcels found within the adjacency
/// threshold. Both directions of a geometric neighborship are emitted
/// independently; aggregation holds the *left* parcel's perspective fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdjacencyPair {
    pub left_id: u64,
    pub left_use: String,
    pub right_id: u64,
    pub right_use: String,
}

/// An adjacency pair after the matrix lookup. `score` is `None` when the
/// ordered class pair is absent from the matrix — an explicit unresolved
/// state, distinct from any real (even out-of-range) score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredPair {
    pub pair: AdjacencyPair,
    pub score: Option<i64>,
}

/// Final per-parcel result of the worst-case aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParcelScore {
    pub parcel_id: u64,
    pub compat_score: i64,
}
