use log::{info, warn};
use thiserror::Error;

use crate::adjacency;
use crate::buffering;
use crate::matrix::{CompatibilityMatrix, MatrixError};
use crate::models::{CoordSpace, Parcel, ScoredParcel};
use crate::reports::{self, ClassBreakdown, OverallSummary};
use crate::scoring;

/// Structural failures abort the whole run before any geometric work; there
/// is no partial output. Everything softer (unresolved lookups, degenerate
/// data, coordinate-space doubt) is absorbed into the data model instead.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("parcel collection is empty; nothing to audit")]
    EmptyParcelSet,
    #[error("adjacency distance must be a non-negative finite number, got {0}")]
    InvalidDistance(f64),
    #[error("land use field '{field}' not found; available fields: {}", available.join(", "))]
    MissingLandUseField {
        field: String,
        available: Vec<String>,
    },
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}

#[derive(Debug, Clone, Copy)]
pub struct AuditOptions {
    /// Buffer distance defining adjacency, in the coordinate unit.
    pub adjacency_distance: f64,
    pub coord_space: CoordSpace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditOutput {
    /// Every input parcel with its final worst-case score, in input order.
    pub parcels: Vec<ScoredParcel>,
    pub overall: OverallSummary,
    pub breakdown: ClassBreakdown,
    /// Directed adjacency pairs found (both directions counted).
    pub pair_count: usize,
    /// True when the coordinate space was not confirmed projected, meaning
    /// the adjacency distance, and hence every score, may be inaccurate.
    pub distance_caveat: bool,
}

/// Runs the full audit: buffer footprints, find neighbors through the
/// spatial index, score every directed pair against the matrix, reduce to
/// per-parcel worst-case scores, tabulate the summaries.
///
/// The five stages run strictly in order with no branching or retry, and
/// every stage tolerates empty intermediate data. Outputs are deterministic
/// for identical inputs.
pub fn run_audit(
    parcels: Vec<Parcel>,
    matrix: &CompatibilityMatrix,
    options: AuditOptions,
) -> Result<AuditOutput, AuditError> {
    if parcels.is_empty() {
        return Err(AuditError::EmptyParcelSet);
    }
    if !options.adjacency_distance.is_finite() || options.adjacency_distance < 0.0 {
        return Err(AuditError::InvalidDistance(options.adjacency_distance));
    }

    let distance_caveat = match options.coord_space {
        CoordSpace::Projected => false,
        CoordSpace::Geographic => {
            warn!(
                "coordinate space looks geographic; the adjacency distance is being \
                 interpreted in degrees and results may be unreliable"
            );
            true
        }
        CoordSpace::Unknown => {
            warn!("coordinate reference is undefined; adjacency distances may be inaccurate");
            true
        }
    };

    info!(
        "buffering {} parcels by {}",
        parcels.len(),
        options.adjacency_distance
    );
    let regions = buffering::buffer_regions(&parcels, options.adjacency_distance);

    let pairs = adjacency::find_adjacent_pairs(&parcels, &regions);
    let pair_count = pairs.len();
    info!("found {pair_count} directed adjacency pairs");

    let scored_pairs = scoring::score_pairs(pairs, matrix);
    let unresolved = scored_pairs.iter().filter(|sp| sp.score.is_none()).count();
    if unresolved > 0 {
        info!("{unresolved} pairs had no matrix entry and stay unresolved");
    }
    let scores = scoring::aggregate_worst_case(&parcels, &scored_pairs);

    let parcels: Vec<ScoredParcel> = parcels
        .into_iter()
        .zip(scores)
        .map(|(parcel, score)| ScoredParcel {
            id: parcel.id,
            geometry: parcel.geometry,
            land_use: parcel.land_use,
            compat_score: score.compat_score,
        })
        .collect();

    let overall = reports::overall_summary(&parcels);
    let breakdown = reports::class_breakdown(&parcels);

    Ok(AuditOutput {
        parcels,
        overall,
        breakdown,
        pair_count,
        distance_caveat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_SCORE;
    use geo_types::{MultiPolygon, polygon};

    fn parcel(id: u64, land_use: &str, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Parcel {
        Parcel {
            id,
            land_use: land_use.into(),
            geometry: MultiPolygon(vec![polygon![
                (x: min_x, y: min_y),
                (x: max_x, y: min_y),
                (x: max_x, y: max_y),
                (x: min_x, y: max_y),
            ]]),
        }
    }

    fn residential_industrial() -> (Vec<Parcel>, CompatibilityMatrix) {
        let parcels = vec![
            parcel(0, "Residential", 0.0, 0.0, 1.0, 1.0),
            parcel(1, "Industrial", 1.05, 0.0, 2.0, 1.0),
        ];
        let mut matrix = CompatibilityMatrix::new();
        matrix.insert("Residential", "Industrial", 1);
        matrix.insert("Industrial", "Residential", 1);
        (parcels, matrix)
    }

    fn options(distance: f64) -> AuditOptions {
        AuditOptions {
            adjacency_distance: distance,
            coord_space: CoordSpace::Projected,
        }
    }

    #[test]
    fn test_gap_within_buffer_scores_both_parcels() {
        let (parcels, matrix) = residential_industrial();
        let output = run_audit(parcels, &matrix, options(0.1)).unwrap();

        assert_eq!(output.pair_count, 2);
        assert_eq!(output.parcels[0].compat_score, 1);
        assert_eq!(output.parcels[1].compat_score, 1);
        assert_eq!(output.overall.rows[0].parcel_count, 2);
    }

    #[test]
    fn test_gap_beyond_buffer_defaults_both_parcels() {
        let (parcels, matrix) = residential_industrial();
        let output = run_audit(parcels, &matrix, options(0.01)).unwrap();

        assert_eq!(output.pair_count, 0);
        assert_eq!(output.parcels[0].compat_score, DEFAULT_SCORE);
        assert_eq!(output.parcels[1].compat_score, DEFAULT_SCORE);
    }

    #[test]
    fn test_asymmetric_matrix_scores_each_direction() {
        let parcels = vec![
            parcel(0, "A", 0.0, 0.0, 1.0, 1.0),
            parcel(1, "B", 1.05, 0.0, 2.0, 1.0),
        ];
        let mut matrix = CompatibilityMatrix::new();
        matrix.insert("A", "B", 2);
        matrix.insert("B", "A", 4);

        let output = run_audit(parcels, &matrix, options(0.1)).unwrap();
        assert_eq!(output.parcels[0].compat_score, 2);
        assert_eq!(output.parcels[1].compat_score, 4);
    }

    #[test]
    fn test_empty_matrix_defaults_every_parcel() {
        let (parcels, _) = residential_industrial();
        let matrix = CompatibilityMatrix::new();
        let output = run_audit(parcels, &matrix, options(0.1)).unwrap();

        // Pairs were found but none resolved; the default policy applies.
        assert_eq!(output.pair_count, 2);
        assert!(
            output
                .parcels
                .iter()
                .all(|p| p.compat_score == DEFAULT_SCORE)
        );
    }

    #[test]
    fn test_empty_parcel_set_is_structural() {
        let matrix = CompatibilityMatrix::new();
        let err = run_audit(Vec::new(), &matrix, options(10.0)).unwrap_err();
        assert!(matches!(err, AuditError::EmptyParcelSet));
    }

    #[test]
    fn test_negative_distance_is_structural() {
        let (parcels, matrix) = residential_industrial();
        let err = run_audit(parcels, &matrix, options(-1.0)).unwrap_err();
        assert!(matches!(err, AuditError::InvalidDistance(_)));
    }

    #[test]
    fn test_unconfirmed_coordinate_space_sets_caveat() {
        let (parcels, matrix) = residential_industrial();
        let output = run_audit(
            parcels,
            &matrix,
            AuditOptions {
                adjacency_distance: 0.1,
                coord_space: CoordSpace::Geographic,
            },
        )
        .unwrap();
        assert!(output.distance_caveat);
        // The run still completes with real scores.
        assert_eq!(output.parcels[0].compat_score, 1);
    }

    #[test]
    fn test_idempotence() {
        let (parcels, matrix) = residential_industrial();
        let first = run_audit(parcels.clone(), &matrix, options(0.1)).unwrap();
        let second = run_audit(parcels, &matrix, options(0.1)).unwrap();
        assert_eq!(first, second);
    }
}
