use geo::algorithm::orient::{Direction, Orient};
use geo_buffer::buffer_multi_polygon;
use geo_types::MultiPolygon;
use rayon::prelude::*;

use crate::models::Parcel;

/// A parcel's proximity search region: its footprint expanded by the
/// adjacency distance, in the same coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferedRegion {
    pub parcel_id: u64,
    pub region: MultiPolygon<f64>,
}

/// Buffers every parcel footprint by `distance`. Pure per parcel, so the
/// work is spread across the rayon pool; output order follows input order.
pub fn buffer_regions(parcels: &[Parcel], distance: f64) -> Vec<BufferedRegion> {
    parcels
        .par_iter()
        .map(|parcel| BufferedRegion {
            parcel_id: parcel.id,
            region: buffer_region(&parcel.geometry, distance),
        })
        .collect()
}

/// Minkowski expansion of a single footprint by `distance`.
///
/// A zero distance keeps the footprint itself, so adjacency degenerates to
/// touching/overlapping and the skeleton computation is skipped entirely.
pub fn buffer_region(geometry: &MultiPolygon<f64>, distance: f64) -> MultiPolygon<f64> {
    if distance == 0.0 {
        return geometry.clone();
    }
    // geo-buffer expects conventionally wound rings; cadastral exports are
    // not always consistent about orientation.
    let oriented = geometry.orient(Direction::Default);
    buffer_multi_polygon(&oriented, distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::algorithm::intersects::Intersects;
    use geo_types::{Point, polygon};

    fn square(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: min_x, y: min_y),
            (x: max_x, y: min_y),
            (x: max_x, y: max_y),
            (x: min_x, y: max_y),
        ]])
    }

    #[test]
    fn test_zero_distance_keeps_footprint() {
        let geometry = square(0.0, 0.0, 1.0, 1.0);
        assert_eq!(buffer_region(&geometry, 0.0), geometry);
    }

    #[test]
    fn test_buffer_expands_past_edges() {
        let region = buffer_region(&square(0.0, 0.0, 1.0, 1.0), 0.1);
        // 0.05 beyond the right edge is inside, 0.2 beyond is not.
        assert!(region.intersects(&Point::new(1.05, 0.5)));
        assert!(!region.intersects(&Point::new(1.2, 0.5)));
        // The original footprint stays covered.
        assert!(region.intersects(&Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_buffer_regions_keeps_input_order() {
        let parcels = vec![
            Parcel {
                id: 7,
                geometry: square(0.0, 0.0, 1.0, 1.0),
                land_use: "Residential".into(),
            },
            Parcel {
                id: 3,
                geometry: square(5.0, 5.0, 6.0, 6.0),
                land_use: "Industrial".into(),
            },
        ];
        let regions = buffer_regions(&parcels, 0.5);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].parcel_id, 7);
        assert_eq!(regions[1].parcel_id, 3);
    }

    #[test]
    fn test_empty_parcel_set() {
        assert!(buffer_regions(&[], 10.0).is_empty());
    }
}
