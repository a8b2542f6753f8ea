use anyhow::{Context, Result, bail};
use geo_types::{Geometry, MultiPolygon};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, GeoJson};
use glassbox::models::{CoordSpace, Parcel, ScoredParcel};
use glassbox::pipeline::AuditError;
use log::warn;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub struct LoadedParcels {
    pub parcels: Vec<Parcel>,
    pub coord_space: CoordSpace,
}

/// Reads a GeoJSON FeatureCollection of parcels, selecting the land-use
/// class from the property named `land_use_field`. Ids are synthesized as
/// 0..N-1 in file order.
///
/// RFC 7946 GeoJSON is nominally WGS84 (geographic), which would make the
/// adjacency distance a degree count. Files exported from projected sources
/// usually carry a legacy `crs` member; that, or `assume_projected`, is what
/// marks the coordinate space as trustworthy. Reprojection stays the
/// producer's job.
pub fn load_parcels(
    path: &Path,
    land_use_field: &str,
    assume_projected: bool,
) -> Result<LoadedParcels> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read parcel file {}", path.display()))?;
    let geojson: GeoJson = raw
        .parse()
        .with_context(|| format!("{} is not valid GeoJSON", path.display()))?;
    let collection = FeatureCollection::try_from(geojson)
        .context("parcel input must be a GeoJSON FeatureCollection")?;

    let has_crs_member = collection
        .foreign_members
        .as_ref()
        .is_some_and(|members| members.contains_key("crs"));
    let coord_space = if assume_projected || has_crs_member {
        CoordSpace::Projected
    } else {
        warn!("no crs member in {}; assuming geographic coordinates", path.display());
        CoordSpace::Geographic
    };

    let mut parcels = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        let land_use = land_use_value(&feature, land_use_field, index)?;
        let geometry = feature
            .geometry
            .with_context(|| format!("feature {index} has no geometry"))?;
        let geometry = Geometry::<f64>::try_from(geometry.value)
            .with_context(|| format!("feature {index}: geometry could not be converted"))?;
        let geometry = match geometry {
            Geometry::Polygon(polygon) => MultiPolygon(vec![polygon]),
            Geometry::MultiPolygon(multi) => multi,
            _ => bail!("feature {index}: expected Polygon or MultiPolygon geometry"),
        };
        parcels.push(Parcel {
            id: index as u64,
            geometry,
            land_use,
        });
    }

    Ok(LoadedParcels {
        parcels,
        coord_space,
    })
}

fn land_use_value(feature: &Feature, field: &str, index: usize) -> Result<String> {
    let properties = feature.properties.as_ref();
    match properties.and_then(|props| props.get(field)) {
        Some(JsonValue::String(value)) => Ok(value.clone()),
        Some(JsonValue::Number(value)) => Ok(value.to_string()),
        Some(other) => bail!(
            "feature {index}: land use field '{field}' holds a non-scalar value: {other}"
        ),
        None => {
            let available = properties
                .map(|props| props.keys().cloned().collect::<Vec<_>>())
                .unwrap_or_default();
            Err(AuditError::MissingLandUseField {
                field: field.to_string(),
                available,
            }
            .into())
        }
    }
}

/// Writes the scored parcel set back out as a FeatureCollection, carrying
/// the land-use class under its original property name plus the derived
/// `compat_score`.
pub fn write_scored_geojson(
    path: &Path,
    parcels: &[ScoredParcel],
    land_use_field: &str,
) -> Result<()> {
    let features = parcels
        .iter()
        .map(|parcel| {
            let mut properties = serde_json::Map::new();
            properties.insert(
                land_use_field.to_string(),
                JsonValue::String(parcel.land_use.clone()),
            );
            properties.insert("compat_score".to_string(), parcel.compat_score.into());
            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(
                    &parcel.geometry,
                ))),
                id: Some(Id::Number(parcel.id.into())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    fs::write(path, collection.to_string())
        .with_context(|| format!("could not write scored parcels to {}", path.display()))
}
