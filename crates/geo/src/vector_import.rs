//! # Vector Data Import
//!
//! Reads land polygon files into `LandFeature`s in geographic degrees.
//!
//! ## Table of Contents
//! 1. GeoJSON import
//! 2. Shapefile import
//! 3. Feature property extraction

use std::path::Path;

use geojson::{Feature, GeoJson};

use crate::dataset::{LandFeature, LandGeometry};
use crate::error::DatasetError;

// ============================================================================
// 1. GeoJSON import
// ============================================================================

/// Import a GeoJSON file. Non-polygonal features are skipped.
pub fn import_geojson(path: &Path) -> Result<Vec<LandFeature>, DatasetError> {
    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_geojson(path, &content)
}

/// Parse GeoJSON text; `path` is only used for error context
pub fn parse_geojson(path: &Path, content: &str) -> Result<Vec<LandFeature>, DatasetError> {
    let parse_error = |message: String| DatasetError::GeoJson {
        path: path.to_path_buf(),
        message,
    };

    let geojson: GeoJson = content.parse().map_err(|e| parse_error(format!("{}", e)))?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => vec![Feature {
            bbox: None,
            geometry: Some(g),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    };

    let mut land_features = Vec::with_capacity(features.len());
    let mut skipped = 0usize;

    for (index, feature) in features.into_iter().enumerate() {
        let Some(geometry) = feature.geometry else {
            skipped += 1;
            continue;
        };
        let geometry: geo::Geometry<f64> = geometry
            .try_into()
            .map_err(|e: geojson::Error| parse_error(format!("feature {}: {}", index, e)))?;

        match LandGeometry::from_geometry(geometry) {
            Some(geometry) => land_features.push(LandFeature {
                index,
                name: extract_name(&feature.properties),
                geometry,
            }),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!(
            "Skipped {} non-polygonal features in {}",
            skipped,
            path.display()
        );
    }
    tracing::info!(
        "Imported {} land features from {}",
        land_features.len(),
        path.display()
    );

    Ok(land_features)
}

// ============================================================================
// 2. Shapefile import
// ============================================================================

/// Import the polygon records of an ESRI shapefile.
pub fn import_shapefile(path: &Path) -> Result<Vec<LandFeature>, DatasetError> {
    let shapefile_error = |e: shapefile::Error| DatasetError::Shapefile {
        path: path.to_path_buf(),
        message: format!("{}", e),
    };

    let mut reader = shapefile::Reader::from_path(path).map_err(shapefile_error)?;

    let mut land_features = Vec::new();
    let mut skipped = 0usize;

    for (index, record) in reader.iter_shapes_and_records().enumerate() {
        let (shape, _record) = record.map_err(shapefile_error)?;

        match shape {
            shapefile::Shape::Polygon(polygon) => {
                let multi: geo::MultiPolygon<f64> = polygon.into();
                if multi.0.is_empty() {
                    skipped += 1;
                    continue;
                }
                land_features.push(LandFeature {
                    index,
                    name: None,
                    geometry: LandGeometry::MultiPolygon(multi),
                });
            }
            other => {
                tracing::debug!("Skipping {:?} record {} in {}", other.shapetype(), index, path.display());
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(
            "Skipped {} non-polygon or empty records in {}",
            skipped,
            path.display()
        );
    }
    tracing::info!(
        "Imported {} land features from {}",
        land_features.len(),
        path.display()
    );

    Ok(land_features)
}

// ============================================================================
// 3. Feature property extraction
// ============================================================================

/// Extract a "name" property from GeoJSON feature properties
fn extract_name(properties: &Option<serde_json::Map<String, serde_json::Value>>) -> Option<String> {
    properties.as_ref().and_then(|props| {
        props.get("name")
            .or_else(|| props.get("Name"))
            .or_else(|| props.get("NAME"))
            .and_then(|v| v.as_str().map(|s| s.to_string()))
    })
}
