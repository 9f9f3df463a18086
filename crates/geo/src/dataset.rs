//! # Land Datasets
//!
//! The feature reader the search engine consumes: land polygons with a
//! bounding-box prefilter.
//!
//! ## Table of Contents
//! 1. LandGeometry — tagged polygon geometry
//! 2. LandFeature — one land mass or island
//! 3. LandDataset — bounding-box filtered reader trait
//! 4. IndexedLand — in-memory, R-tree backed dataset

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use geo::{BoundingRect, Geometry, LineString, MultiPolygon, Polygon, Rect};

use crate::coords::{project_multi_polygon, project_polygon, LocalFrame};
use crate::error::{DatasetError, ProjectionError, SearchError};
use crate::spatial_index::{IndexedFeature, LandSpatialIndex};
use crate::vector_import::{import_geojson, import_shapefile};
use crate::window::GeoWindow;

// ============================================================================
// 1. LandGeometry — tagged polygon geometry
// ============================================================================

/// Polygonal land geometry, in geographic degrees when read from a dataset
/// or in local meters once projected.
#[derive(Debug, Clone, PartialEq)]
pub enum LandGeometry {
    Polygon(Polygon<f64>),
    MultiPolygon(MultiPolygon<f64>),
}

impl LandGeometry {
    /// Keep the polygonal part of an arbitrary geometry. Collections are
    /// flattened; points and lines yield `None`.
    pub fn from_geometry(geometry: Geometry<f64>) -> Option<Self> {
        match geometry {
            Geometry::Polygon(p) => Some(LandGeometry::Polygon(p)),
            Geometry::MultiPolygon(mp) => Some(LandGeometry::MultiPolygon(mp)),
            Geometry::Rect(r) => Some(LandGeometry::Polygon(r.to_polygon())),
            Geometry::Triangle(t) => Some(LandGeometry::Polygon(t.to_polygon())),
            Geometry::GeometryCollection(collection) => {
                let polygons: Vec<Polygon<f64>> = collection
                    .into_iter()
                    .filter_map(LandGeometry::from_geometry)
                    .flat_map(LandGeometry::into_polygons)
                    .collect();
                if polygons.is_empty() {
                    None
                } else {
                    Some(LandGeometry::MultiPolygon(MultiPolygon::new(polygons)))
                }
            }
            _ => None,
        }
    }

    /// Member polygons
    pub fn polygons(&self) -> std::slice::Iter<'_, Polygon<f64>> {
        match self {
            LandGeometry::Polygon(p) => std::slice::from_ref(p).iter(),
            LandGeometry::MultiPolygon(mp) => mp.0.iter(),
        }
    }

    fn into_polygons(self) -> Vec<Polygon<f64>> {
        match self {
            LandGeometry::Polygon(p) => vec![p],
            LandGeometry::MultiPolygon(mp) => mp.0,
        }
    }

    /// Every ring of every member polygon: exteriors and holes
    pub fn rings(&self) -> impl Iterator<Item = &LineString<f64>> {
        self.polygons()
            .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors().iter()))
    }

    /// Bounding rectangle, `None` for empty geometry
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        match self {
            LandGeometry::Polygon(p) => p.bounding_rect(),
            LandGeometry::MultiPolygon(mp) => mp.bounding_rect(),
        }
    }

    /// Map every coordinate through the frame's forward transform
    pub fn project<F: LocalFrame + ?Sized>(&self, frame: &F) -> Result<LandGeometry, ProjectionError> {
        Ok(match self {
            LandGeometry::Polygon(p) => LandGeometry::Polygon(project_polygon(frame, p)?),
            LandGeometry::MultiPolygon(mp) => {
                LandGeometry::MultiPolygon(project_multi_polygon(frame, mp)?)
            }
        })
    }
}

impl From<Polygon<f64>> for LandGeometry {
    fn from(polygon: Polygon<f64>) -> Self {
        LandGeometry::Polygon(polygon)
    }
}

impl From<MultiPolygon<f64>> for LandGeometry {
    fn from(multi: MultiPolygon<f64>) -> Self {
        LandGeometry::MultiPolygon(multi)
    }
}

// ============================================================================
// 2. LandFeature — one land mass or island
// ============================================================================

/// A land feature read from a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct LandFeature {
    /// Feature index within the source file, unique per dataset
    pub index: usize,
    /// Feature name (from a "name" property, if present)
    pub name: Option<String>,
    /// Polygon geometry in WGS84 degrees
    pub geometry: LandGeometry,
}

// ============================================================================
// 3. LandDataset — bounding-box filtered reader trait
// ============================================================================

/// Lazy sequence of features returned by one bounding-box query
pub type FeatureIter<'a> = Box<dyn Iterator<Item = Result<Cow<'a, LandFeature>, DatasetError>> + 'a>;

/// A land polygon dataset with rectangular prefiltering.
///
/// `features_in` takes `&mut self`: a handle is a cursor and must not be
/// scanned from two places at once. Open one handle per concurrent query.
pub trait LandDataset {
    /// Identity of the dataset, echoed in search results
    fn path(&self) -> &Path;

    /// Features whose bounding box intersects `window`. This is a
    /// prefilter: callers still run exact geometric tests.
    fn features_in<'a>(&'a mut self, window: &GeoWindow) -> Result<FeatureIter<'a>, DatasetError>;
}

// ============================================================================
// 4. IndexedLand — in-memory, R-tree backed dataset
// ============================================================================

/// Land polygons held in memory with their envelopes in an R-tree.
pub struct IndexedLand {
    path: PathBuf,
    features: Vec<LandFeature>,
    index: LandSpatialIndex,
}

impl IndexedLand {
    /// Index already-loaded features. Features with empty geometry are dropped.
    /// Feature indices must be unique: the search measures each index once.
    pub fn from_features(path: impl Into<PathBuf>, features: Vec<LandFeature>) -> Result<Self, DatasetError> {
        let path = path.into();
        let mut seen = HashSet::with_capacity(features.len());
        if let Some(duplicate) = features.iter().find(|f| !seen.insert(f.index)) {
            return Err(DatasetError::DuplicateFeatureIndex {
                index: duplicate.index,
                path,
            });
        }
        Ok(Self::index_features(path, features))
    }

    /// Build the R-tree over `features`, whose indices are already unique
    fn index_features(path: PathBuf, features: Vec<LandFeature>) -> Self {
        let features: Vec<LandFeature> = features
            .into_iter()
            .filter(|f| f.geometry.bounding_rect().is_some())
            .collect();
        let entries: Vec<IndexedFeature> = features
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.geometry.bounding_rect().map(|r| IndexedFeature::from_rect(i, r)))
            .collect();

        tracing::info!("Indexed {} land features from {}", features.len(), path.display());

        Self {
            path,
            features,
            index: LandSpatialIndex::bulk_load(entries),
        }
    }

    /// Index arbitrary geometries, keeping only their polygonal parts
    pub fn from_geometries(
        path: impl Into<PathBuf>,
        geometries: impl IntoIterator<Item = Geometry<f64>>,
    ) -> Self {
        let features = geometries
            .into_iter()
            .enumerate()
            .filter_map(|(index, g)| {
                LandGeometry::from_geometry(g).map(|geometry| LandFeature {
                    index,
                    name: None,
                    geometry,
                })
            })
            .collect();
        Self::index_features(path.into(), features)
    }

    /// Load an ESRI shapefile (the `.shp`, with its `.dbf` alongside)
    pub fn open_shapefile(path: &Path) -> Result<Self, DatasetError> {
        Self::from_features(path, import_shapefile(path)?)
    }

    /// Load a GeoJSON FeatureCollection, Feature or bare Geometry
    pub fn open_geojson(path: &Path) -> Result<Self, DatasetError> {
        Self::from_features(path, import_geojson(path)?)
    }

    /// Open a dataset, choosing the reader from the file extension
    pub fn open(path: &Path) -> Result<Self, DatasetError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "shp" => Self::open_shapefile(path),
            "geojson" | "json" => Self::open_geojson(path),
            _ => Err(DatasetError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    /// [`IndexedLand::open`] with failures reported as a search error
    pub fn open_for_search(path: &Path) -> crate::error::Result<Self> {
        Self::open(path).map_err(|e| SearchError::DatasetOpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Number of indexed features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the dataset has no features
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl LandDataset for IndexedLand {
    fn path(&self) -> &Path {
        &self.path
    }

    fn features_in<'a>(&'a mut self, window: &GeoWindow) -> Result<FeatureIter<'a>, DatasetError> {
        let hits = self.index.query_window(window);
        let features = &self.features;
        Ok(Box::new(
            hits.into_iter().map(move |i| Ok(Cow::Borrowed(&features[i]))),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{point, polygon, Line, LineString, Point};

    fn square(x0: f64, y0: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x0 + size, y: y0),
            (x: x0 + size, y: y0 + size),
            (x: x0, y: y0 + size),
            (x: x0, y: y0),
        ]
    }

    #[test]
    fn test_from_geometry_keeps_polygons_only() {
        assert!(LandGeometry::from_geometry(Geometry::Point(point!(x: 1.0, y: 2.0))).is_none());
        assert!(LandGeometry::from_geometry(Geometry::Line(Line::new((0.0, 0.0), (1.0, 1.0)))).is_none());
        assert!(matches!(
            LandGeometry::from_geometry(Geometry::Polygon(square(0.0, 0.0, 1.0))),
            Some(LandGeometry::Polygon(_))
        ));
    }

    #[test]
    fn test_collection_is_flattened() {
        let collection = geo::GeometryCollection::new_from(vec![
            Geometry::Polygon(square(0.0, 0.0, 1.0)),
            Geometry::Point(Point::new(5.0, 5.0)),
            Geometry::MultiPolygon(MultiPolygon::new(vec![square(2.0, 2.0, 1.0), square(4.0, 4.0, 1.0)])),
        ]);
        match LandGeometry::from_geometry(Geometry::GeometryCollection(collection)) {
            Some(LandGeometry::MultiPolygon(mp)) => assert_eq!(mp.0.len(), 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rings_include_holes() {
        let with_hole = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]),
            vec![LineString::from(vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 1.0)])],
        );
        let geometry = LandGeometry::MultiPolygon(MultiPolygon::new(vec![with_hole, square(10.0, 10.0, 1.0)]));
        assert_eq!(geometry.rings().count(), 3);
        assert_eq!(geometry.polygons().count(), 2);
    }

    #[test]
    fn test_features_in_filters_by_window() {
        let mut land = IndexedLand::from_geometries(
            "memory",
            vec![
                Geometry::Polygon(square(0.0, 0.0, 1.0)),
                Geometry::Polygon(square(50.0, 50.0, 1.0)),
                Geometry::Point(Point::new(0.5, 0.5)),
            ],
        );
        assert_eq!(land.len(), 2);

        let found: Vec<usize> = land
            .features_in(&GeoWindow::new(-1.0, -1.0, 2.0, 2.0))
            .unwrap()
            .map(|f| f.unwrap().index)
            .collect();
        assert_eq!(found, vec![0]);

        // Restartable: a second query on the same handle sees everything again
        let all = land.features_in(&GeoWindow::global()).unwrap().count();
        assert_eq!(all, 2);
    }

    #[test]
    fn test_empty_polygons_are_dropped() {
        let empty = Polygon::new(LineString::new(vec![]), vec![]);
        let land = IndexedLand::from_geometries("memory", vec![Geometry::Polygon(empty)]);
        assert!(land.is_empty());
    }

    #[test]
    fn test_duplicate_feature_indices_are_rejected() {
        let feature = |index: usize, x0: f64| LandFeature {
            index,
            name: None,
            geometry: LandGeometry::Polygon(square(x0, 0.0, 1.0)),
        };

        let err = IndexedLand::from_features("dup.geojson", vec![feature(3, 0.0), feature(4, 5.0), feature(3, 10.0)])
            .err()
            .unwrap();
        assert!(matches!(err, DatasetError::DuplicateFeatureIndex { index: 3, .. }));
        assert_eq!(err.path(), Path::new("dup.geojson"));

        let land = IndexedLand::from_features("ok.geojson", vec![feature(3, 0.0), feature(4, 5.0)]).unwrap();
        assert_eq!(land.len(), 2);
    }

    #[test]
    fn test_open_rejects_unknown_extension() {
        let err = IndexedLand::open(Path::new("coast.gpkg")).err().unwrap();
        assert!(matches!(err, DatasetError::UnsupportedFormat { ref extension, .. } if extension == "gpkg"));
    }

    #[test]
    fn test_open_for_search_reports_path() {
        let err = IndexedLand::open_for_search(Path::new("/nonexistent/land.geojson")).err().unwrap();
        match err {
            SearchError::DatasetOpenFailed { path, reason } => {
                assert_eq!(path, PathBuf::from("/nonexistent/land.geojson"));
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
