//! # Nearest-Land Search
//!
//! Expanding-window search for the nearest land boundary point.
//!
//! ## Algorithm
//! ```text
//! query ──► AEQD frame centered on query
//!   radius = initial
//!   loop:
//!     boxes = window(radius)            (split at ±180°)
//!     for feature in dataset ∩ boxes:
//!       project → inside/touching? ──► in land, stop everything
//!       nearest point on every ring ──► keep global minimum
//!     trusted minimum? ──► stop
//!     radius = min(radius · growth, max)
//!   local best point ──► WGS84
//! ```
//!
//! ## Table of Contents
//! 1. SearchParams — tunable constants
//! 2. DistanceResult — search output
//! 3. SearchState — per-invocation working state
//! 4. NearestLandSearch — the engine
//! 5. Boundary distance helpers

use std::collections::HashSet;
use std::ops::ControlFlow;
use std::path::PathBuf;

use geo::{Closest, ClosestPoint, Intersects, LineString, Point};
use serde::{Deserialize, Serialize};

use crate::coords::{AeqdFrame, FrameBackend, LocalFrame, QueryPoint};
use crate::dataset::{LandDataset, LandGeometry};
use crate::error::{Result, SearchError};
use crate::window::{search_windows, GeoWindow, GLOBAL_RADIUS_M};

/// Boundary distance (meters) at or below which a query counts as touching
/// land. Absorbs round-off from projecting vertices that lie exactly on the
/// query's parallel or meridian.
pub const BOUNDARY_TOLERANCE_M: f64 = 1e-3;

// ============================================================================
// 1. SearchParams — tunable constants
// ============================================================================

/// Tunable constants of the expanding-window search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// First window half-extent in meters
    pub initial_radius_m: f64,
    /// Largest window half-extent; the search gives up after scanning it
    pub max_radius_m: f64,
    /// A best distance `d` is trusted once `d · trust_margin <= radius`.
    /// This is the stricter direction: the point must sit well inside the window.
    pub trust_margin: f64,
    /// Factor applied to the radius after each untrusted pass
    pub growth_factor: f64,
    /// Library used to build the local frame
    pub frame: FrameBackend,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            initial_radius_m: 10_000.0,
            max_radius_m: GLOBAL_RADIUS_M,
            trust_margin: 1.2,
            growth_factor: 2.0,
            frame: FrameBackend::Geodesic,
        }
    }
}

impl SearchParams {
    /// Reject parameter sets that could not terminate or make no sense
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(SearchError::InvalidParams(msg));

        if !(self.initial_radius_m.is_finite() && self.initial_radius_m > 0.0) {
            return invalid(format!("initial_radius_m must be > 0 (got {})", self.initial_radius_m));
        }
        if !(self.max_radius_m.is_finite() && self.max_radius_m >= self.initial_radius_m) {
            return invalid(format!(
                "max_radius_m must be >= initial_radius_m (got {} < {})",
                self.max_radius_m, self.initial_radius_m
            ));
        }
        if !(self.trust_margin.is_finite() && self.trust_margin >= 1.0) {
            return invalid(format!("trust_margin must be >= 1.0 (got {})", self.trust_margin));
        }
        if !(self.growth_factor.is_finite() && self.growth_factor > 1.0) {
            return invalid(format!("growth_factor must be > 1.0 (got {})", self.growth_factor));
        }
        Ok(())
    }
}

// ============================================================================
// 2. DistanceResult — search output
// ============================================================================

/// Outcome of one nearest-land query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceResult {
    /// Geodesic distance to the nearest land point in meters (0 when in land)
    pub geodesic_m: f64,
    /// Nearest land point latitude (the query latitude when in land)
    pub land_lat_deg: f64,
    /// Nearest land point longitude (the query longitude when in land)
    pub land_lon_deg: f64,
    /// Whether the query point is inside or on the boundary of a land polygon
    pub in_land: bool,
    /// Provider the dataset came from
    pub provider_id: String,
    /// Dataset the search ran against
    pub dataset_path: PathBuf,
    /// Window radius at which the result was accepted
    pub stop_radius_m: f64,
}

// ============================================================================
// 3. SearchState — per-invocation working state
// ============================================================================

/// Marker carried out of the scan loops when the query is on land.
struct Landfall;

struct SearchState {
    best_distance_m: f64,
    best_point_local: Option<Point<f64>>,
    in_land: bool,
    radius_m: f64,
    /// Features already measured at a smaller radius
    examined: HashSet<usize>,
}

impl SearchState {
    fn new(initial_radius_m: f64) -> Self {
        Self {
            best_distance_m: f64::INFINITY,
            best_point_local: None,
            in_land: false,
            radius_m: initial_radius_m,
            examined: HashSet::new(),
        }
    }

    /// Keep `point` if it is strictly closer than the current best
    fn offer(&mut self, distance_m: f64, point: Point<f64>) {
        if distance_m < self.best_distance_m {
            self.best_distance_m = distance_m;
            self.best_point_local = Some(point);
        }
    }

    fn enter_land(&mut self, query_local: Point<f64>) {
        self.in_land = true;
        self.best_distance_m = 0.0;
        self.best_point_local = Some(query_local);
    }

    /// Whether the best distance is the true minimum: either comfortably
    /// inside the scanned window or the window covered the whole globe.
    fn is_trusted(&self, trust_margin: f64, scanned_globe: bool) -> bool {
        self.best_distance_m.is_finite()
            && (self.best_distance_m * trust_margin <= self.radius_m || scanned_globe)
    }

    fn grow(&mut self, growth_factor: f64, max_radius_m: f64) {
        self.radius_m = (self.radius_m * growth_factor).min(max_radius_m);
    }
}

// ============================================================================
// 4. NearestLandSearch — the engine
// ============================================================================

/// Nearest-land search engine. Holds only its parameters; every call builds
/// its own frame and state, so one engine can serve many queries.
#[derive(Debug, Clone, Default)]
pub struct NearestLandSearch {
    params: SearchParams,
}

impl NearestLandSearch {
    /// Create an engine after validating `params`
    pub fn new(params: SearchParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    /// Find the nearest land point to `query` in `dataset`.
    pub fn find_nearest_land<D: LandDataset + ?Sized>(
        &self,
        query: QueryPoint,
        dataset: &mut D,
        provider_id: &str,
    ) -> Result<DistanceResult> {
        let params = &self.params;

        let frame = AeqdFrame::new(query, params.frame)?;
        let (qx, qy) = frame.to_local(query.lon_deg, query.lat_deg)?;
        let query_local = Point::new(qx, qy);

        let mut state = SearchState::new(params.initial_radius_m);

        loop {
            let windows = search_windows(query, state.radius_m);
            let scanned_globe = windows.iter().any(GeoWindow::is_global);

            tracing::debug!(
                "radius {:.0} m: scanning {} window(s) around ({}, {})",
                state.radius_m,
                windows.len(),
                query.lat_deg,
                query.lon_deg
            );

            if self
                .scan_radius(&frame, query_local, &windows, dataset, &mut state)?
                .is_break()
            {
                state.enter_land(query_local);
                break;
            }

            if state.is_trusted(params.trust_margin, scanned_globe) {
                break;
            }
            if state.radius_m >= params.max_radius_m {
                break;
            }
            state.grow(params.growth_factor, params.max_radius_m);
        }

        let dataset_path = dataset.path().to_path_buf();

        if state.in_land {
            tracing::info!(
                "({}, {}) is on land (provider={}, radius {:.0} m)",
                query.lat_deg,
                query.lon_deg,
                provider_id,
                state.radius_m
            );
            return Ok(DistanceResult {
                geodesic_m: 0.0,
                land_lat_deg: query.lat_deg,
                land_lon_deg: query.lon_deg,
                in_land: true,
                provider_id: provider_id.to_string(),
                dataset_path,
                stop_radius_m: state.radius_m,
            });
        }

        let best = match state.best_point_local {
            Some(point) if state.best_distance_m.is_finite() => point,
            _ => {
                return Err(SearchError::NoLandFound {
                    lat: query.lat_deg,
                    lon: query.lon_deg,
                    radius_m: state.radius_m,
                })
            }
        };

        let (land_lon, land_lat) = frame.to_geographic(best.x(), best.y())?;

        tracing::info!(
            "Nearest land to ({}, {}) is ({:.8}, {:.8}) at {:.3} m (provider={}, radius {:.0} m)",
            query.lat_deg,
            query.lon_deg,
            land_lat,
            land_lon,
            state.best_distance_m,
            provider_id,
            state.radius_m
        );

        Ok(DistanceResult {
            geodesic_m: state.best_distance_m,
            land_lat_deg: land_lat,
            land_lon_deg: land_lon,
            in_land: false,
            provider_id: provider_id.to_string(),
            dataset_path,
            stop_radius_m: state.radius_m,
        })
    }

    /// Scan every box of one radius. Breaks as soon as one box finds land.
    fn scan_radius<D: LandDataset + ?Sized>(
        &self,
        frame: &AeqdFrame,
        query_local: Point<f64>,
        windows: &[GeoWindow],
        dataset: &mut D,
        state: &mut SearchState,
    ) -> Result<ControlFlow<Landfall>> {
        for window in windows {
            if let ControlFlow::Break(landfall) =
                self.scan_window(frame, query_local, window, dataset, state)?
            {
                return Ok(ControlFlow::Break(landfall));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Measure every not-yet-examined feature in one box.
    fn scan_window<D: LandDataset + ?Sized>(
        &self,
        frame: &AeqdFrame,
        query_local: Point<f64>,
        window: &GeoWindow,
        dataset: &mut D,
        state: &mut SearchState,
    ) -> Result<ControlFlow<Landfall>> {
        let mut measured = 0usize;

        for feature in dataset.features_in(window)? {
            let feature = feature?;
            if !state.examined.insert(feature.index) {
                continue;
            }

            let local = match feature.geometry.project(frame) {
                Ok(local) => local,
                Err(e) => {
                    tracing::warn!("Skipping land feature {}: {}", feature.index, e);
                    continue;
                }
            };
            measured += 1;

            if touches_or_contains(&local, query_local) {
                tracing::debug!(
                    "Query lies in land feature {}{}",
                    feature.index,
                    feature.name.as_deref().map(|n| format!(" ({})", n)).unwrap_or_default()
                );
                return Ok(ControlFlow::Break(Landfall));
            }

            if let Some((distance_m, point)) = nearest_on_boundary(&local, query_local) {
                if distance_m <= BOUNDARY_TOLERANCE_M {
                    tracing::debug!("Query touches boundary of land feature {}", feature.index);
                    return Ok(ControlFlow::Break(Landfall));
                }
                state.offer(distance_m, point);
            }
        }

        tracing::debug!(
            "window {}: measured {} new feature(s), best {:.3} m",
            window,
            measured,
            state.best_distance_m
        );
        Ok(ControlFlow::Continue(()))
    }
}

/// Run one query with default parameters
pub fn find_nearest_land<D: LandDataset + ?Sized>(
    query: QueryPoint,
    dataset: &mut D,
    provider_id: &str,
) -> Result<DistanceResult> {
    NearestLandSearch::default().find_nearest_land(query, dataset, provider_id)
}

// ============================================================================
// 5. Boundary distance helpers
// ============================================================================

/// Whether the (projected) land geometry contains or touches `point`
fn touches_or_contains(geometry: &LandGeometry, point: Point<f64>) -> bool {
    match geometry {
        LandGeometry::Polygon(p) => p.intersects(&point),
        LandGeometry::MultiPolygon(mp) => mp.intersects(&point),
    }
}

/// Nearest point to `point` over every ring of `geometry`, with its distance
fn nearest_on_boundary(geometry: &LandGeometry, point: Point<f64>) -> Option<(f64, Point<f64>)> {
    geometry
        .rings()
        .filter_map(|ring| nearest_on_ring(ring, point))
        .fold(None, |best: Option<(f64, Point<f64>)>, candidate| match best {
            Some(b) if b.0 <= candidate.0 => Some(b),
            _ => Some(candidate),
        })
}

/// Nearest point on a ring treated as one continuous polyline
fn nearest_on_ring(ring: &LineString<f64>, point: Point<f64>) -> Option<(f64, Point<f64>)> {
    if ring.0.len() < 2 {
        return None;
    }
    let nearest = match ring.closest_point(&point) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => p,
        Closest::Indeterminate => return None,
    };
    let distance = (nearest.x() - point.x()).hypot(nearest.y() - point.y());
    distance.is_finite().then_some((distance, nearest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::Path;

    use geo::{polygon, Geometry, MultiPolygon, Polygon};

    use crate::dataset::{FeatureIter, IndexedLand};
    use crate::error::DatasetError;

    /// Axis-aligned box in degrees: lon in [x0, x1], lat in [y0, y1]
    fn lonlat_box(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x1, y: y0),
            (x: x1, y: y1),
            (x: x0, y: y1),
            (x: x0, y: y0),
        ]
    }

    fn unit_square() -> IndexedLand {
        IndexedLand::from_geometries("square.geojson", vec![Geometry::Polygon(lonlat_box(0.0, 0.0, 1.0, 1.0))])
    }

    fn query(lat: f64, lon: f64) -> QueryPoint {
        QueryPoint::new(lat, lon).unwrap()
    }

    /// Wraps a dataset and counts the features it hands out
    struct CountingDataset {
        inner: IndexedLand,
        yielded: Cell<usize>,
    }

    impl LandDataset for CountingDataset {
        fn path(&self) -> &Path {
            self.inner.path()
        }

        fn features_in<'a>(&'a mut self, window: &GeoWindow) -> std::result::Result<FeatureIter<'a>, DatasetError> {
            let yielded = &self.yielded;
            let inner = self.inner.features_in(window)?;
            Ok(Box::new(inner.inspect(move |_| yielded.set(yielded.get() + 1))))
        }
    }

    #[test]
    fn test_inside_square_is_in_land() {
        let mut land = unit_square();
        let result = find_nearest_land(query(0.5, 0.5), &mut land, "test").unwrap();
        assert!(result.in_land);
        assert_eq!(result.geodesic_m, 0.0);
        assert_eq!(result.land_lat_deg, 0.5);
        assert_eq!(result.land_lon_deg, 0.5);
        assert_eq!(result.provider_id, "test");
        assert_eq!(result.dataset_path, PathBuf::from("square.geojson"));
    }

    #[test]
    fn test_one_degree_west_of_square() {
        let mut land = unit_square();
        let result = find_nearest_land(query(0.0, -1.0), &mut land, "test").unwrap();
        assert!(!result.in_land);
        assert!(
            (result.geodesic_m - 111_320.0).abs() / 111_320.0 < 0.01,
            "geodesic_m = {}",
            result.geodesic_m
        );
        assert!(result.land_lat_deg.abs() < 0.01, "lat = {}", result.land_lat_deg);
        assert!(result.land_lon_deg.abs() < 1e-5, "lon = {}", result.land_lon_deg);
    }

    #[test]
    fn test_boundary_points_count_as_land() {
        let mut land = unit_square();
        // On an edge
        let edge = find_nearest_land(query(0.0, 0.5), &mut land, "test").unwrap();
        assert!(edge.in_land);
        assert_eq!(edge.geodesic_m, 0.0);
        // On a vertex
        let vertex = find_nearest_land(query(1.0, 1.0), &mut land, "test").unwrap();
        assert!(vertex.in_land);
        assert_eq!((vertex.land_lat_deg, vertex.land_lon_deg), (1.0, 1.0));
    }

    #[test]
    fn test_just_outside_edge_is_not_land() {
        let mut land = unit_square();
        let result = find_nearest_land(query(-0.001, 0.5), &mut land, "test").unwrap();
        assert!(!result.in_land);
        assert!(result.geodesic_m > 100.0 && result.geodesic_m < 120.0, "{}", result.geodesic_m);
    }

    #[test]
    fn test_point_in_hole_measures_to_hole_ring() {
        let lagoon = Polygon::new(
            lonlat_box(0.0, 0.0, 10.0, 10.0).exterior().clone(),
            vec![lonlat_box(4.0, 4.0, 6.0, 6.0).exterior().clone()],
        );
        let mut land = IndexedLand::from_geometries("lagoon", vec![Geometry::Polygon(lagoon)]);
        let result = find_nearest_land(query(5.0, 5.0), &mut land, "test").unwrap();
        assert!(!result.in_land);
        assert!(result.geodesic_m > 100_000.0 && result.geodesic_m < 112_000.0, "{}", result.geodesic_m);
    }

    #[test]
    fn test_in_land_stops_scanning() {
        let mut land = CountingDataset {
            inner: IndexedLand::from_geometries(
                "two",
                vec![
                    Geometry::Polygon(lonlat_box(0.0, 0.0, 1.0, 1.0)),
                    Geometry::Polygon(lonlat_box(0.52, 0.52, 0.6, 0.6)),
                ],
            ),
            yielded: Cell::new(0),
        };
        let result = find_nearest_land(query(0.5, 0.5), &mut land, "test").unwrap();
        assert!(result.in_land);
        assert_eq!(land.yielded.get(), 1);
        assert_eq!(result.stop_radius_m, 10_000.0);
    }

    #[test]
    fn test_empty_dataset_is_no_land_found() {
        let mut land = IndexedLand::from_geometries("empty", Vec::<Geometry<f64>>::new());
        match find_nearest_land(query(10.0, 10.0), &mut land, "test") {
            Err(SearchError::NoLandFound { lat, lon, radius_m }) => {
                assert_eq!((lat, lon), (10.0, 10.0));
                assert_eq!(radius_m, GLOBAL_RADIUS_M);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_max_radius_bounds_the_search() {
        let mut land = unit_square();
        let engine = NearestLandSearch::new(SearchParams {
            max_radius_m: 50_000.0,
            ..SearchParams::default()
        })
        .unwrap();
        let err = engine.find_nearest_land(query(0.0, -5.0), &mut land, "test").unwrap_err();
        assert!(matches!(err, SearchError::NoLandFound { radius_m, .. } if radius_m == 50_000.0));
    }

    #[test]
    fn test_far_land_is_found_through_the_global_window() {
        // Square is ~17 800 km away: only the last, global window reaches it
        let mut land = unit_square();
        let result = find_nearest_land(query(-10.0, -160.0), &mut land, "test").unwrap();
        assert!(!result.in_land);
        assert!(result.geodesic_m > 15_000_000.0, "{}", result.geodesic_m);
        assert_eq!(result.stop_radius_m, GLOBAL_RADIUS_M);
    }

    #[test]
    fn test_trust_margin_holds_for_several_settings() {
        let settings = [
            (10_000.0, 1.2, 2.0),
            (111_000.0, 1.0, 2.0),
            (5_000.0, 3.0, 3.0),
            (1_000.0, 1.5, 1.5),
        ];
        for (initial, margin, growth) in settings {
            let engine = NearestLandSearch::new(SearchParams {
                initial_radius_m: initial,
                trust_margin: margin,
                growth_factor: growth,
                ..SearchParams::default()
            })
            .unwrap();
            let mut land = unit_square();
            let result = engine.find_nearest_land(query(0.0, -1.0), &mut land, "test").unwrap();
            assert!(
                result.geodesic_m * margin <= result.stop_radius_m,
                "initial={initial} margin={margin}: {} * {margin} > {}",
                result.geodesic_m,
                result.stop_radius_m
            );
            assert!((result.geodesic_m - 111_320.0).abs() / 111_320.0 < 0.01);
        }
    }

    #[test]
    fn test_default_schedule_stops_at_first_trusted_radius() {
        let mut land = unit_square();
        let result = find_nearest_land(query(0.0, -1.0), &mut land, "test").unwrap();
        // 10k → 20k → 40k → 80k → 160k: the square enters the window at 160 km
        assert_eq!(result.stop_radius_m, 160_000.0);
    }

    #[test]
    fn test_land_across_antimeridian_is_found() {
        let mut land = IndexedLand::from_geometries(
            "east-of-seam",
            vec![Geometry::Polygon(lonlat_box(-180.0, -0.5, -179.5, 0.5))],
        );
        let result = find_nearest_land(query(0.0, 179.9), &mut land, "test").unwrap();
        assert!(!result.in_land);
        assert!((result.geodesic_m - 11_132.0).abs() < 50.0, "{}", result.geodesic_m);
        assert!((result.land_lon_deg.abs() - 180.0).abs() < 1e-5, "{}", result.land_lon_deg);
        assert!(result.land_lat_deg.abs() < 1e-6);
        assert_eq!(result.stop_radius_m, 20_000.0);
    }

    #[test]
    fn test_antimeridian_symmetry() {
        let straddling = MultiPolygon::new(vec![
            lonlat_box(179.5, 1.0, 180.0, 2.0),
            lonlat_box(-180.0, 1.0, -179.5, 2.0),
        ]);
        let mut land = IndexedLand::from_geometries("straddle", vec![Geometry::MultiPolygon(straddling)]);

        let west = find_nearest_land(query(0.0, 179.9), &mut land, "test").unwrap();
        let east = find_nearest_land(query(0.0, -179.9), &mut land, "test").unwrap();

        assert!(!west.in_land && !east.in_land);
        assert!((west.geodesic_m - 110_574.0).abs() < 100.0, "{}", west.geodesic_m);
        assert!((west.geodesic_m - east.geodesic_m).abs() < 1e-3);
        assert!((west.land_lon_deg + east.land_lon_deg).abs() < 1e-6);
        assert!((west.land_lat_deg - east.land_lat_deg).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let mut land = IndexedLand::from_geometries(
            "islands",
            vec![
                Geometry::Polygon(lonlat_box(0.0, 0.0, 1.0, 1.0)),
                Geometry::Polygon(lonlat_box(2.0, -1.0, 2.5, -0.5)),
                Geometry::Polygon(lonlat_box(-3.0, 2.0, -2.0, 3.0)),
            ],
        );
        let first = find_nearest_land(query(-0.3, 1.7), &mut land, "test").unwrap();
        let second = find_nearest_land(query(-0.3, 1.7), &mut land, "test").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.geodesic_m.to_bits(), second.geodesic_m.to_bits());
    }

    #[test]
    fn test_nearest_of_several_features() {
        let mut land = IndexedLand::from_geometries(
            "islands",
            vec![
                Geometry::Polygon(lonlat_box(1.0, 0.0, 2.0, 1.0)),
                Geometry::Polygon(lonlat_box(-0.5, -0.2, -0.3, 0.2)),
            ],
        );
        let result = find_nearest_land(query(0.0, 0.0), &mut land, "test").unwrap();
        // West island edge at lon -0.3, ~33.4 km away
        assert!((result.geodesic_m - 33_396.0).abs() < 50.0, "{}", result.geodesic_m);
        assert!((result.land_lon_deg + 0.3).abs() < 1e-4);
    }

    #[test]
    fn test_land_across_the_pole_beats_land_on_the_same_meridian() {
        // From 80°N, 0°: island A sits just past the pole, island B 15° due south
        let mut land = IndexedLand::from_geometries(
            "arctic",
            vec![
                Geometry::Polygon(lonlat_box(170.0, 86.0, 180.0, 87.0)),
                Geometry::Polygon(lonlat_box(-1.0, 64.0, 1.0, 65.0)),
            ],
        );
        let result = find_nearest_land(query(80.0, 0.0), &mut land, "test").unwrap();

        assert!(!result.in_land);
        assert!((result.geodesic_m - 1_447_972.0).abs() < 1_000.0, "{}", result.geodesic_m);
        assert!(result.land_lat_deg > 86.9, "{}", result.land_lat_deg);
        assert!((result.land_lon_deg - 170.0).abs() < 0.5, "{}", result.land_lon_deg);
        assert!(result.geodesic_m * 1.2 <= result.stop_radius_m);
    }

    #[test]
    fn test_params_validation() {
        assert!(SearchParams::default().validate().is_ok());
        let bad = [
            SearchParams { initial_radius_m: 0.0, ..SearchParams::default() },
            SearchParams { max_radius_m: 5_000.0, ..SearchParams::default() },
            SearchParams { trust_margin: 0.9, ..SearchParams::default() },
            SearchParams { growth_factor: 1.0, ..SearchParams::default() },
            SearchParams { initial_radius_m: f64::NAN, ..SearchParams::default() },
        ];
        for params in bad {
            assert!(matches!(NearestLandSearch::new(params), Err(SearchError::InvalidParams(_))));
        }
    }

    #[test]
    fn test_nearest_on_ring_follows_the_polyline() {
        let ring: LineString<f64> = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)].into();
        let (d, p) = nearest_on_ring(&ring, Point::new(12.0, 5.0)).unwrap();
        assert!((d - 2.0).abs() < 1e-12);
        assert_eq!(p, Point::new(10.0, 5.0));

        let degenerate: LineString<f64> = vec![(1.0, 1.0)].into();
        assert!(nearest_on_ring(&degenerate, Point::new(0.0, 0.0)).is_none());
    }
}
