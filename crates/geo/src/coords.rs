//! # Coordinate Transforms
//!
//! Moves geometry between WGS84 geographic degrees and a local
//! azimuthal-equidistant (AEQD) frame centered on the query point.
//!
//! ## Pipeline
//! ```text
//! Geographic (WGS84)  →  Local AEQD (meters)  →  Geographic (WGS84)
//!   lon/lat degrees       x east, y north          nearest land point
//! ```
//!
//! In the AEQD frame the planar distance from the origin is the geodesic
//! distance from the center, so nearest-point and containment tests can run
//! on plain Euclidean geometry.
//!
//! ## Table of Contents
//! 1. QueryPoint — WGS84 query position
//! 2. LocalFrame — transform pair trait
//! 3. Geodesic AEQD (pure Rust, default)
//! 4. PROJ-based AEQD (feature-gated)
//! 5. AeqdFrame — backend selection
//! 6. Geometry projection helpers

use geo::{Bearing, Coord, Destination, Distance, Geodesic, MapCoords, MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, SearchError};

// ============================================================================
// 1. QueryPoint — WGS84 query position
// ============================================================================

/// A query position in WGS84 geographic degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    /// Latitude (WGS84 degrees, -90..=90)
    pub lat_deg: f64,
    /// Longitude (WGS84 degrees, -180..=180)
    pub lon_deg: f64,
}

impl QueryPoint {
    /// Validate and build a query point. Longitude is wrapped into [-180, 180].
    pub fn new(lat_deg: f64, lon_deg: f64) -> Result<Self, SearchError> {
        if !lat_deg.is_finite() || !lon_deg.is_finite() {
            return Err(SearchError::InvalidQuery(format!(
                "coordinates must be finite (lat={lat_deg}, lon={lon_deg})"
            )));
        }
        if !(-90.0..=90.0).contains(&lat_deg) {
            return Err(SearchError::InvalidQuery(format!(
                "latitude {lat_deg} outside [-90, 90]"
            )));
        }
        Ok(Self {
            lat_deg,
            lon_deg: wrap_lon(lon_deg),
        })
    }

    /// The point as a `geo` point (x = lon, y = lat)
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon_deg, self.lat_deg)
    }
}

/// Wrap a longitude into [-180, 180]. Values already in range are returned
/// unchanged so a query at exactly ±180 keeps its sign.
pub fn wrap_lon(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        return lon;
    }
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}

// ============================================================================
// 2. LocalFrame — transform pair trait
// ============================================================================

/// A forward/inverse transform pair between WGS84 degrees and a local planar
/// frame in meters.
pub trait LocalFrame {
    /// Geographic (lon, lat) → local (x, y)
    fn to_local(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError>;

    /// Local (x, y) → geographic (lon, lat)
    fn to_geographic(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError>;
}

// ============================================================================
// 3. Geodesic AEQD (pure Rust, default)
// ============================================================================

/// Ellipsoidal AEQD built from the geodesic inverse and direct problems on
/// WGS84 (Karney's algorithms, through `geo::Geodesic`).
///
/// Forward: the geodesic from the center to the point has length `s` and
/// initial azimuth `α`; the local coordinates are `(s·sin α, s·cos α)`.
/// Inverse: walk `hypot(x, y)` meters from the center along azimuth
/// `atan2(x, y)`.
#[derive(Debug, Clone, Copy)]
pub struct GeodesicAeqd {
    center: Point<f64>,
}

impl GeodesicAeqd {
    /// Create a frame centered at the query point
    pub fn new(center: QueryPoint) -> Self {
        Self {
            center: center.to_point(),
        }
    }
}

impl LocalFrame for GeodesicAeqd {
    fn to_local(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        if !lon.is_finite() || !lat.is_finite() || lat.abs() > 90.0 {
            return Err(ProjectionError::Transform(format!(
                "invalid geographic coordinate ({lon}, {lat})"
            )));
        }
        let target = Point::new(lon, lat);
        let s = Geodesic::distance(self.center, target);
        if s == 0.0 {
            return Ok((0.0, 0.0));
        }
        let azimuth = Geodesic::bearing(self.center, target).to_radians();
        let (x, y) = (s * azimuth.sin(), s * azimuth.cos());
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::Transform(format!(
                "geodesic inverse diverged for ({lon}, {lat})"
            )));
        }
        Ok((x, y))
    }

    fn to_geographic(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(ProjectionError::Transform(format!(
                "invalid local coordinate ({x}, {y})"
            )));
        }
        let s = x.hypot(y);
        if s == 0.0 {
            return Ok((self.center.x(), self.center.y()));
        }
        let azimuth = x.atan2(y).to_degrees();
        let dest = Geodesic::destination(self.center, azimuth, s);
        if !dest.x().is_finite() || !dest.y().is_finite() {
            return Err(ProjectionError::Transform(format!(
                "geodesic direct diverged for ({x}, {y})"
            )));
        }
        Ok((wrap_lon(dest.x()), dest.y()))
    }
}

// ============================================================================
// 4. PROJ-based AEQD (feature-gated)
// ============================================================================

/// AEQD frame built by PROJ from a proj-string centered on the query point.
#[cfg(feature = "proj-transforms")]
pub struct ProjAeqd {
    to_local: proj::Proj,
    to_geographic: proj::Proj,
}

#[cfg(feature = "proj-transforms")]
impl ProjAeqd {
    /// Create both directions of the WGS84 ↔ AEQD transform
    pub fn new(center: QueryPoint) -> Result<Self, ProjectionError> {
        use proj::Proj;

        let aeqd = aeqd_definition(center);
        let to_local = Proj::new_known_crs("EPSG:4326", &aeqd, None)
            .map_err(|e| ProjectionError::Init(format!("{}", e)))?;
        let to_geographic = Proj::new_known_crs(&aeqd, "EPSG:4326", None)
            .map_err(|e| ProjectionError::Init(format!("{}", e)))?;

        tracing::debug!("PROJ frame initialized: {}", aeqd);
        Ok(Self {
            to_local,
            to_geographic,
        })
    }
}

#[cfg(feature = "proj-transforms")]
impl LocalFrame for ProjAeqd {
    fn to_local(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        // PROJ expects (lon, lat) order for EPSG:4326
        self.to_local
            .convert((lon, lat))
            .map_err(|e| ProjectionError::Transform(format!("{}", e)))
    }

    fn to_geographic(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        self.to_geographic
            .convert((x, y))
            .map_err(|e| ProjectionError::Transform(format!("{}", e)))
    }
}

/// proj-string of the AEQD frame centered on `center`
pub fn aeqd_definition(center: QueryPoint) -> String {
    format!(
        "+proj=aeqd +lat_0={} +lon_0={} +datum=WGS84 +units=m +no_defs",
        center.lat_deg, center.lon_deg
    )
}

// ============================================================================
// 5. AeqdFrame — backend selection
// ============================================================================

/// Which library builds the AEQD frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameBackend {
    /// Pure-Rust geodesic construction
    #[default]
    Geodesic,
    /// PROJ (requires the `proj-transforms` feature)
    Proj,
}

/// The local frame used by one search invocation.
pub enum AeqdFrame {
    Geodesic(GeodesicAeqd),
    #[cfg(feature = "proj-transforms")]
    Proj(ProjAeqd),
}

impl AeqdFrame {
    /// Build the AEQD frame centered at `center` with the requested backend.
    pub fn new(center: QueryPoint, backend: FrameBackend) -> Result<Self, ProjectionError> {
        match backend {
            FrameBackend::Geodesic => Ok(AeqdFrame::Geodesic(GeodesicAeqd::new(center))),
            #[cfg(feature = "proj-transforms")]
            FrameBackend::Proj => Ok(AeqdFrame::Proj(ProjAeqd::new(center)?)),
            #[cfg(not(feature = "proj-transforms"))]
            FrameBackend::Proj => Err(ProjectionError::Init(
                "PROJ backend requested but dist2land was built without the `proj-transforms` feature"
                    .to_string(),
            )),
        }
    }
}

impl LocalFrame for AeqdFrame {
    fn to_local(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        match self {
            AeqdFrame::Geodesic(frame) => frame.to_local(lon, lat),
            #[cfg(feature = "proj-transforms")]
            AeqdFrame::Proj(frame) => frame.to_local(lon, lat),
        }
    }

    fn to_geographic(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        match self {
            AeqdFrame::Geodesic(frame) => frame.to_geographic(x, y),
            #[cfg(feature = "proj-transforms")]
            AeqdFrame::Proj(frame) => frame.to_geographic(x, y),
        }
    }
}

// ============================================================================
// 6. Geometry projection helpers
// ============================================================================

/// Project one coordinate into the local frame
fn local_coord<F: LocalFrame + ?Sized>(frame: &F, c: Coord<f64>) -> Result<Coord<f64>, ProjectionError> {
    let (x, y) = frame.to_local(c.x, c.y)?;
    Ok(Coord { x, y })
}

/// Project a geographic polygon (all rings) into the local frame
pub fn project_polygon<F: LocalFrame + ?Sized>(
    frame: &F,
    polygon: &Polygon<f64>,
) -> Result<Polygon<f64>, ProjectionError> {
    polygon.try_map_coords(|c| local_coord(frame, c))
}

/// Project a geographic multipolygon into the local frame
pub fn project_multi_polygon<F: LocalFrame + ?Sized>(
    frame: &F,
    multi: &MultiPolygon<f64>,
) -> Result<MultiPolygon<f64>, ProjectionError> {
    multi.try_map_coords(|c| local_coord(frame, c))
}
