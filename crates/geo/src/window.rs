//! # Search Windows
//!
//! Turns a search radius in meters into the geographic bounding boxes that
//! are handed to the dataset prefilter, splitting at the antimeridian.
//!
//! ## Table of Contents
//! 1. GeoWindow — geographic bounding box
//! 2. Radius → degree half-extents
//! 3. Antimeridian split

use rstar::AABB;

use crate::coords::QueryPoint;

/// Meters per degree of latitude used for window sizing
pub const METERS_PER_DEG_LAT: f64 = 111_320.0;

/// Floor for cos(lat) so windows near the poles stay bounded
const MIN_COS_LAT: f64 = 1e-6;

/// Roughly half the Earth's circumference: every point on the globe lies
/// within this geodesic distance of any query
pub const GLOBAL_RADIUS_M: f64 = 20_000_000.0;

// ============================================================================
// 1. GeoWindow — geographic bounding box
// ============================================================================

/// Axis-aligned box in WGS84 degrees (x = lon, y = lat).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoWindow {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GeoWindow {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// The whole globe
    pub fn global() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Whether this box spans every longitude and latitude
    pub fn is_global(&self) -> bool {
        self.min_lon <= -180.0 && self.max_lon >= 180.0 && self.min_lat <= -90.0 && self.max_lat >= 90.0
    }

    /// R-tree envelope of this window
    pub fn envelope(&self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.min_lon, self.min_lat], [self.max_lon, self.max_lat])
    }
}

impl std::fmt::Display for GeoWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.4}, {:.4}] x [{:.4}, {:.4}]",
            self.min_lon, self.max_lon, self.min_lat, self.max_lat
        )
    }
}

// ============================================================================
// 2. Radius → degree half-extents
// ============================================================================

/// Half-extents `(dlat, dlon)` in degrees of a window of `radius_m` around
/// latitude `lat_deg`.
pub fn degree_half_extents(lat_deg: f64, radius_m: f64) -> (f64, f64) {
    let dlat = radius_m / METERS_PER_DEG_LAT;
    let cos_lat = lat_deg.to_radians().cos().max(MIN_COS_LAT);
    let dlon = radius_m / (METERS_PER_DEG_LAT * cos_lat);
    (dlat, dlon)
}

// ============================================================================
// 3. Antimeridian split
// ============================================================================

/// The boxes to scan for `radius_m` around `query`: one box, or two when the
/// window crosses ±180°. A window at least 360° wide, or one that reaches a
/// pole, becomes a single box covering every longitude, and a radius of
/// [`GLOBAL_RADIUS_M`] or more is the whole globe.
pub fn search_windows(query: QueryPoint, radius_m: f64) -> Vec<GeoWindow> {
    if radius_m >= GLOBAL_RADIUS_M {
        return vec![GeoWindow::global()];
    }

    let (dlat, dlon) = degree_half_extents(query.lat_deg, radius_m);
    let min_lat = (query.lat_deg - dlat).max(-90.0);
    let max_lat = (query.lat_deg + dlat).min(90.0);
    let min_lon = query.lon_deg - dlon;
    let max_lon = query.lon_deg + dlon;

    // Land across the pole is within reach at any longitude
    let reaches_pole = max_lat >= 90.0 || min_lat <= -90.0;
    if reaches_pole || 2.0 * dlon >= 360.0 {
        return vec![GeoWindow::new(-180.0, min_lat, 180.0, max_lat)];
    }

    if min_lon < -180.0 {
        vec![
            GeoWindow::new(min_lon + 360.0, min_lat, 180.0, max_lat),
            GeoWindow::new(-180.0, min_lat, max_lon, max_lat),
        ]
    } else if max_lon > 180.0 {
        vec![
            GeoWindow::new(min_lon, min_lat, 180.0, max_lat),
            GeoWindow::new(-180.0, min_lat, max_lon - 360.0, max_lat),
        ]
    } else {
        vec![GeoWindow::new(min_lon, min_lat, max_lon, max_lat)]
    }
}
