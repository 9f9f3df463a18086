//! # Distance Metrics and Units
//!
//! Post-processing of a search result: which distance to report between the
//! query and the nearest land point, and in what unit.
//!
//! The search itself always minimizes geodesic distance; `Chord` and `Rhumb`
//! re-measure the same point pair.

use std::fmt;
use std::str::FromStr;

use geo::{Distance, Point, Rhumb};
use serde::{Deserialize, Serialize};

use crate::coords::QueryPoint;
use crate::error::ConfigError;
use crate::search::DistanceResult;

/// WGS84 semi-major axis in meters
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening
const WGS84_F: f64 = 1.0 / 298.257_223_563;

const METERS_PER_KM: f64 = 1000.0;
const METERS_PER_NM: f64 = 1852.0;

/// Output distance unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Units {
    #[default]
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "nm")]
    NauticalMiles,
}

impl Units {
    /// Convert meters into this unit
    pub fn convert(self, meters: f64) -> f64 {
        match self {
            Units::Meters => meters,
            Units::Kilometers => meters / METERS_PER_KM,
            Units::NauticalMiles => meters / METERS_PER_NM,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Units::Meters => "m",
            Units::Kilometers => "km",
            Units::NauticalMiles => "nm",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m" => Ok(Units::Meters),
            "km" => Ok(Units::Kilometers),
            "nm" => Ok(Units::NauticalMiles),
            other => Err(ConfigError::Invalid(format!(
                "unknown units '{}' (expected m, km or nm)",
                other
            ))),
        }
    }
}

/// Which distance to report between the query and its nearest land point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Shortest path on the WGS84 ellipsoid (what the search minimizes)
    #[default]
    Geodesic,
    /// Straight line through the Earth between the two ECEF positions
    Chord,
    /// Constant-bearing path on a sphere of mean Earth radius
    Rhumb,
}

impl Metric {
    /// Distance in meters for a search `result` of `query`
    pub fn distance_m(self, query: QueryPoint, result: &DistanceResult) -> f64 {
        if result.in_land {
            return 0.0;
        }
        let land = QueryPoint {
            lat_deg: result.land_lat_deg,
            lon_deg: result.land_lon_deg,
        };
        match self {
            Metric::Geodesic => result.geodesic_m,
            Metric::Chord => chord_distance_m(query, land),
            Metric::Rhumb => rhumb_distance_m(query, land),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Geodesic => "geodesic",
            Metric::Chord => "chord",
            Metric::Rhumb => "rhumb",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "geodesic" => Ok(Metric::Geodesic),
            "chord" => Ok(Metric::Chord),
            "rhumb" => Ok(Metric::Rhumb),
            other => Err(ConfigError::Invalid(format!(
                "unknown metric '{}' (expected geodesic, chord or rhumb)",
                other
            ))),
        }
    }
}

/// Earth-centered, earth-fixed position on the WGS84 ellipsoid (height 0)
fn ecef(point: QueryPoint) -> [f64; 3] {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let (sin_lat, cos_lat) = point.lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = point.lon_deg.to_radians().sin_cos();
    let n = WGS84_A / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    [
        n * cos_lat * cos_lon,
        n * cos_lat * sin_lon,
        n * (1.0 - e2) * sin_lat,
    ]
}

/// Straight-line distance between two surface points
pub fn chord_distance_m(a: QueryPoint, b: QueryPoint) -> f64 {
    let (pa, pb) = (ecef(a), ecef(b));
    let (dx, dy, dz) = (pa[0] - pb[0], pa[1] - pb[1], pa[2] - pb[2]);
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Rhumb-line distance on the mean-radius sphere
pub fn rhumb_distance_m(a: QueryPoint, b: QueryPoint) -> f64 {
    Rhumb::distance(
        Point::new(a.lon_deg, a.lat_deg),
        Point::new(b.lon_deg, b.lat_deg),
    )
}
