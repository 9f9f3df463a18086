//! # dist2land-geo: Distance from a Point to the Nearest Land
//!
//! Given a WGS84 position and a land-polygon dataset, finds the nearest point
//! on any land boundary and its geodesic distance, or reports that the
//! position is itself on land.
//!
//! ## Architecture
//! - Each query builds an azimuthal-equidistant frame centered on itself, so
//!   planar distances from the origin are geodesic distances.
//! - Candidate polygons come from an R-tree prefilter over growing
//!   geographic windows, split at the antimeridian.
//! - The scan stops once the best distance is well inside the window.
//!
//! ## Modules
//! - `coords` — Query points and the local AEQD frame
//! - `window` — Radius → geographic boxes
//! - `spatial_index` — R-tree of feature envelopes
//! - `dataset` — `LandDataset` trait and the in-memory `IndexedLand`
//! - `vector_import` — Shapefile and GeoJSON readers
//! - `search` — The expanding-window nearest-land search
//! - `metrics` — Output units and alternative distance metrics
//! - `config` — TOML configuration
//! - `providers` — Provider registry and the local dataset cache
//! - `error` — Error types
//!
//! ## Example
//! ```no_run
//! use dist2land_geo::{IndexedLand, NearestLandSearch, QueryPoint, SearchParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut land = IndexedLand::open_for_search("land_polygons.shp".as_ref())?;
//! let search = NearestLandSearch::new(SearchParams::default())?;
//! let result = search.find_nearest_land(QueryPoint::new(43.5, 7.2)?, &mut land, "osm")?;
//! println!("{:.3} m to ({}, {})", result.geodesic_m, result.land_lat_deg, result.land_lon_deg);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coords;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod providers;
pub mod search;
pub mod spatial_index;
pub mod vector_import;
pub mod window;

pub use config::{Dist2LandConfig, ProviderConfig};
pub use coords::{AeqdFrame, FrameBackend, GeodesicAeqd, LocalFrame, QueryPoint};
pub use dataset::{FeatureIter, IndexedLand, LandDataset, LandFeature, LandGeometry};
pub use error::{ConfigError, DatasetError, ProjectionError, Result, SearchError};
pub use metrics::{Metric, Units};
pub use providers::{ProviderRegistry, AUTO_PROVIDER};
pub use search::{find_nearest_land, DistanceResult, NearestLandSearch, SearchParams};
pub use window::{search_windows, GeoWindow};
