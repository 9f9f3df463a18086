//! Error types for dist2land-geo
//!
//! ## Table of Contents
//! 1. SearchError - Errors surfaced by a nearest-land search
//! 2. DatasetError - Land dataset open/scan failures
//! 3. ProjectionError - Local frame construction/transform failures
//! 4. ConfigError - Configuration and provider registry failures

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for search operations
pub type Result<T> = std::result::Result<T, SearchError>;

// ============================================================================
// 1. SearchError
// ============================================================================

/// Errors that end a single nearest-land query. None of them is retried
/// inside the engine.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Dataset cannot be opened or read at all
    #[error("Failed to open land dataset {}: {reason}", .path.display())]
    DatasetOpenFailed { path: PathBuf, reason: String },

    /// A bounding-box scan failed part way through the search
    #[error("Land dataset query failed: {0}")]
    DatasetQuery(#[from] DatasetError),

    /// The local frame could not be built or applied
    #[error("Projection failed: {0}")]
    ProjectionFailed(String),

    /// The whole radius range was scanned without meeting any land feature
    #[error(
        "No land found within {radius_m:.0} m of ({lat}, {lon}); the dataset may be empty or lack global coverage"
    )]
    NoLandFound { lat: f64, lon: f64, radius_m: f64 },

    /// Query coordinates are not a valid WGS84 position
    #[error("Invalid query point: {0}")]
    InvalidQuery(String),

    /// Search parameters are inconsistent
    #[error("Invalid search parameters: {0}")]
    InvalidParams(String),
}

impl From<ProjectionError> for SearchError {
    fn from(err: ProjectionError) -> Self {
        SearchError::ProjectionFailed(err.to_string())
    }
}

// ============================================================================
// 2. DatasetError
// ============================================================================

/// Errors from reading land polygon datasets
#[derive(Error, Debug)]
pub enum DatasetError {
    /// File I/O error
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Shapefile decoding error
    #[error("Failed to decode shapefile {}: {message}", .path.display())]
    Shapefile { path: PathBuf, message: String },

    /// GeoJSON parse or conversion error
    #[error("Failed to parse GeoJSON {}: {message}", .path.display())]
    GeoJson { path: PathBuf, message: String },

    /// Extension not recognised as a supported vector format
    #[error("Unsupported dataset format '{extension}' for {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Two features share one index
    #[error("Duplicate feature index {index} in {}", .path.display())]
    DuplicateFeatureIndex { path: PathBuf, index: usize },
}

impl DatasetError {
    /// Path of the dataset the error refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            DatasetError::Io { path, .. }
            | DatasetError::Shapefile { path, .. }
            | DatasetError::GeoJson { path, .. }
            | DatasetError::UnsupportedFormat { path, .. }
            | DatasetError::DuplicateFeatureIndex { path, .. } => path,
        }
    }
}

// ============================================================================
// 3. ProjectionError
// ============================================================================

/// Errors from the local azimuthal-equidistant frame
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// Failed to initialize the transform pair
    #[error("frame init error: {0}")]
    Init(String),

    /// Failed to transform a coordinate
    #[error("transform error: {0}")]
    Transform(String),
}

// ============================================================================
// 4. ConfigError
// ============================================================================

/// Errors from loading configuration and resolving providers
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parse error
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Structurally valid TOML with missing or contradictory values
    #[error("{0}")]
    Invalid(String),

    /// Provider id not present in the registry
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Provider known but its shapefile is not on disk
    #[error("Provider '{0}' not installed or shapefile not found. Run: dist2land setup --provider {0}")]
    ProviderNotInstalled(String),

    /// `auto` requested but nothing is installed
    #[error("No providers installed. Run: dist2land setup --provider osm (or gshhg/ne)")]
    NoProvidersInstalled,
}
