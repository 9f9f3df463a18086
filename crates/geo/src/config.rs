//! # dist2land Configuration
//!
//! Parses the TOML config consumed by the library and the CLI. The same
//! schema serves two files: a user config (`--config`) carrying search
//! tuning and optionally its own providers, and the provider registry file
//! (`providers.toml`), which only carries `[[provider]]` tables.
//!
//! ```toml
//! [search]
//! initial_radius_m = 10000.0
//! trust_margin = 1.2
//! frame = "geodesic"
//!
//! [[provider]]
//! id = "osm"
//! display_name = "OpenStreetMap land polygons"
//! url_zip = "https://osmdata.openstreetmap.de/download/land-polygons-complete-4326.zip"
//! license_hint = "ODbL 1.0"
//! shp_name_contains = ["land_polygons"]
//! ```
//!
//! ## Table of Contents
//! 1. Dist2LandConfig — top-level file
//! 2. ProviderConfig — one dataset source
//! 3. Parsing and validation

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::search::SearchParams;

// ============================================================================
// 1. Dist2LandConfig — top-level file
// ============================================================================

/// Top-level configuration, parsed from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dist2LandConfig {
    /// Search tuning
    #[serde(default)]
    pub search: SearchParams,
    /// Provider definitions, in preference order
    #[serde(default, rename = "provider")]
    pub providers: Vec<ProviderConfig>,
}

// ============================================================================
// 2. ProviderConfig — one dataset source
// ============================================================================

/// A named land-polygon dataset source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Short identifier, lower-cased on load (e.g. "osm")
    pub id: String,
    /// Human-readable name
    pub display_name: String,
    /// ZIP archive containing the shapefile
    pub url_zip: String,
    /// License to show after setup
    pub license_hint: String,
    /// Exact `.shp` file name to pick from the archive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_shp: Option<String>,
    /// Substrings, any of which selects a `.shp` file name
    #[serde(default)]
    pub shp_name_contains: Vec<String>,
}

impl ProviderConfig {
    /// Normalize the id and check required fields
    fn validate(&mut self) -> Result<(), ConfigError> {
        self.id = self.id.trim().to_lowercase();
        if self.id.is_empty() {
            return Err(ConfigError::Invalid("provider with empty id".to_string()));
        }
        if self.id == "auto" {
            return Err(ConfigError::Invalid("provider id 'auto' is reserved".to_string()));
        }

        let missing = |field: &str| {
            ConfigError::Invalid(format!("provider '{}' missing {}", self.id, field))
        };
        if self.display_name.trim().is_empty() {
            return Err(missing("display_name"));
        }
        if self.url_zip.trim().is_empty() {
            return Err(missing("url_zip"));
        }
        if self.license_hint.trim().is_empty() {
            return Err(missing("license_hint"));
        }

        self.explicit_shp = self
            .explicit_shp
            .take()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self.shp_name_contains = self
            .shp_name_contains
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if self.explicit_shp.is_none() && self.shp_name_contains.is_empty() {
            return Err(missing("shp_name_contains (or explicit_shp)"));
        }
        Ok(())
    }

    /// Whether a file name selects this provider's shapefile
    pub fn matches_shapefile_name(&self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        if !name.ends_with(".shp") {
            return false;
        }
        match &self.explicit_shp {
            Some(explicit) => name == explicit.to_lowercase(),
            None => self
                .shp_name_contains
                .iter()
                .any(|pattern| name.contains(&pattern.to_lowercase())),
        }
    }
}

// ============================================================================
// 3. Parsing and validation
// ============================================================================

impl Dist2LandConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = Self::parse(path, &content)?;
        tracing::debug!(
            "Loaded config {} ({} provider(s))",
            path.display(),
            config.providers.len()
        );
        Ok(config)
    }

    /// Parse and validate TOML text; `path` is only used for error context
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        let mut config: Dist2LandConfig = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check search parameters and normalize providers
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.search
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("[search]: {}", e)))?;

        let mut seen = HashSet::new();
        for provider in &mut self.providers {
            provider.validate()?;
            if !seen.insert(provider.id.clone()) {
                return Err(ConfigError::Invalid(format!(
                    "provider '{}' defined more than once",
                    provider.id
                )));
            }
        }
        Ok(())
    }
}
