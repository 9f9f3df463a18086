//! # Provider Registry
//!
//! Named land-polygon sources (OpenStreetMap, GSHHG, Natural Earth) and
//! where their extracted shapefiles live in the user cache.
//!
//! Cache layout:
//! ```text
//! <cache_dir>/dist2land/
//! ├── downloads/<id>.zip
//! └── providers/<id>/extracted/**/<name>.shp
//! ```
//!
//! ## Table of Contents
//! 1. Registry file discovery
//! 2. ProviderRegistry
//! 3. Cache paths
//! 4. Shapefile discovery and resolution

use std::path::{Path, PathBuf};

use crate::config::{Dist2LandConfig, ProviderConfig};
use crate::error::ConfigError;

/// Environment variable naming an explicit registry file
pub const PROVIDERS_ENV: &str = "DIST2LAND_PROVIDERS";

/// Provider id that selects the best installed provider
pub const AUTO_PROVIDER: &str = "auto";

const REGISTRY_FILE: &str = "providers.toml";

/// Registry shipped with the crate, used when no file is found on disk
const BUILTIN_REGISTRY: &str = include_str!("../../../share/dist2land/providers.toml");

// ============================================================================
// 1. Registry file discovery
// ============================================================================

/// Candidate registry files, in lookup order
pub fn registry_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(env) = std::env::var_os(PROVIDERS_ENV).filter(|v| !v.is_empty()) {
        candidates.push(PathBuf::from(env));
    }

    if let Some(dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
        candidates.push(dir.join(REGISTRY_FILE));
        candidates.push(dir.join("share").join("dist2land").join(REGISTRY_FILE));
    }

    if cfg!(unix) {
        candidates.push(PathBuf::from("/usr/local/share/dist2land").join(REGISTRY_FILE));
        candidates.push(PathBuf::from("/usr/share/dist2land").join(REGISTRY_FILE));
    }

    candidates
}

// ============================================================================
// 2. ProviderRegistry
// ============================================================================

/// The configured providers, in preference order, plus the cache they
/// install into.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderConfig>,
    /// File the providers were read from; `None` for the built-in set
    source: Option<PathBuf>,
    cache_root: PathBuf,
}

impl ProviderRegistry {
    /// Build a registry from already-validated providers
    pub fn new(providers: Vec<ProviderConfig>, source: Option<PathBuf>) -> Result<Self, ConfigError> {
        if providers.is_empty() {
            let from = source
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in registry".to_string());
            return Err(ConfigError::Invalid(format!("no providers found in {}", from)));
        }
        Ok(Self {
            providers,
            source,
            cache_root: cache_root(),
        })
    }

    /// Load a registry file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = Dist2LandConfig::load(path)?;
        Self::new(config.providers, Some(path.to_path_buf()))
    }

    /// The registry compiled into the crate
    pub fn builtin() -> Result<Self, ConfigError> {
        let config = Dist2LandConfig::parse(Path::new("<built-in providers.toml>"), BUILTIN_REGISTRY)?;
        Self::new(config.providers, None)
    }

    /// First existing file among [`registry_candidates`], else the built-in set
    pub fn discover() -> Result<Self, ConfigError> {
        for candidate in registry_candidates() {
            if candidate.is_file() {
                tracing::debug!("Using provider registry {}", candidate.display());
                return Self::load(&candidate);
            }
        }
        tracing::debug!("No provider registry on disk, using built-in providers");
        Self::builtin()
    }

    /// Providers from a user config when it defines any, else [`Self::discover`]
    pub fn from_config(config: &Dist2LandConfig, config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if config.providers.is_empty() {
            Self::discover()
        } else {
            Self::new(config.providers.clone(), config_path.map(Path::to_path_buf))
        }
    }

    /// Use a different cache root (tests, portable installs)
    pub fn with_cache_root(mut self, cache_root: impl Into<PathBuf>) -> Self {
        self.cache_root = cache_root.into();
        self
    }

    /// All providers in preference order
    pub fn all(&self) -> &[ProviderConfig] {
        &self.providers
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Look up a provider by id, case-insensitively
    pub fn get(&self, id: &str) -> Result<&ProviderConfig, ConfigError> {
        let wanted = id.trim().to_lowercase();
        self.providers
            .iter()
            .find(|p| p.id == wanted)
            .ok_or_else(|| ConfigError::UnknownProvider(id.to_string()))
    }

    // ========================================================================
    // 3. Cache paths
    // ========================================================================

    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// `<cache>/providers/<id>`
    pub fn provider_dir(&self, id: &str) -> PathBuf {
        self.cache_root.join("providers").join(id)
    }

    /// Directory the provider's archive is extracted into
    pub fn extract_root(&self, provider: &ProviderConfig) -> PathBuf {
        self.provider_dir(&provider.id).join("extracted")
    }

    /// `<cache>/downloads`
    pub fn downloads_dir(&self) -> PathBuf {
        self.cache_root.join("downloads")
    }

    /// Where the provider's archive is downloaded to
    pub fn archive_path(&self, provider: &ProviderConfig) -> PathBuf {
        self.downloads_dir().join(format!("{}.zip", provider.id))
    }

    // ========================================================================
    // 4. Shapefile discovery and resolution
    // ========================================================================

    /// The provider's shapefile under its extract root, if present
    pub fn find_shapefile(&self, provider: &ProviderConfig) -> Option<PathBuf> {
        find_matching_shapefile(&self.extract_root(provider), provider)
    }

    pub fn is_installed(&self, provider: &ProviderConfig) -> bool {
        self.find_shapefile(provider).is_some()
    }

    /// The provider's shapefile, or a hint to run setup
    pub fn shapefile_path(&self, provider: &ProviderConfig) -> Result<PathBuf, ConfigError> {
        self.find_shapefile(provider)
            .ok_or_else(|| ConfigError::ProviderNotInstalled(provider.id.clone()))
    }

    /// First installed provider in preference order
    pub fn best_available(&self) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| self.is_installed(p))
    }

    /// Resolve `auto` or an explicit id to an installed provider and its shapefile
    pub fn resolve(&self, id: &str) -> Result<(&ProviderConfig, PathBuf), ConfigError> {
        let provider = if id.trim().eq_ignore_ascii_case(AUTO_PROVIDER) {
            self.best_available().ok_or(ConfigError::NoProvidersInstalled)?
        } else {
            self.get(id)?
        };
        let shapefile = self.shapefile_path(provider)?;
        Ok((provider, shapefile))
    }
}

/// `dirs::cache_dir()/dist2land`, or the temp dir when there is no cache dir
pub fn cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("dist2land")
}

/// Walk `root` in sorted order and return the first `.shp` the provider selects
fn find_matching_shapefile(root: &Path, provider: &ProviderConfig) -> Option<PathBuf> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(root)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in &entries {
        if path.is_file() {
            let selected = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| provider.matches_shapefile_name(n))
                .unwrap_or(false);
            if selected {
                return Some(path.clone());
            }
        }
    }

    entries
        .iter()
        .filter(|p| p.is_dir())
        .find_map(|dir| find_matching_shapefile(dir, provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn registry(cache: &TempDir) -> ProviderRegistry {
        let text = r#"
            [[provider]]
            id = "osm"
            display_name = "OpenStreetMap land polygons"
            url_zip = "https://example.org/osm.zip"
            license_hint = "ODbL"
            shp_name_contains = ["land_polygons"]

            [[provider]]
            id = "ne"
            display_name = "Natural Earth"
            url_zip = "https://example.org/ne.zip"
            license_hint = "Public domain"
            explicit_shp = "ne_10m_land.shp"
        "#;
        let config = Dist2LandConfig::parse(Path::new("providers.toml"), text).unwrap();
        ProviderRegistry::new(config.providers, None)
            .unwrap()
            .with_cache_root(cache.path())
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_builtin_registry_parses() {
        let registry = ProviderRegistry::builtin().unwrap();
        let ids: Vec<&str> = registry.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["osm", "gshhg", "ne"]);
        assert!(registry.source().is_none());
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let cache = TempDir::new().unwrap();
        let registry = registry(&cache);
        assert_eq!(registry.get("OSM").unwrap().id, "osm");
        assert!(matches!(registry.get("gshhg"), Err(ConfigError::UnknownProvider(ref id)) if id == "gshhg"));
    }

    #[test]
    fn test_cache_layout() {
        let cache = TempDir::new().unwrap();
        let registry = registry(&cache);
        let osm = registry.get("osm").unwrap();
        assert_eq!(registry.extract_root(osm), cache.path().join("providers/osm/extracted"));
        assert_eq!(registry.archive_path(osm), cache.path().join("downloads/osm.zip"));
    }

    #[test]
    fn test_nothing_installed() {
        let cache = TempDir::new().unwrap();
        let registry = registry(&cache);
        let osm = registry.get("osm").unwrap();
        assert!(!registry.is_installed(osm));
        assert!(registry.best_available().is_none());
        assert!(matches!(registry.resolve("auto"), Err(ConfigError::NoProvidersInstalled)));
        let err = registry.resolve("osm").unwrap_err();
        assert!(err.to_string().contains("dist2land setup --provider osm"));
    }

    #[test]
    fn test_find_shapefile_recurses_in_sorted_order() {
        let cache = TempDir::new().unwrap();
        let registry = registry(&cache);
        let osm = registry.get("osm").unwrap();
        let root = registry.extract_root(osm);
        touch(&root.join("land-polygons-complete-4326/land_polygons.dbf"));
        touch(&root.join("land-polygons-complete-4326/land_polygons.shp"));
        touch(&root.join("z-extra/land_polygons.shp"));
        touch(&root.join("README.txt"));

        assert_eq!(
            registry.find_shapefile(osm),
            Some(root.join("land-polygons-complete-4326/land_polygons.shp"))
        );
    }

    #[test]
    fn test_explicit_name_wins_over_patterns() {
        let cache = TempDir::new().unwrap();
        let registry = registry(&cache);
        let ne = registry.get("ne").unwrap();
        let root = registry.extract_root(ne);
        touch(&root.join("ne_10m_land_scale_rank.shp"));
        assert!(!registry.is_installed(ne));
        touch(&root.join("NE_10M_LAND.SHP"));
        assert_eq!(registry.find_shapefile(ne), Some(root.join("NE_10M_LAND.SHP")));
    }

    #[test]
    fn test_best_available_follows_file_order() {
        let cache = TempDir::new().unwrap();
        let registry = registry(&cache);
        let ne = registry.get("ne").unwrap().clone();
        touch(&registry.extract_root(&ne).join("ne_10m_land.shp"));
        assert_eq!(registry.best_available().unwrap().id, "ne");

        let osm = registry.get("osm").unwrap().clone();
        touch(&registry.extract_root(&osm).join("land_polygons.shp"));
        let (provider, path) = registry.resolve("AUTO").unwrap();
        assert_eq!(provider.id, "osm");
        assert!(path.ends_with("land_polygons.shp"));
    }

    #[test]
    fn test_load_from_file_and_empty_registry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("providers.toml");
        fs::write(&path, "[search]\ntrust_margin = 1.2\n").unwrap();
        let err = ProviderRegistry::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("no providers found in"));
    }

    #[test]
    fn test_config_providers_take_precedence() {
        let text = r#"
            [[provider]]
            id = "local"
            display_name = "Local coastline"
            url_zip = "file:///tmp/coast.zip"
            license_hint = "internal"
            shp_name_contains = ["coast"]
        "#;
        let config = Dist2LandConfig::parse(Path::new("user.toml"), text).unwrap();
        let registry = ProviderRegistry::from_config(&config, Some(Path::new("user.toml"))).unwrap();
        assert_eq!(registry.all().len(), 1);
        assert_eq!(registry.source(), Some(Path::new("user.toml")));
    }
}
