//! Shared pieces of the query commands: configuration loading, dataset
//! resolution and result formatting.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use dist2land_geo::{
    DistanceResult, Dist2LandConfig, IndexedLand, Metric, NearestLandSearch, ProviderRegistry,
    QueryPoint, Units,
};

/// Configuration and provider registry for one CLI invocation
pub struct AppContext {
    pub config: Dist2LandConfig,
    pub registry: ProviderRegistry,
}

impl AppContext {
    /// Load `--config` (defaults when absent) and pick the provider registry:
    /// an explicit registry file, else the config's providers, else discovery.
    pub fn load(config_path: Option<&Path>, providers_file: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Dist2LandConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Dist2LandConfig::default(),
        };

        let registry = match providers_file {
            Some(path) => ProviderRegistry::load(path)
                .with_context(|| format!("Failed to load provider registry {}", path.display()))?,
            None => ProviderRegistry::from_config(&config, config_path)?,
        };

        tracing::debug!(
            "Providers from {}, cache at {}",
            registry
                .source()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in registry".to_string()),
            registry.cache_root().display()
        );

        Ok(Self { config, registry })
    }

    /// Search engine configured from `[search]`
    pub fn search(&self) -> Result<NearestLandSearch> {
        Ok(NearestLandSearch::new(self.config.search)?)
    }

    /// Resolve a provider id (or `auto`) and load its dataset
    pub fn open_dataset(&self, provider: &str) -> Result<(String, IndexedLand)> {
        let (provider, shapefile) = self.registry.resolve(provider)?;
        tracing::info!("Loading {} from {}", provider.display_name, shapefile.display());
        let land = IndexedLand::open_for_search(&shapefile)?;
        Ok((provider.id.clone(), land))
    }
}

/// Options shared by `distance` and `batch`
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Provider id, or "auto" for the first installed one
    #[arg(long, default_value = "auto")]
    pub provider: String,

    /// Output units: m, km or nm
    #[arg(long, default_value = "m")]
    pub units: Units,

    /// Reported distance: geodesic, chord or rhumb
    #[arg(long, default_value = "geodesic")]
    pub metric: Metric,

    /// Print one JSON object per query instead of text
    #[arg(long)]
    pub json: bool,
}

/// JSON shape of one answered query
#[derive(Serialize)]
struct JsonOutput<'a> {
    lat: f64,
    lon: f64,
    distance: f64,
    units: Units,
    metric: Metric,
    #[serde(flatten)]
    result: &'a DistanceResult,
}

/// Render one result as a text line (`<distance> <units> <land_lat> <land_lon>`)
/// or as JSON.
pub fn render(query: QueryPoint, result: &DistanceResult, args: &QueryArgs) -> Result<String> {
    let distance = args.units.convert(args.metric.distance_m(query, result));

    tracing::info!(
        "provider={} metric={} shp={} geodesic_m={}",
        result.provider_id,
        args.metric,
        result.dataset_path.display(),
        result.geodesic_m
    );

    if args.json {
        let output = JsonOutput {
            lat: query.lat_deg,
            lon: query.lon_deg,
            distance,
            units: args.units,
            metric: args.metric,
            result,
        };
        Ok(serde_json::to_string(&output)?)
    } else {
        Ok(format!(
            "{:.3} {} {:.8} {:.8}",
            distance, args.units, result.land_lat_deg, result.land_lon_deg
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(units: Units, json: bool) -> QueryArgs {
        QueryArgs {
            provider: "auto".into(),
            units,
            metric: Metric::Geodesic,
            json,
        }
    }

    fn result() -> DistanceResult {
        DistanceResult {
            geodesic_m: 111_319.4908,
            land_lat_deg: 0.000_15,
            land_lon_deg: 0.0,
            in_land: false,
            provider_id: "osm".into(),
            dataset_path: PathBuf::from("/cache/land_polygons.shp"),
            stop_radius_m: 160_000.0,
        }
    }

    #[test]
    fn test_text_line() {
        let query = QueryPoint::new(0.0, -1.0).unwrap();
        let line = render(query, &result(), &args(Units::Meters, false)).unwrap();
        assert_eq!(line, "111319.491 m 0.00015000 0.00000000");

        let line = render(query, &result(), &args(Units::Kilometers, false)).unwrap();
        assert!(line.starts_with("111.319 km "));
    }

    #[test]
    fn test_json_object() {
        let query = QueryPoint::new(0.0, -1.0).unwrap();
        let line = render(query, &result(), &args(Units::NauticalMiles, true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["units"], "nm");
        assert_eq!(value["metric"], "geodesic");
        assert_eq!(value["provider_id"], "osm");
        assert_eq!(value["in_land"], false);
        assert_eq!(value["lon"], -1.0);
        assert!((value["distance"].as_f64().unwrap() - 60.108).abs() < 1e-3);
    }

    #[test]
    fn test_context_defaults_without_files() {
        let ctx = AppContext::load(None, None).unwrap();
        assert_eq!(ctx.config, Dist2LandConfig::default());
        assert!(!ctx.registry.all().is_empty());
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let err = AppContext::load(Some(Path::new("/nonexistent/dist2land.toml")), None).err().unwrap();
        assert!(format!("{:#}", err).contains("/nonexistent/dist2land.toml"));
    }
}
