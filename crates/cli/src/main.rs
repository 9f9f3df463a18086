//! # dist2land
//!
//! Distance from a WGS84 point to the nearest land, using locally installed
//! coastline datasets.
//!
//! ## Usage
//!
//! ```bash
//! # Show providers and whether they are installed
//! dist2land providers
//!
//! # Download and extract a dataset into the user cache
//! dist2land setup --provider osm
//!
//! # Nearest land to a point (prints: <distance> <units> <land_lat> <land_lon>)
//! dist2land distance --lat 43.5 --lon 7.2 --units km
//!
//! # Many points, one dataset load
//! dist2land batch --input points.csv --json
//! ```
//!
//! ## Configuration (`--config dist2land.toml`)
//!
//! ```toml
//! [search]
//! initial_radius_m = 10000.0
//! trust_margin = 1.2
//!
//! [[provider]]
//! id = "local"
//! display_name = "Local coastline"
//! url_zip = "https://example.org/coast.zip"
//! license_hint = "internal"
//! shp_name_contains = ["coast"]
//! ```

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::common::{AppContext, QueryArgs};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "dist2land")]
#[command(about = "Distance from a point to the nearest land")]
#[command(version)]
struct Cli {
    /// Configuration file ([search] tuning, optional [[provider]] list)
    #[arg(short, long, global = true, env = "DIST2LAND_CONFIG")]
    config: Option<PathBuf>,

    /// Provider registry file (overrides the providers of --config)
    #[arg(long, global = true, env = "DIST2LAND_PROVIDERS")]
    providers_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List providers and their install status
    Providers,

    /// Download and extract a provider's dataset
    Setup {
        /// Provider id, or "all"
        #[arg(long)]
        provider: String,
    },

    /// Nearest land to one point
    Distance {
        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Nearest land for every "lat,lon" line of a file
    Batch {
        /// Input file, or "-" for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,

        #[command(flatten)]
        query: QueryArgs,
    },
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` wins over
/// `--verbose`.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::load(cli.config.as_deref(), cli.providers_file.as_deref())?;

    match cli.command {
        Command::Providers => commands::providers::run(&ctx),
        Command::Setup { provider } => commands::setup::run(&ctx, &provider),
        Command::Distance { lat, lon, query } => commands::distance::run(&ctx, lat, lon, &query),
        Command::Batch { input, query } => commands::batch::run(&ctx, &input, &query),
    }
}
