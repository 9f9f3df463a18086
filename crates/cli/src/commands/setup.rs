//! `setup`: download a provider's ZIP archive and extract it into the cache.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use dist2land_geo::{ProviderConfig, ProviderRegistry};

use super::common::AppContext;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);
/// Per-read stall limit; whole downloads run for as long as data flows
const READ_TIMEOUT: Duration = Duration::from_secs(120);
const MAX_REDIRECTS: u32 = 10;

pub fn run(ctx: &AppContext, provider: &str) -> Result<()> {
    if provider.trim().eq_ignore_ascii_case("all") {
        for p in ctx.registry.all() {
            setup_one(&ctx.registry, p)?;
        }
        return Ok(());
    }
    setup_one(&ctx.registry, ctx.registry.get(provider)?)
}

fn setup_one(registry: &ProviderRegistry, provider: &ProviderConfig) -> Result<()> {
    let downloads = registry.downloads_dir();
    fs::create_dir_all(&downloads)
        .with_context(|| format!("Failed to create {}", downloads.display()))?;

    let archive = registry.archive_path(provider);
    println!("Downloading {}...", provider.id);
    download(&provider.url_zip, &archive)?;

    let root = registry.extract_root(provider);
    println!("Extracting to {}...", root.display());
    if root.exists() {
        fs::remove_dir_all(&root).with_context(|| format!("Failed to clear {}", root.display()))?;
    }
    extract_zip(&archive, &root)?;

    let shapefile = registry.shapefile_path(provider)?;
    println!("{} found shapefile: {}", "OK:".green().bold(), shapefile.display());
    println!("License note: {}", provider.license_hint);
    Ok(())
}

/// Stream `url` into `dest`, through a `.part` file so an interrupted
/// download never looks complete.
fn download(url: &str, dest: &Path) -> Result<()> {
    let agent = ureq::AgentBuilder::new()
        .user_agent(concat!("dist2land/", env!("CARGO_PKG_VERSION")))
        .timeout_connect(CONNECT_TIMEOUT)
        .timeout_read(READ_TIMEOUT)
        .redirects(MAX_REDIRECTS)
        .build();

    let response = agent
        .get(url)
        .call()
        .with_context(|| format!("Download failed: {}", url))?;

    let total = response
        .header("Content-Length")
        .and_then(|len| len.parse::<u64>().ok());
    tracing::debug!("GET {} -> {} ({:?} bytes)", url, response.status(), total);

    let partial = dest.with_extension("zip.part");
    let file = File::create(&partial)
        .with_context(|| format!("Failed to create {}", partial.display()))?;
    let mut writer = BufWriter::new(file);

    let bar = progress_bar(total);
    let mut reader = bar.wrap_read(response.into_reader());
    let bytes = io::copy(&mut reader, &mut writer).with_context(|| format!("Download failed: {}", url))?;
    writer.flush()?;
    bar.finish_and_clear();

    fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move download into {}", dest.display()))?;
    tracing::info!("Downloaded {} bytes to {}", bytes, dest.display());
    Ok(())
}

fn progress_bar(total: Option<u64>) -> ProgressBar {
    let (bar, template) = match total {
        Some(len) => (
            ProgressBar::new(len),
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
        ),
        None => (
            ProgressBar::new_spinner(),
            "{spinner:.green} [{elapsed_precise}] {bytes} ({bytes_per_sec})",
        ),
    };
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

/// Extract every entry of `archive` under `dest`. Entry paths that would
/// escape `dest` are rejected by the zip reader.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive).with_context(|| format!("Failed to open {}", archive.display()))?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("Not a ZIP archive: {}", archive.display()))?;

    fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest.display()))?;
    zip.extract(dest)
        .with_context(|| format!("Failed to extract {} into {}", archive.display(), dest.display()))?;

    tracing::info!("Extracted {} entries into {}", zip.len(), dest.display());
    Ok(())
}
