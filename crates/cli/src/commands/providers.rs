//! `providers`: list configured providers and whether they are installed.

use anyhow::Result;
use colored::Colorize;

use super::common::AppContext;

pub fn run(ctx: &AppContext) -> Result<()> {
    println!("Providers:");
    for provider in ctx.registry.all() {
        let status = if ctx.registry.is_installed(provider) {
            "[installed]".green()
        } else {
            "[not installed]".yellow()
        };
        println!("  {:<8} {:<16} {}", provider.id, status, provider.display_name);
    }
    Ok(())
}
