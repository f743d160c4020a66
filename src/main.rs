//! Sitepolish - post-processing pipeline for statically generated sites.

mod cli;
mod config;
mod logger;
mod pipeline;
mod utils;
mod variant;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let config = SiteConfig::load(&cli)?;
    let output = config.output_dir();
    if !output.is_dir() {
        anyhow::bail!(
            "output directory {} does not exist - build the site first",
            output.display()
        );
    }

    match &cli.command {
        Commands::Run => pipeline::run_all(&config),
        Commands::Compress => pipeline::compress::run(&config).map(|_| ()),
        Commands::Remediate => pipeline::remediate::run(&config).map(|_| ()),
        Commands::Downgrade => pipeline::downgrade::run(&config).map(|_| ()),
        Commands::Inline => pipeline::inline::run(&config).map(|_| ()),
        Commands::Minify => pipeline::minify::run(&config).map(|_| ()),
        Commands::Redirects => pipeline::redirects::run(&config).map(|_| ()),
    }
}
