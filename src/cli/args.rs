//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Sitepolish post-processing pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: sitepolish.toml)
    #[arg(short = 'C', long, default_value = "sitepolish.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// Report actions without writing any file
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run every stage in order: compress, remediate, downgrade,
    /// redirects, inline, minify
    #[command(visible_alias = "a")]
    Run,

    /// Generate resized and compressed image variants
    #[command(visible_alias = "c")]
    Compress,

    /// Rewrite references to broken variants to the best fallback
    #[command(visible_alias = "f")]
    Remediate,

    /// Cap SEO image references at the configured resolution ceiling
    #[command(visible_alias = "d")]
    Downgrade,

    /// Inline the critical stylesheet at each page's marker
    #[command(visible_alias = "i")]
    Inline,

    /// Minify HTML, CSS and JS in the output tree
    #[command(visible_alias = "m")]
    Minify,

    /// Rewrite internal links matching the configured redirect map
    #[command(visible_alias = "r")]
    Redirects,
}

#[allow(unused)]
impl Cli {
    pub const fn is_run(&self) -> bool {
        matches!(self.command, Commands::Run)
    }
    pub const fn is_compress(&self) -> bool {
        matches!(self.command, Commands::Compress)
    }
}
