//! Site configuration management for `sitepolish.toml`.
//!
//! # Sections
//!
//! | Section       | Purpose                                            |
//! |---------------|----------------------------------------------------|
//! | `[paths]`     | Output root, asset directories, resized dir name   |
//! | `[images]`    | Size classes, SEO ceiling, quality, broken outputs |
//! | `[minify]`    | HTML/CSS/JS minification toggles                   |
//! | `[inline]`    | Critical-CSS stylesheet and page marker            |
//! | `[redirects]` | Old URL path -> new URL path rewrites              |

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{ImagesConfig, InlineConfig, MinifyConfig, PathsConfig};

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::cli::Cli;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing sitepolish.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Report actions without writing (internal use only, from --dry-run)
    #[serde(skip)]
    pub dry_run: bool,

    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,

    /// Image variant settings
    #[serde(default)]
    pub images: ImagesConfig,

    /// Minification settings
    #[serde(default)]
    pub minify: MinifyConfig,

    /// Critical-CSS inlining settings
    #[serde(default)]
    pub inline: InlineConfig,

    /// Internal link rewrites: old URL path -> new URL path
    #[serde(default)]
    pub redirects: FxHashMap<String, String>,
}

impl SiteConfig {
    /// Load configuration from the CLI-selected config file.
    ///
    /// A missing config file is not an error: every section has usable
    /// defaults and the pipeline runs fine without a `sitepolish.toml`.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = if cli.config.exists() {
            let raw = fs::read_to_string(&cli.config)
                .map_err(|e| ConfigError::Io(cli.config.clone(), e))?;
            let config: Self = toml::from_str(&raw).map_err(ConfigError::Toml)?;
            config
        } else {
            Self::default()
        };

        config.config_path = cli.config.clone();
        config.root = cli
            .config
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(
                || std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
                Path::to_path_buf,
            );
        config.dry_run = cli.dry_run;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(ConfigError::Validation(msg.to_string()).into());

        if self.images.sizes.is_empty() {
            return fail("images.sizes must not be empty");
        }
        if self.images.sizes.contains(&0) {
            return fail("images.sizes entries must be positive");
        }
        if self.images.seo_max_resolution == 0 {
            return fail("images.seo_max_resolution must be positive");
        }
        if !(1..=100).contains(&self.images.quality) {
            return fail("images.quality must be in 1..=100");
        }
        if self.images.formats.is_empty() {
            return fail("images.formats must not be empty");
        }
        if self.images.seo_format.is_empty() {
            return fail("images.seo_format must not be empty");
        }
        if self.inline.marker.is_empty() {
            return fail("inline.marker must not be empty");
        }
        if self.paths.resized.is_empty() || self.paths.resized.contains('/') {
            return fail("paths.resized must be a single directory name");
        }
        for target in self.redirects.values() {
            if !target.starts_with('/') {
                return fail("redirects targets must be absolute URL paths");
            }
        }
        Ok(())
    }

    /// Absolute path of the rendered output root.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.paths.output)
    }

    /// Absolute paths of the configured asset directories, existing ones
    /// only.
    pub fn asset_roots(&self) -> Vec<PathBuf> {
        let output = self.output_dir();
        self.paths
            .assets
            .iter()
            .map(|rel| output.join(rel))
            .filter(|dir| dir.is_dir())
            .collect()
    }

    /// The asset directory containing `path`, if any.
    pub fn asset_root_of(&self, path: &Path) -> Option<PathBuf> {
        self.asset_roots()
            .into_iter()
            .find(|root| path.starts_with(root))
    }

    /// Whether a variant path (relative to the output root) is on the
    /// broken-outputs list.
    pub fn is_broken_output(&self, rel: &str) -> Option<&str> {
        self.images.broken.get(rel).map(String::as_str)
    }

    /// Write a file unless --dry-run is active.
    pub fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if self.dry_run {
            crate::log!("dry-run"; "would write {}", path.display());
            return Ok(());
        }
        fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
    }
}
