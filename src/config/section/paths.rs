//! `[paths]` section configuration.
//!
//! All paths are relative to the project root (the directory holding
//! `sitepolish.toml`); asset directories are additionally relative to the
//! rendered output tree, since the pipeline only ever touches rendered
//! files.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! output = "_site"
//! assets = ["assets/img"]
//! resized = "resized"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Rendered site root produced by the generator.
    pub output: PathBuf,

    /// Image asset directories inside the output tree. Each holds sources
    /// plus a nested resized subtree for generated variants.
    pub assets: Vec<PathBuf>,

    /// Name of the subtree holding generated variants, mirrored under each
    /// asset directory.
    pub resized: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("_site"),
            assets: vec![PathBuf::from("assets/img")],
            resized: "resized".to_string(),
        }
    }
}
