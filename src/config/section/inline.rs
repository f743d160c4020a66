//! `[inline]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [inline]
//! stylesheet = "css/styles.css"
//! marker = "<css-inline-location-marker></css-inline-location-marker>"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InlineConfig {
    /// Stylesheet to inline, relative to the output root.
    pub stylesheet: PathBuf,

    /// Placeholder element each page carries where the `<style>` block
    /// belongs. Pages without it are left alone.
    pub marker: String,
}

impl Default for InlineConfig {
    fn default() -> Self {
        Self {
            stylesheet: PathBuf::from("css/styles.css"),
            marker: "<css-inline-location-marker></css-inline-location-marker>".to_string(),
        }
    }
}
