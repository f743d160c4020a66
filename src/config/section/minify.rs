//! `[minify]` section configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinifyConfig {
    /// Minify stylesheets with lightningcss.
    pub css: bool,

    /// Minify scripts with oxc.
    pub js: bool,

    /// Minify HTML documents with minify-html.
    pub html: bool,
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self {
            css: true,
            js: true,
            html: true,
        }
    }
}
