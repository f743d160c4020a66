//! `[images]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [images]
//! sizes = [400, 800, 1600]
//! seo_max_resolution = 800
//! seo_format = "jpg"
//! extensions = ["jpg", "jpeg", "png", "webp"]
//! formats = ["jpg", "webp", "avif"]
//! quality = 85
//!
//! # Known-bad generated outputs, skipped at encode time and remediated in
//! # HTML. Key is the variant path relative to the output root.
//! [images.broken]
//! "assets/img/resized/banner-1600.webp" = "encoder aborts on this input"
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Resolution classes generated for each source image.
    pub sizes: Vec<u32>,

    /// Resolution ceiling applied when downgrading SEO image references.
    pub seo_max_resolution: u32,

    /// Variant format preferred for downgraded SEO references; crawlers
    /// handle baseline formats better than avif/webp.
    pub seo_format: String,

    /// File extensions treated as image sources (no leading dot).
    pub extensions: Vec<String>,

    /// Formats every variant is re-encoded into.
    pub formats: Vec<String>,

    /// Encoder quality for compressed (`-min`) variants, 1-100.
    pub quality: u8,

    /// Variant path (relative to output root) -> reason it must not be
    /// generated. Consumed by the compress and remediate stages; the
    /// selector itself never sees this list.
    pub broken: FxHashMap<String, String>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            sizes: vec![400, 800, 1600],
            seo_max_resolution: 800,
            seo_format: "jpg".to_string(),
            extensions: vec!["jpg", "jpeg", "png", "webp"]
                .into_iter()
                .map(String::from)
                .collect(),
            formats: vec!["jpg", "webp", "avif"]
                .into_iter()
                .map(String::from)
                .collect(),
            quality: 85,
            broken: FxHashMap::default(),
        }
    }
}

impl ImagesConfig {
    /// Check if a file extension is a handled image format.
    pub fn is_image_ext(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e == ext) || self.formats.iter().any(|e| e == ext)
    }
}
