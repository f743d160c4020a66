//! Best-variant selection.
//!
//! Given a requested asset, an optional resolution ceiling and an optional
//! target extension, scan the compressed-variant directory for family
//! siblings and pick the highest-resolution candidate that satisfies every
//! filter. Absence of a qualifying candidate is a normal result, never an
//! error.

use anyhow::{Context, Result, ensure};
use std::path::{Path, PathBuf};

use super::dir::variant_dir;
use super::grammar::{self, Resolution};

// =============================================================================
// Query
// =============================================================================

/// Constraints for a variant lookup.
#[derive(Debug, Clone, Default)]
pub struct VariantQuery {
    /// Highest acceptable resolution tag. Unresized candidates (no tag)
    /// never satisfy a ceiling.
    pub max_resolution: Option<u32>,
    /// Target extension without leading dot. Overrides the source's own
    /// extension when supplied.
    pub extension: Option<String>,
}

impl VariantQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ceiling(mut self, ceiling: u32) -> Self {
        self.max_resolution = Some(ceiling);
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }
}

// =============================================================================
// Selection
// =============================================================================

/// One family-matching file in the variant directory.
struct Candidate {
    name: String,
    resolution: Resolution,
    minified: bool,
}

/// Select the best substitute variant for `asset`, or `None` when no
/// qualifying sibling exists.
///
/// Filters, in order: family membership with the target extension, the
/// resolution ceiling, then a preference pass that narrows to minified
/// candidates whenever any survive (callers prefer already-compressed
/// substitutes, but fall back to a plain resized copy). The survivor with
/// the highest resolution wins; unresized candidates rank above all
/// resized ones.
pub fn select_variant(
    assets_root: &Path,
    resized_name: &str,
    asset: &Path,
    query: &VariantQuery,
) -> Result<Option<PathBuf>> {
    let dir = variant_dir(assets_root, resized_name, asset)?;

    let stem = asset
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty());
    let Some(stem) = stem else {
        anyhow::bail!("asset path has no base name: {}", asset.display());
    };
    let family = grammar::strip_compression_suffix(stem);

    let extension = match &query.extension {
        Some(ext) => ext.as_str(),
        None => asset.extension().and_then(|e| e.to_str()).unwrap_or(""),
    };
    ensure!(
        !extension.is_empty(),
        "no target extension for {}",
        asset.display()
    );

    if !dir.is_dir() {
        return Ok(None);
    }

    let mut candidates = Vec::new();
    let entries =
        std::fs::read_dir(&dir).with_context(|| format!("listing {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if !grammar::is_in_family(&name, family, extension) {
            continue;
        }
        // Membership guarantees the ".ext" suffix is present.
        let base = &name[..name.len() - extension.len() - 1];
        candidates.push(Candidate {
            resolution: grammar::extract_resolution(base),
            minified: grammar::is_minified(base),
            name,
        });
    }

    if let Some(ceiling) = query.max_resolution {
        candidates.retain(|c| c.resolution.fits(ceiling));
    }
    if candidates.iter().any(|c| c.minified) {
        candidates.retain(|c| c.minified);
    }

    // Name as tie-break keeps the result independent of listing order.
    candidates.sort_by(|a, b| {
        a.resolution
            .cmp(&b.resolution)
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(candidates.pop().map(|c| dir.join(c.name)))
}
