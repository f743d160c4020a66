//! Broken-output remediation.
//!
//! Some generated variants are known to fail at encode time (the encoder
//! crashes or emits garbage on a specific input). Those outputs are listed
//! in `[images.broken]`; the compress stage refuses to generate them, and
//! this stage rewrites any HTML reference to them to the selector's best
//! fallback for the same source. The selector itself never sees the broken
//! list - it simply cannot pick a file that is not on disk.

use anyhow::Result;
use std::path::PathBuf;

use super::{Rewrite, StageOutcome, output_rel_key, rewrite_html};
use crate::config::SiteConfig;
use crate::variant::{VariantQuery, select_variant};
use crate::{debug, log};

pub fn run(config: &SiteConfig) -> Result<StageOutcome> {
    if config.images.broken.is_empty() {
        debug!("remediate"; "no broken outputs configured");
        return Ok(StageOutcome::default());
    }

    let fallbacks = plan_fallbacks(config)?;
    if fallbacks.is_empty() {
        log!("remediate"; "no fallback available for any broken output");
        return Ok(StageOutcome::default());
    }

    let outcome = rewrite_html(config, "remediate", |_, html| {
        Ok(fallbacks
            .iter()
            .filter(|(old, _)| html.contains(&format!("\"{old}\"")))
            .cloned()
            .collect())
    })?;
    outcome.log_summary("remediate", "repaired");
    Ok(outcome)
}

/// Resolve each broken output to its fallback URL rewrite.
///
/// Broken keys are sorted so log order and rewrite order are stable.
fn plan_fallbacks(config: &SiteConfig) -> Result<Vec<Rewrite>> {
    let output = config.output_dir();
    let mut entries: Vec<_> = config.images.broken.iter().collect();
    entries.sort();

    let mut rewrites = Vec::new();
    for (rel, reason) in entries {
        let abs: PathBuf = output.join(rel.split('/').collect::<PathBuf>());

        let Some(root) = config.asset_root_of(&abs) else {
            log!("warning"; "broken output /{rel} is outside every asset directory");
            continue;
        };
        let Some(ext) = abs.extension().and_then(|e| e.to_str()) else {
            log!("warning"; "broken output /{rel} has no extension");
            continue;
        };

        let query = VariantQuery::new().with_extension(ext);
        let found = select_variant(&root, &config.paths.resized, &abs, &query)?;
        match found {
            // A stale copy of the broken file itself is not a fallback.
            Some(path) if path != abs => {
                let Some(key) = output_rel_key(config, &path) else {
                    continue;
                };
                debug!("remediate"; "/{rel} -> /{key} ({reason})");
                rewrites.push((format!("/{rel}"), format!("/{key}")));
            }
            _ => log!("warning"; "no fallback for broken output /{rel} ({reason})"),
        }
    }
    Ok(rewrites)
}
