//! Post-processing pipeline stages.
//!
//! Each stage is an independent pass over the rendered output tree,
//! dispatched over a rayon worker pool. A file that fails is logged and
//! skipped; the stage carries on. Rewrites are whole-file
//! read-then-write, so a failed file is never left half-written.
//!
//! Stage order for `run`:
//!
//! ```text
//! compress -> remediate -> downgrade -> redirects -> inline -> minify
//! ```
//!
//! Compression runs first so the later rewriting stages see every variant
//! that will exist on disk. Minification runs last: it strips attribute
//! quotes, which the URL-rewriting stages match on.

pub mod compress;
pub mod downgrade;
pub mod inline;
pub mod minify;
pub mod redirects;
pub mod remediate;

use anyhow::{Context, Result};
use jwalk::WalkDir;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::SiteConfig;
use crate::log;
use crate::logger::ProgressLine;
use crate::utils::plural::plural_count;

/// Run every stage in order.
pub fn run_all(config: &SiteConfig) -> Result<()> {
    compress::run(config)?;
    remediate::run(config)?;
    downgrade::run(config)?;
    redirects::run(config)?;
    inline::run(config)?;
    minify::run(config)?;
    Ok(())
}

// =============================================================================
// Stage outcome
// =============================================================================

/// Per-stage counters, logged as a one-line summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StageOutcome {
    pub processed: usize,
    pub changed: usize,
    pub failed: usize,
}

impl StageOutcome {
    pub fn log_summary(&self, stage: &str, verb: &str) {
        if self.failed > 0 {
            log!(stage; "{verb} {} of {} ({} failed)",
                plural_count(self.changed, "file"), self.processed, self.failed);
        } else {
            log!(stage; "{verb} {} of {}",
                plural_count(self.changed, "file"), self.processed);
        }
    }
}

// =============================================================================
// Tree walking
// =============================================================================

const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Collect all files under `dir` with one of the given extensions.
pub(crate) fn collect_files(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.contains(&e))
        })
        .collect();
    files.sort();
    files
}

/// All HTML documents in the output tree.
pub(crate) fn html_files(config: &SiteConfig) -> Vec<PathBuf> {
    collect_files(&config.output_dir(), &["html"])
}

/// Forward-slash path of `path` relative to the output root, used as the
/// key format for URLs and the broken-outputs map.
pub(crate) fn output_rel_key(config: &SiteConfig, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(config.output_dir()).ok()?;
    let url = crate::utils::url::rel_path_to_url(rel);
    Some(url.trim_start_matches('/').to_string())
}

// =============================================================================
// HTML rewriting
// =============================================================================

/// A single URL rewrite inside a document.
pub(crate) type Rewrite = (String, String);

/// Rewrite every HTML document with replacements planned per file.
///
/// `plan` inspects a document and returns `(old_url, new_url)` pairs; URLs
/// are replaced in quoted-attribute position only. Planning errors fail
/// the file, not the stage.
pub(crate) fn rewrite_html(
    config: &SiteConfig,
    stage: &'static str,
    plan: impl Fn(&Path, &str) -> Result<Vec<Rewrite>> + Sync,
) -> Result<StageOutcome> {
    let files = html_files(config);
    let progress = ProgressLine::new(&[("html", files.len())]);

    let changed = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        match rewrite_one(config, path, &plan) {
            Ok(true) => {
                changed.fetch_add(1, Ordering::Relaxed);
            }
            Ok(false) => {}
            Err(e) => {
                failed.fetch_add(1, Ordering::Relaxed);
                log!("error"; "[{stage}] {}: {e:#}", path.display());
            }
        }
        progress.inc("html");
    });
    progress.finish();

    Ok(StageOutcome {
        processed: files.len(),
        changed: changed.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
    })
}

fn rewrite_one(
    config: &SiteConfig,
    path: &Path,
    plan: &(impl Fn(&Path, &str) -> Result<Vec<Rewrite>> + Sync),
) -> Result<bool> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let rewrites = plan(path, &content)?;
    if rewrites.is_empty() {
        return Ok(false);
    }

    let updated = apply_rewrites(&content, &rewrites);
    if updated == content {
        return Ok(false);
    }

    config.write_file(path, updated.as_bytes())?;
    Ok(true)
}

/// Replace URLs in quoted-attribute position (`"old"` -> `"new"`), leaving
/// prose mentions of the same string untouched.
pub(crate) fn apply_rewrites(content: &str, rewrites: &[Rewrite]) -> String {
    let mut updated = content.to_string();
    for (old, new) in rewrites {
        if old == new {
            continue;
        }
        updated = updated.replace(&format!("\"{old}\""), &format!("\"{new}\""));
    }
    updated
}
