//! Image variant generation.
//!
//! For every source image under the configured asset directories this
//! stage fills the resized subtree with the conventional variant set,
//! once per configured output format: one resized copy and one
//! resized+compressed copy per size class, plus a compressed copy at the
//! original size. Pixel work is delegated to ImageMagick; this stage only
//! owns naming and skip logic. Variants already on disk and outputs on
//! the broken list are never regenerated, and variants whose source image
//! is gone are pruned afterwards.

use anyhow::{Context, Result};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{StageOutcome, collect_files, output_rel_key};
use crate::config::SiteConfig;
use crate::logger::ProgressLine;
use crate::utils::exec::{Cmd, find_tool};
use crate::utils::plural::plural_count;
use crate::variant::grammar::strip_compression_suffix;
use crate::variant::variant_dir;
use crate::{debug, log};

pub fn run(config: &SiteConfig) -> Result<StageOutcome> {
    let Some(magick) = find_tool("magick").or_else(|| find_tool("convert")) else {
        log!("warning"; "ImageMagick not found on PATH - compress stage skipped");
        return Ok(StageOutcome::default());
    };

    let sources = source_images(config);
    let progress = ProgressLine::new(&[("images", sources.len())]);

    let changed = AtomicUsize::new(0);
    let generated = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    sources.par_iter().for_each(|source| {
        match compress_one(config, &magick, source) {
            Ok(0) => {}
            Ok(count) => {
                changed.fetch_add(1, Ordering::Relaxed);
                generated.fetch_add(count, Ordering::Relaxed);
            }
            Err(e) => {
                failed.fetch_add(1, Ordering::Relaxed);
                log!("error"; "[compress] {}: {e:#}", source.display());
            }
        }
        progress.inc("images");
    });
    progress.finish();

    let pruned = prune(config)?;
    if pruned > 0 {
        log!("compress"; "pruned {}", plural_count(pruned, "stale variant"));
    }

    let outcome = StageOutcome {
        processed: sources.len(),
        changed: changed.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
    };
    log!("compress"; "generated {} across {}{}",
        plural_count(generated.load(Ordering::Relaxed), "variant"),
        plural_count(outcome.processed, "image"),
        if outcome.failed > 0 { format!(" ({} failed)", outcome.failed) } else { String::new() });
    Ok(outcome)
}

/// Remove variants whose source image no longer exists.
///
/// The match is extension-insensitive: a variant survives as long as any
/// source file with its family name remains in the mirrored directory.
fn prune(config: &SiteConfig) -> Result<usize> {
    let mut extensions: Vec<&str> = config.images.extensions.iter().map(String::as_str).collect();
    for fmt in &config.images.formats {
        if !extensions.contains(&fmt.as_str()) {
            extensions.push(fmt);
        }
    }

    let mut removed = 0;
    for root in config.asset_roots() {
        let resized_root = root.join(&config.paths.resized);
        if !resized_root.is_dir() {
            continue;
        }

        let live: FxHashSet<PathBuf> = collect_files(&root, &extensions)
            .into_iter()
            .filter(|p| !p.starts_with(&resized_root))
            .filter_map(|p| Some(p.parent()?.join(p.file_stem()?)))
            .collect();

        for variant in collect_files(&resized_root, &extensions) {
            let Some(stem) = variant.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let family = strip_compression_suffix(stem);
            let Some(rel_dir) = variant.parent().and_then(|p| p.strip_prefix(&resized_root).ok())
            else {
                continue;
            };
            if live.contains(&root.join(rel_dir).join(family)) {
                continue;
            }

            if config.dry_run {
                log!("dry-run"; "would remove stale variant {}", variant.display());
            } else {
                fs::remove_file(&variant)
                    .with_context(|| format!("removing {}", variant.display()))?;
                log!("compress"; "removed stale variant {}", variant.display());
            }
            removed += 1;
        }
    }
    Ok(removed)
}

// =============================================================================
// Source discovery
// =============================================================================

/// All source images under the asset directories, excluding anything
/// already inside a resized subtree.
fn source_images(config: &SiteConfig) -> Vec<PathBuf> {
    let extensions: Vec<&str> = config.images.extensions.iter().map(String::as_str).collect();

    let mut files = Vec::new();
    for root in config.asset_roots() {
        for path in collect_files(&root, &extensions) {
            let in_resized = path.strip_prefix(&root).is_ok_and(|rel| {
                rel.components().next()
                    == Some(Component::Normal(config.paths.resized.as_ref()))
            });
            if !in_resized {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

// =============================================================================
// Target planning
// =============================================================================

/// One variant to generate.
#[derive(Debug, PartialEq, Eq)]
struct Target {
    path: PathBuf,
    resize: Option<u32>,
    compress: bool,
}

/// The conventional variant set for one source image.
fn plan_targets(config: &SiteConfig, root: &Path, source: &Path) -> Result<Vec<Target>> {
    let dir = variant_dir(root, &config.paths.resized, source)?;

    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("no base name: {}", source.display()))?;
    let family = strip_compression_suffix(stem);

    let per_format = config.images.sizes.len() * 2 + 1;
    let mut targets = Vec::with_capacity(config.images.formats.len() * per_format);
    for fmt in &config.images.formats {
        for &size in &config.images.sizes {
            targets.push(Target {
                path: dir.join(format!("{family}-{size}.{fmt}")),
                resize: Some(size),
                compress: false,
            });
            targets.push(Target {
                path: dir.join(format!("{family}-{size}-min.{fmt}")),
                resize: Some(size),
                compress: true,
            });
        }
        targets.push(Target {
            path: dir.join(format!("{family}-min.{fmt}")),
            resize: None,
            compress: true,
        });
    }
    Ok(targets)
}

// =============================================================================
// Generation
// =============================================================================

/// Generate missing variants for one source. Returns how many were
/// generated (or would be, under --dry-run).
fn compress_one(config: &SiteConfig, magick: &Path, source: &Path) -> Result<usize> {
    let root = config
        .asset_root_of(source)
        .with_context(|| format!("{} is outside every asset directory", source.display()))?;
    let targets = plan_targets(config, &root, source)?;

    let mut generated = 0;
    for target in targets {
        if target.path.exists() {
            continue;
        }
        if let Some(key) = output_rel_key(config, &target.path)
            && let Some(reason) = config.is_broken_output(&key)
        {
            debug!("compress"; "skipping /{key}: {reason}");
            continue;
        }

        if config.dry_run {
            log!("dry-run"; "would generate {}", target.path.display());
            generated += 1;
            continue;
        }

        if let Some(parent) = target.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        encode(magick, source, &target, config.images.quality)?;
        generated += 1;
    }
    Ok(generated)
}

fn encode(magick: &Path, source: &Path, target: &Target, quality: u8) -> Result<()> {
    let mut cmd = Cmd::new(magick).arg(source);
    if let Some(size) = target.resize {
        // `>` keeps images below the size class untouched.
        cmd = cmd.args(["-resize", &format!("{size}x{size}>")]);
    }
    if target.compress {
        cmd = cmd.args(["-strip", "-interlace", "Plane", "-quality", &quality.to_string()]);
    }
    cmd.arg(&target.path).run()?;
    Ok(())
}
