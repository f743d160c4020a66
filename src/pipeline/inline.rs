//! Critical-CSS inlining.
//!
//! Pages carry a placeholder element where the site stylesheet belongs;
//! this stage replaces it with a `<style>` block holding the minified
//! stylesheet, saving the render-blocking fetch. Pages without the
//! marker are left alone, and a missing stylesheet disables the stage.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{StageOutcome, html_files, minify};
use crate::config::SiteConfig;
use crate::logger::ProgressLine;
use crate::{debug, log};

pub fn run(config: &SiteConfig) -> Result<StageOutcome> {
    let css_path = config.output_dir().join(&config.inline.stylesheet);
    if !css_path.is_file() {
        debug!("inline"; "no stylesheet at {}", css_path.display());
        return Ok(StageOutcome::default());
    }
    let css = fs::read_to_string(&css_path)
        .with_context(|| format!("reading {}", css_path.display()))?;
    let css = minify::minify_css(&css).unwrap_or(css);
    let style = format!("<style>{css}</style>");

    let files = html_files(config);
    let progress = ProgressLine::new(&[("html", files.len())]);

    let changed = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        match inline_one(config, path, &style) {
            Ok(true) => {
                changed.fetch_add(1, Ordering::Relaxed);
            }
            Ok(false) => {}
            Err(e) => {
                failed.fetch_add(1, Ordering::Relaxed);
                log!("error"; "[inline] {}: {e:#}", path.display());
            }
        }
        progress.inc("html");
    });
    progress.finish();

    let outcome = StageOutcome {
        processed: files.len(),
        changed: changed.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
    };
    outcome.log_summary("inline", "inlined into");
    Ok(outcome)
}

fn inline_one(config: &SiteConfig, path: &Path, style: &str) -> Result<bool> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if !content.contains(&config.inline.marker) {
        return Ok(false);
    }

    let updated = content.replace(&config.inline.marker, style);
    config.write_file(path, updated.as_bytes())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MARKER: &str = "<css-inline-location-marker></css-inline-location-marker>";

    fn site_fixture() -> (TempDir, SiteConfig) {
        let tmp = TempDir::new().unwrap();
        let css = tmp.path().join("_site/css");
        fs::create_dir_all(&css).unwrap();
        fs::write(css.join("styles.css"), "body {\n  color: red;\n}\n").unwrap();

        let config = SiteConfig {
            root: tmp.path().to_path_buf(),
            ..SiteConfig::default()
        };
        (tmp, config)
    }

    #[test]
    fn test_marker_replaced_with_style_block() {
        let (tmp, config) = site_fixture();
        let page = tmp.path().join("_site/index.html");
        fs::write(&page, format!("<head>{MARKER}</head>")).unwrap();

        let outcome = run(&config).unwrap();
        assert_eq!(outcome.changed, 1);

        let updated = fs::read_to_string(&page).unwrap();
        assert!(!updated.contains(MARKER));
        assert!(updated.contains("<style>"));
        assert!(updated.contains("red"));
    }

    #[test]
    fn test_page_without_marker_untouched() {
        let (tmp, config) = site_fixture();
        let page = tmp.path().join("_site/plain.html");
        fs::write(&page, "<head></head>").unwrap();

        let outcome = run(&config).unwrap();
        assert_eq!(outcome.changed, 0);
        assert_eq!(fs::read_to_string(&page).unwrap(), "<head></head>");
    }

    #[test]
    fn test_missing_stylesheet_disables_stage() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("_site")).unwrap();
        let config = SiteConfig {
            root: tmp.path().to_path_buf(),
            ..SiteConfig::default()
        };
        assert_eq!(run(&config).unwrap(), StageOutcome::default());
    }

    #[test]
    fn test_inlined_css_is_minified() {
        let (tmp, config) = site_fixture();
        let page = tmp.path().join("_site/index.html");
        fs::write(&page, MARKER).unwrap();

        run(&config).unwrap();
        let updated = fs::read_to_string(&page).unwrap();
        // Whitespace from the source stylesheet is gone.
        assert!(!updated.contains("  color"));
    }
}
