//! HTML/CSS/JS minification across the output tree.
//!
//! Uses minify-html for documents, oxc for JavaScript and lightningcss
//! for CSS. A file is rewritten only when the minified form is actually
//! smaller; parse failures skip the file.
//!
//! This stage runs last: minify-html drops attribute quotes where it can,
//! which would defeat the quoted-attribute matching the rewriting stages
//! rely on.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::{StageOutcome, collect_files};
use crate::config::SiteConfig;
use crate::logger::ProgressLine;
use crate::{debug, log};

pub fn run(config: &SiteConfig) -> Result<StageOutcome> {
    let mut extensions = Vec::new();
    if config.minify.css {
        extensions.push("css");
    }
    if config.minify.js {
        extensions.push("js");
    }
    if config.minify.html {
        extensions.push("html");
    }
    if extensions.is_empty() {
        debug!("minify"; "all minification toggles disabled");
        return Ok(StageOutcome::default());
    }

    let files = collect_files(&config.output_dir(), &extensions);
    let progress = ProgressLine::new(&[("assets", files.len())]);

    let changed = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        match minify_file(config, path) {
            Ok(true) => {
                changed.fetch_add(1, Ordering::Relaxed);
            }
            Ok(false) => {}
            Err(e) => {
                failed.fetch_add(1, Ordering::Relaxed);
                log!("error"; "[minify] {}: {e:#}", path.display());
            }
        }
        progress.inc("assets");
    });
    progress.finish();

    let outcome = StageOutcome {
        processed: files.len(),
        changed: changed.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
    };
    outcome.log_summary("minify", "minified");
    Ok(outcome)
}

fn minify_file(config: &SiteConfig, path: &Path) -> Result<bool> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let Some(minified) = minify_by_ext(path, &content) else {
        debug!("minify"; "skipping unparseable {}", path.display());
        return Ok(false);
    };

    if minified.len() >= content.len() {
        return Ok(false);
    }
    config.write_file(path, minified.as_bytes())?;
    Ok(true)
}

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> Option<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        return None;
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Some(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Option<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default()).ok()?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .ok()?;
    Some(result.code)
}

/// Minify an HTML document.
pub fn minify_html_doc(source: &str) -> Option<String> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    String::from_utf8(minify_html::minify(source.as_bytes(), &cfg)).ok()
}

/// Minify content based on file extension.
///
/// Returns `Some(minified)` if minification succeeded, `None` otherwise.
pub fn minify_by_ext(path: &Path, content: &str) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    match ext {
        "js" => minify_js(content),
        "css" => minify_css(content),
        "html" => minify_html_doc(content),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_minify_css_drops_whitespace() {
        let out = minify_css("body {\n  color: red;\n}\n").unwrap();
        assert!(out.len() < "body {\n  color: red;\n}\n".len());
        assert!(out.contains("red"));
    }

    #[test]
    fn test_minify_css_invalid_returns_none() {
        assert!(minify_css("body { color: ").is_none());
    }

    #[test]
    fn test_minify_js_shrinks() {
        let src = "function add(first, second) {\n  return first + second;\n}\nexport { add };\n";
        let out = minify_js(src).unwrap();
        assert!(out.len() < src.len());
    }

    #[test]
    fn test_minify_html_collapses_whitespace_and_comments() {
        let src = "<html><head>\n</head><body>\n  <p>hi</p>\n  <!-- note -->\n</body></html>";
        let out = minify_html_doc(src).unwrap();
        assert!(out.len() < src.len());
        assert!(!out.contains("note"));
        assert!(out.contains("<p>hi</p>"));
    }

    #[test]
    fn test_minify_html_keeps_structural_tags() {
        let out = minify_html_doc("<html><head></head><body><div>x</div></body></html>").unwrap();
        assert!(out.contains("<html"));
        assert!(out.contains("</div>"));
    }

    #[test]
    fn test_minify_by_ext_dispatch() {
        assert!(minify_by_ext(Path::new("a.css"), "body{color:red}").is_some());
        assert!(minify_by_ext(Path::new("a.html"), "<p>a</p> <p>b</p>").is_some());
        assert!(minify_by_ext(Path::new("a.txt"), "whatever").is_none());
    }

    #[test]
    fn test_stage_rewrites_smaller_only() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("_site");
        std::fs::create_dir_all(&site).unwrap();
        let css = site.join("style.css");
        std::fs::write(&css, "body {\n  color: red;\n}\n").unwrap();
        // Already minimal: must not grow.
        let tiny = site.join("tiny.css");
        std::fs::write(&tiny, "a{color:red}").unwrap();

        let config = SiteConfig {
            root: tmp.path().to_path_buf(),
            ..SiteConfig::default()
        };
        let outcome = run(&config).unwrap();
        assert_eq!(outcome.processed, 2);
        assert_eq!(outcome.failed, 0);

        let minified = std::fs::read_to_string(&css).unwrap();
        assert!(minified.len() < "body {\n  color: red;\n}\n".len());
        assert_eq!(std::fs::read_to_string(&tiny).unwrap(), "a{color:red}");
    }
}
