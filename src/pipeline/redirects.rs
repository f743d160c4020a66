//! Internal link rewriting for moved pages.
//!
//! The generator emits redirect stubs for moved URLs, but internal anchors
//! pointing at the old location still cost visitors a hop. This stage
//! rewrites anchors whose path exactly matches a configured redirect
//! source, keeping any fragment.

use anyhow::Result;

use super::{Rewrite, StageOutcome, rewrite_html};
use crate::config::SiteConfig;
use crate::debug;
use crate::utils::url::split_path_fragment;

pub fn run(config: &SiteConfig) -> Result<StageOutcome> {
    if config.redirects.is_empty() {
        debug!("redirects"; "no redirects configured");
        return Ok(StageOutcome::default());
    }

    let outcome = rewrite_html(config, "redirects", |_, html| Ok(plan(config, html)))?;
    outcome.log_summary("redirects", "rewrote");
    Ok(outcome)
}

fn plan(config: &SiteConfig, html: &str) -> Vec<Rewrite> {
    anchor_hrefs(html)
        .into_iter()
        .filter_map(|href| {
            let (path, fragment) = split_path_fragment(&href);
            let target = config.redirects.get(path)?;
            let new = if fragment.is_empty() {
                target.clone()
            } else {
                format!("{target}#{fragment}")
            };
            Some((href, new))
        })
        .collect()
}

/// Extract anchor hrefs from a document.
pub(crate) fn anchor_hrefs(html: &str) -> Vec<String> {
    let Ok(dom) = tl::parse(html, tl::ParserOptions::default()) else {
        return Vec::new();
    };

    let mut hrefs = Vec::new();
    for node in dom.nodes() {
        let Some(tag) = node.as_tag() else { continue };
        if tag.name().as_utf8_str() != "a" {
            continue;
        }
        for (key, value) in tag.attributes().iter() {
            let key_str: &str = key.as_ref();
            if key_str == "href"
                && let Some(href) = value.map(|v| v.to_string())
                && !href.is_empty()
                && !hrefs.contains(&href)
            {
                hrefs.push(href);
            }
        }
    }
    hrefs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_with_redirects(root: &std::path::Path) -> SiteConfig {
        let mut config = SiteConfig {
            root: root.to_path_buf(),
            ..SiteConfig::default()
        };
        config
            .redirects
            .insert("/blog/1/".to_string(), "/posts/hello/".to_string());
        config
    }

    #[test]
    fn test_anchor_hrefs_extracted() {
        let html = r#"<a href="/blog/1/">one</a> <a href="/about">two</a> <a>none</a>"#;
        assert_eq!(anchor_hrefs(html), vec!["/blog/1/", "/about"]);
    }

    #[test]
    fn test_plan_matches_exact_path_only() {
        let tmp = TempDir::new().unwrap();
        let config = config_with_redirects(tmp.path());

        let html = r#"<a href="/blog/1/">x</a> <a href="/blog/10/">y</a>"#;
        let rewrites = plan(&config, html);
        assert_eq!(
            rewrites,
            vec![("/blog/1/".to_string(), "/posts/hello/".to_string())]
        );
    }

    #[test]
    fn test_plan_keeps_fragment() {
        let tmp = TempDir::new().unwrap();
        let config = config_with_redirects(tmp.path());

        let rewrites = plan(&config, r#"<a href="/blog/1/#comments">x</a>"#);
        assert_eq!(rewrites[0].1, "/posts/hello/#comments");
    }

    #[test]
    fn test_stage_rewrites_document() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("_site")).unwrap();
        let page = tmp.path().join("_site/index.html");
        fs::write(&page, r#"<a href="/blog/1/">old</a>"#).unwrap();

        let config = config_with_redirects(tmp.path());
        let outcome = run(&config).unwrap();
        assert_eq!(outcome.changed, 1);
        assert_eq!(
            fs::read_to_string(&page).unwrap(),
            r#"<a href="/posts/hello/">old</a>"#
        );
    }

    #[test]
    fn test_no_redirects_is_a_noop() {
        let tmp = TempDir::new().unwrap();
        let config = SiteConfig {
            root: tmp.path().to_path_buf(),
            ..SiteConfig::default()
        };
        assert_eq!(run(&config).unwrap(), StageOutcome::default());
    }
}
