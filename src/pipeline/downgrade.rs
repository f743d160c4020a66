//! SEO image resolution downgrade.
//!
//! Crawlers fetch the images referenced from `og:image` / `twitter:image`
//! meta tags, and those default to the full-size source. This stage asks
//! the variant selector for a substitute capped at the configured ceiling,
//! in the configured crawler-friendly format, and rewrites the reference.
//! A reference with no qualifying variant is left alone.

use anyhow::Result;
use std::path::Path;

use super::{Rewrite, StageOutcome, output_rel_key, rewrite_html};
use crate::config::SiteConfig;
use crate::utils::url::url_to_rel_path;
use crate::variant::grammar::extract_resolution;
use crate::variant::{VariantQuery, select_variant};

/// Meta properties whose content is an SEO image URL.
const SEO_IMAGE_PROPERTIES: &[&str] = &["og:image", "og:image:url", "og:image:secure_url"];
const SEO_IMAGE_NAMES: &[&str] = &["twitter:image", "twitter:image:src"];

pub fn run(config: &SiteConfig) -> Result<StageOutcome> {
    let outcome = rewrite_html(config, "downgrade", |_, html| plan(config, html))?;
    outcome.log_summary("downgrade", "downgraded");
    Ok(outcome)
}

fn plan(config: &SiteConfig, html: &str) -> Result<Vec<Rewrite>> {
    let mut rewrites = Vec::new();
    for url in seo_image_urls(html) {
        if let Some(rewrite) = rewrite_for(config, &url)? {
            rewrites.push(rewrite);
        }
    }
    Ok(rewrites)
}

/// Extract SEO image URLs from a document's meta tags.
pub(crate) fn seo_image_urls(html: &str) -> Vec<String> {
    let Ok(dom) = tl::parse(html, tl::ParserOptions::default()) else {
        return Vec::new();
    };

    let mut urls = Vec::new();
    for node in dom.nodes() {
        let Some(tag) = node.as_tag() else { continue };
        if tag.name().as_utf8_str() != "meta" {
            continue;
        }

        let is_seo_image = attr(tag, "property")
            .is_some_and(|p| SEO_IMAGE_PROPERTIES.contains(&p.as_str()))
            || attr(tag, "name").is_some_and(|n| SEO_IMAGE_NAMES.contains(&n.as_str()));
        if !is_seo_image {
            continue;
        }

        if let Some(content) = attr(tag, "content")
            && !content.is_empty()
            && !urls.contains(&content)
        {
            urls.push(content);
        }
    }
    urls
}

fn attr(tag: &tl::HTMLTag, name: &str) -> Option<String> {
    for (key, value) in tag.attributes().iter() {
        let key_str: &str = key.as_ref();
        if key_str == name {
            return value.map(|v| v.to_string());
        }
    }
    None
}

/// Split a URL into an optional scheme+host prefix and the site path.
/// SEO meta content is often fully qualified even for same-site images.
fn split_site_path(url: &str) -> Option<(&str, &str)> {
    if let Some(scheme_end) = url.find("://") {
        let rest = &url[scheme_end + 3..];
        let slash = rest.find('/')?;
        let split = scheme_end + 3 + slash;
        Some((&url[..split], &url[split..]))
    } else if url.starts_with('/') {
        Some(("", url))
    } else {
        None
    }
}

fn rewrite_for(config: &SiteConfig, url: &str) -> Result<Option<Rewrite>> {
    let ceiling = config.images.seo_max_resolution;

    let Some((prefix, path)) = split_site_path(url) else {
        return Ok(None);
    };
    let Some(rel) = url_to_rel_path(path) else {
        return Ok(None);
    };

    let ext = rel.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !config.images.is_image_ext(ext) {
        return Ok(None);
    }

    let abs = config.output_dir().join(&rel);
    // Already at or below the ceiling: nothing to downgrade.
    if let Some(stem) = abs.file_stem().and_then(|s| s.to_str())
        && extract_resolution(stem).fits(ceiling)
    {
        return Ok(None);
    }

    let Some(root) = config.asset_root_of(&abs) else {
        return Ok(None);
    };

    let query = VariantQuery::new()
        .with_ceiling(ceiling)
        .with_extension(&config.images.seo_format);
    let Some(found) = select_variant(&root, &config.paths.resized, &abs, &query)? else {
        return Ok(None);
    };

    let Some(key) = output_rel_key(config, &found) else {
        return Ok(None);
    };
    Ok(Some((url.to_string(), format!("{prefix}/{key}"))))
}
