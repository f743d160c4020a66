//! URL processing utilities.
//!
//! The pipeline rewrites URLs found in rendered HTML, so it constantly maps
//! between site-absolute URL paths (`/assets/img/hero.jpg`) and filesystem
//! paths under the output root (`_site/assets/img/hero.jpg`).

use std::path::{Component, Path, PathBuf};

/// Check if a link is external (has a URL scheme like http:, mailto:, etc.)
///
/// A valid scheme must:
/// - Have at least 1 character before the colon
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
#[inline]
pub fn is_external_link(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    }) || link.starts_with("//")
}

/// Split a URL into path and fragment parts
///
/// # Returns
/// A tuple of (path, fragment) where fragment is empty string if no `#` found
#[inline]
pub fn split_path_fragment(url: &str) -> (&str, &str) {
    url.split_once('#').unwrap_or((url, ""))
}

/// Map a site-absolute URL to a path relative to the output root.
///
/// Returns `None` for external links, fragment-only links, and anything not
/// starting with `/`. Query strings and fragments are dropped.
pub fn url_to_rel_path(url: &str) -> Option<PathBuf> {
    if is_external_link(url) {
        return None;
    }
    let (path, _) = split_path_fragment(url);
    let path = path.split_once('?').map_or(path, |(p, _)| p);
    let rel = path.strip_prefix('/')?;
    if rel.is_empty() {
        return None;
    }
    Some(rel.split('/').collect())
}

/// Map a path relative to the output root back to a site-absolute URL.
pub fn rel_path_to_url(path: &Path) -> String {
    let mut url = String::new();
    for component in path.components() {
        if let Component::Normal(part) = component {
            url.push('/');
            url.push_str(&part.to_string_lossy());
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_external_link() {
        assert!(is_external_link("https://example.com"));
        assert!(is_external_link("mailto:user@example.com"));
        assert!(is_external_link("//cdn.example.com/a.jpg"));
        assert!(!is_external_link("/about"));
        assert!(!is_external_link("./file.txt"));
        assert!(!is_external_link("#section"));
    }

    #[test]
    fn test_url_to_rel_path() {
        assert_eq!(
            url_to_rel_path("/assets/img/hero.jpg"),
            Some(PathBuf::from("assets/img/hero.jpg"))
        );
        assert_eq!(
            url_to_rel_path("/assets/img/hero.jpg?v=1#top"),
            Some(PathBuf::from("assets/img/hero.jpg"))
        );
        assert_eq!(url_to_rel_path("https://x.com/a.jpg"), None);
        assert_eq!(url_to_rel_path("relative/a.jpg"), None);
        assert_eq!(url_to_rel_path("/"), None);
        assert_eq!(url_to_rel_path("#top"), None);
    }

    #[test]
    fn test_rel_path_to_url() {
        assert_eq!(
            rel_path_to_url(Path::new("assets/img/hero-800.jpg")),
            "/assets/img/hero-800.jpg"
        );
    }

    #[test]
    fn test_url_roundtrip() {
        let rel = url_to_rel_path("/assets/img/resized/hero-800.jpg").unwrap();
        assert_eq!(rel_path_to_url(&rel), "/assets/img/resized/hero-800.jpg");
    }
}
