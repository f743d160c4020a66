//! Naming grammar for generated image variants.
//!
//! A variant base name is `family[-resolution][-min]`: an optional numeric
//! resolution tag, then an optional compression marker, always in that
//! order. `hero-800-min` is the 800px resized, compressed descendant of
//! `hero`. All functions here are pure and never fail; a name that does not
//! carry a marker simply passes through unchanged.

/// Marker appended to a base name after external compression.
/// Always the last modifier before the extension.
pub const COMPRESSION_MARKER: &str = "-min";

// =============================================================================
// Resolution
// =============================================================================

/// Resolution class of a variant.
///
/// `Unbounded` means no resolution tag: the original, unresized size.
/// It sorts strictly greater than every bounded value so that unresized
/// variants always rank as the largest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Resolution {
    Bounded(u32),
    Unbounded,
}

impl Resolution {
    /// Whether this resolution satisfies a ceiling. `Unbounded` never does:
    /// an unresized original cannot satisfy a resolution cap.
    pub fn fits(self, ceiling: u32) -> bool {
        match self {
            Self::Bounded(r) => r <= ceiling,
            Self::Unbounded => false,
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Strict base-10 integer check: non-empty, digits only, no sign, no
/// partial parse. Values that overflow `u32` are not valid resolution tags.
pub fn is_valid_integer(token: &str) -> bool {
    parse_resolution_tag(token).is_some()
}

fn parse_resolution_tag(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Strip the compression marker and a trailing numeric resolution segment
/// from a base name, returning the family: the stable identity shared by a
/// source image and all of its generated descendants.
///
/// Idempotent: stripping an already-stripped family changes nothing.
pub fn strip_compression_suffix(base_name: &str) -> &str {
    let base = base_name
        .strip_suffix(COMPRESSION_MARKER)
        .unwrap_or(base_name);
    match base.rsplit_once('-') {
        Some((family, tail)) if is_valid_integer(tail) => family,
        _ => base,
    }
}

/// Extract the resolution tag from a base name.
///
/// The compression marker is stripped first; the final hyphen-delimited
/// segment is the tag iff it is purely numeric. Anything else (a word, a
/// missing segment) means `Unbounded`.
pub fn extract_resolution(base_name: &str) -> Resolution {
    let base = base_name
        .strip_suffix(COMPRESSION_MARKER)
        .unwrap_or(base_name);
    base.rsplit_once('-')
        .and_then(|(_, tail)| parse_resolution_tag(tail))
        .map_or(Resolution::Unbounded, Resolution::Bounded)
}

/// Whether a base name carries the compression marker (after resolution-tag
/// stripping, though by convention the marker is always last).
pub fn is_minified(base_name: &str) -> bool {
    if base_name.ends_with(COMPRESSION_MARKER) {
        return true;
    }
    match base_name.rsplit_once('-') {
        Some((head, tail)) if is_valid_integer(tail) => head.ends_with(COMPRESSION_MARKER),
        _ => false,
    }
}

// =============================================================================
// Family membership
// =============================================================================

/// Whether `candidate` (a full file name) is a variant of `family` with the
/// given extension.
///
/// The candidate must start with the family, end with `.extension`, and the
/// middle (marker stripped) must be empty or a single hyphen-delimited
/// numeric segment. The single-segment rule excludes unrelated files that
/// merely share a prefix: family `cat` does not match `cat-2023-hero.jpg`.
pub fn is_in_family(candidate: &str, family: &str, extension: &str) -> bool {
    if family.is_empty() {
        return false;
    }
    let Some(rest) = candidate.strip_prefix(family) else {
        return false;
    };
    let Some(middle) = rest
        .strip_suffix(extension)
        .and_then(|m| m.strip_suffix('.'))
    else {
        return false;
    };
    let middle = middle.strip_suffix(COMPRESSION_MARKER).unwrap_or(middle);
    middle.is_empty() || middle.strip_prefix('-').is_some_and(is_valid_integer)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // is_valid_integer
    // ------------------------------------------------------------------------

    #[test]
    fn test_valid_integer_accepts_digits() {
        assert!(is_valid_integer("12"));
        assert!(is_valid_integer("0"));
        assert!(is_valid_integer("1600"));
    }

    #[test]
    fn test_valid_integer_rejects_partial_parse() {
        assert!(!is_valid_integer("12x"));
        assert!(!is_valid_integer("x12"));
        assert!(!is_valid_integer(""));
        assert!(!is_valid_integer("-12"));
        assert!(!is_valid_integer("+12"));
        assert!(!is_valid_integer("1.5"));
    }

    #[test]
    fn test_valid_integer_rejects_overflow() {
        assert!(!is_valid_integer("99999999999999999999"));
    }

    // ------------------------------------------------------------------------
    // strip_compression_suffix
    // ------------------------------------------------------------------------

    #[test]
    fn test_strip_plain_name_is_noop() {
        assert_eq!(strip_compression_suffix("hero"), "hero");
        assert_eq!(strip_compression_suffix("team-photo"), "team-photo");
    }

    #[test]
    fn test_strip_resolution_segment() {
        assert_eq!(strip_compression_suffix("hero-800"), "hero");
        assert_eq!(strip_compression_suffix("team-photo-1600"), "team-photo");
    }

    #[test]
    fn test_strip_marker_then_resolution() {
        assert_eq!(strip_compression_suffix("hero-min"), "hero");
        assert_eq!(strip_compression_suffix("hero-800-min"), "hero");
    }

    #[test]
    fn test_strip_non_numeric_tail_kept() {
        assert_eq!(strip_compression_suffix("hero-banner"), "hero-banner");
        assert_eq!(strip_compression_suffix("hero-12x"), "hero-12x");
    }

    #[test]
    fn test_strip_idempotent() {
        for name in ["hero-800-min", "hero-min", "hero-800", "hero", "a-b-400"] {
            let once = strip_compression_suffix(name);
            assert_eq!(strip_compression_suffix(once), once, "name: {name}");
        }
    }

    // ------------------------------------------------------------------------
    // extract_resolution
    // ------------------------------------------------------------------------

    #[test]
    fn test_resolution_of_plain_name_is_unbounded() {
        assert_eq!(extract_resolution("hero"), Resolution::Unbounded);
        assert_eq!(extract_resolution("hero-banner"), Resolution::Unbounded);
    }

    #[test]
    fn test_resolution_extracted() {
        assert_eq!(extract_resolution("hero-800"), Resolution::Bounded(800));
        assert_eq!(extract_resolution("hero-0"), Resolution::Bounded(0));
    }

    #[test]
    fn test_resolution_under_marker() {
        assert_eq!(extract_resolution("hero-800-min"), Resolution::Bounded(800));
        assert_eq!(extract_resolution("hero-min"), Resolution::Unbounded);
    }

    #[test]
    fn test_resolution_roundtrip() {
        for r in [0u32, 1, 400, 1600, 99999] {
            let name = format!("family-{r}");
            assert_eq!(strip_compression_suffix(&name), "family");
            assert_eq!(extract_resolution(&name), Resolution::Bounded(r));
        }
    }

    #[test]
    fn test_unbounded_sorts_above_every_bounded() {
        assert!(Resolution::Unbounded > Resolution::Bounded(u32::MAX));
        assert!(Resolution::Bounded(400) < Resolution::Bounded(800));
    }

    #[test]
    fn test_fits_ceiling() {
        assert!(Resolution::Bounded(800).fits(800));
        assert!(!Resolution::Bounded(801).fits(800));
        assert!(!Resolution::Unbounded.fits(u32::MAX));
    }

    // ------------------------------------------------------------------------
    // is_minified
    // ------------------------------------------------------------------------

    #[test]
    fn test_is_minified() {
        assert!(is_minified("hero-min"));
        assert!(is_minified("hero-800-min"));
        assert!(!is_minified("hero-800"));
        assert!(!is_minified("hero"));
        assert!(!is_minified("hero-minify"));
    }

    // ------------------------------------------------------------------------
    // is_in_family
    // ------------------------------------------------------------------------

    #[test]
    fn test_family_reflexive_on_own_name() {
        assert!(is_in_family("hero.jpg", "hero", "jpg"));
    }

    #[test]
    fn test_family_matches_variants() {
        assert!(is_in_family("hero-800.jpg", "hero", "jpg"));
        assert!(is_in_family("hero-min.jpg", "hero", "jpg"));
        assert!(is_in_family("hero-800-min.jpg", "hero", "jpg"));
    }

    #[test]
    fn test_family_rejects_prefix_sharers() {
        // Shares the string prefix but is a different family.
        assert!(!is_in_family("heroic-800.jpg", "hero", "jpg"));
        assert!(!is_in_family("hero-banner.jpg", "hero", "jpg"));
    }

    #[test]
    fn test_family_rejects_extra_middle_segments() {
        // Single-extra-segment rule: one numeric segment at most.
        assert!(!is_in_family("logo-banner-800.jpg", "logo", "jpg"));
        assert!(!is_in_family("cat-2023-hero.jpg", "cat", "jpg"));
        assert!(!is_in_family("hero-800-400.jpg", "hero", "jpg"));
    }

    #[test]
    fn test_family_requires_extension() {
        assert!(!is_in_family("hero-800.png", "hero", "jpg"));
        assert!(!is_in_family("hero-800", "hero", "jpg"));
        // Extension must follow a dot, not merely be a suffix.
        assert!(!is_in_family("hero-800jpg", "hero", "jpg"));
    }

    #[test]
    fn test_family_empty_never_matches() {
        assert!(!is_in_family("hero.jpg", "", "jpg"));
    }
}
