//! Count formatting for stage summaries.

/// Format a count with its noun, pluralized with a trailing `s`.
///
/// # Examples
///
/// - `plural_count(0, "image")` -> `"0 images"`
/// - `plural_count(1, "variant")` -> `"1 variant"`
/// - `plural_count(3, "stale variant")` -> `"3 stale variants"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_is_singular() {
        assert_eq!(plural_count(1, "image"), "1 image");
    }

    #[test]
    fn test_zero_and_many_are_plural() {
        assert_eq!(plural_count(0, "file"), "0 files");
        assert_eq!(plural_count(12, "variant"), "12 variants");
    }

    #[test]
    fn test_compound_noun() {
        assert_eq!(plural_count(2, "stale variant"), "2 stale variants");
    }
}
