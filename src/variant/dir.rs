//! Compressed-variant directory computation.

use anyhow::{Result, ensure};
use std::path::{Component, Path, PathBuf};

/// Compute the directory expected to hold all generated variants of an
/// asset.
///
/// The asset path may be absolute (inside `assets_root`) or relative to it.
/// Its directory, with a leading resized component stripped when the asset
/// already lives in the resized tree, is re-rooted under
/// `assets_root/resized_name` preserving sub-directory structure.
///
/// Empty paths and paths escaping the assets root are caller-programming
/// errors and fail fast.
pub fn variant_dir(assets_root: &Path, resized_name: &str, asset: &Path) -> Result<PathBuf> {
    ensure!(!asset.as_os_str().is_empty(), "empty asset path");

    let rel = asset.strip_prefix(assets_root).unwrap_or(asset);
    ensure!(
        rel.is_relative(),
        "asset path outside the assets root: {}",
        asset.display()
    );
    ensure!(
        rel.components().all(|c| !matches!(c, Component::ParentDir)),
        "asset path escapes the assets root: {}",
        asset.display()
    );

    let rel_dir = rel.parent().unwrap_or_else(|| Path::new(""));
    // Variants of an already-resized asset are its own siblings.
    let rel_dir = rel_dir.strip_prefix(resized_name).unwrap_or(rel_dir);

    Ok(assets_root.join(resized_name).join(rel_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_at_root() {
        let dir = variant_dir(Path::new("assets/img"), "resized", Path::new("hero.jpg")).unwrap();
        assert_eq!(dir, PathBuf::from("assets/img/resized"));
    }

    #[test]
    fn test_source_in_subdir() {
        let dir = variant_dir(
            Path::new("assets/img"),
            "resized",
            Path::new("pets/cat.jpg"),
        )
        .unwrap();
        assert_eq!(dir, PathBuf::from("assets/img/resized/pets"));
    }

    #[test]
    fn test_absolute_source_under_root() {
        let dir = variant_dir(
            Path::new("/site/assets/img"),
            "resized",
            Path::new("/site/assets/img/pets/cat.jpg"),
        )
        .unwrap();
        assert_eq!(dir, PathBuf::from("/site/assets/img/resized/pets"));
    }

    #[test]
    fn test_resized_prefix_stripped() {
        // A variant's own variants live next to it, not in resized/resized/.
        let dir = variant_dir(
            Path::new("assets/img"),
            "resized",
            Path::new("resized/pets/cat-800.jpg"),
        )
        .unwrap();
        assert_eq!(dir, PathBuf::from("assets/img/resized/pets"));
    }

    #[test]
    fn test_empty_path_fails() {
        assert!(variant_dir(Path::new("assets"), "resized", Path::new("")).is_err());
    }

    #[test]
    fn test_escaping_path_fails() {
        assert!(variant_dir(Path::new("assets"), "resized", Path::new("../etc/passwd")).is_err());
    }

    #[test]
    fn test_foreign_absolute_path_fails() {
        assert!(variant_dir(Path::new("/site/assets"), "resized", Path::new("/tmp/x.jpg")).is_err());
    }
}
