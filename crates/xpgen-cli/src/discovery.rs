//! Resource definition file discovery

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find all resource definition files named `file_name` below `root`.
///
/// Definition files live in per-resource directories under the search
/// root, at most one extra level deep (`root/<resource>/` or
/// `root/<group>/<resource>/`). Results are sorted for deterministic
/// processing order.
pub fn discover(root: &Path, file_name: &str) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut found = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(2)
        .max_depth(3)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name().to_string_lossy() == file_name {
            found.push(entry.into_path());
        }
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovers_nested_definition_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        std::fs::create_dir_all(root.join("bucket")).unwrap();
        std::fs::create_dir_all(root.join("aws/queue")).unwrap();
        std::fs::create_dir_all(root.join("too/deep/nested")).unwrap();

        std::fs::write(root.join("bucket/generate.yaml"), "name: Bucket").unwrap();
        std::fs::write(root.join("aws/queue/generate.yaml"), "name: Queue").unwrap();
        std::fs::write(root.join("too/deep/nested/generate.yaml"), "name: Deep").unwrap();
        // the root itself is not a resource directory
        std::fs::write(root.join("generate.yaml"), "name: Root").unwrap();
        // other filenames are ignored
        std::fs::write(root.join("bucket/values.yaml"), "x: 1").unwrap();

        let found = discover(root, "generate.yaml").unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|p| p.ends_with("bucket/generate.yaml")));
        assert!(found.iter().any(|p| p.ends_with("aws/queue/generate.yaml")));
    }

    #[test]
    fn test_empty_root() {
        let dir = tempfile::tempdir().unwrap();
        let found = discover(dir.path(), "generate.yaml").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_results_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        for name in ["zeta", "alpha", "mid"] {
            std::fs::create_dir_all(root.join(name)).unwrap();
            std::fs::write(root.join(name).join("generate.yaml"), "").unwrap();
        }

        let found = discover(root, "generate.yaml").unwrap();
        let dirs: Vec<_> = found
            .iter()
            .map(|p| p.parent().unwrap().file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(dirs, vec!["alpha", "mid", "zeta"]);
    }
}
