use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Whether two paths name the same file, resolving symlinks for paths
/// that exist.
pub fn same_file(a: &Path, b: &Path) -> Result<bool> {
    let a_norm = normalize_for_compare(a)
        .with_context(|| format!("failed to normalize path {}", a.display()))?;
    let b_norm = normalize_for_compare(b)
        .with_context(|| format!("failed to normalize path {}", b.display()))?;
    Ok(a_norm == b_norm)
}

/// Refuse a write target that resolves to the same file as `protected`.
pub fn ensure_distinct(target: &Path, protected: &Path) -> Result<()> {
    if same_file(target, protected)? {
        bail!(
            "refusing to overwrite {}: it is the same file as {}",
            target.display(),
            protected.display()
        );
    }
    Ok(())
}

fn normalize_for_compare(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    // Not on disk yet: join with cwd. `..` segments are left as they are.
    let base = if path.is_absolute() {
        PathBuf::new()
    } else {
        std::env::current_dir().context("current_dir")?
    };
    Ok(base.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn same_file_is_refused() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.swift");
        std::fs::write(&file, "").unwrap();
        let err = ensure_distinct(&dir.path().join("./A.swift"), &file).unwrap_err();
        assert!(err.to_string().contains("refusing to overwrite"));
    }

    #[test]
    fn different_files_pass() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.swift");
        std::fs::write(&file, "").unwrap();
        assert!(ensure_distinct(&dir.path().join("A.swift.backup"), &file).is_ok());
    }
}
