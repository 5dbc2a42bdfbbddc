//! Path validation for the memory root.
//!
//! Incoming paths are normalized lexically against the root (`.` dropped, `..`
//! popped) and rejected if they climb above it or are absolute. When the target
//! already exists its canonical form must also stay under the canonical root,
//! which catches symlinks pointing outside.

use anyhow::{bail, Context, Result};
use std::path::{Component, Path, PathBuf};

/// The sandbox every file operation resolves paths against.
#[derive(Debug, Clone)]
pub struct PathGuard {
    root: PathBuf,
}

/// A validated path under the memory root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardedPath {
    abs: PathBuf,
    rel: String,
}

impl GuardedPath {
    /// Absolute location on disk.
    pub fn abs(&self) -> &Path {
        &self.abs
    }

    /// Root-relative, `/`-separated form; empty for the root itself.
    pub fn rel(&self) -> &str {
        &self.rel
    }

    pub fn is_root(&self) -> bool {
        self.rel.is_empty()
    }

    /// Internal entries (`_covis.json`, dotfiles) are hidden from the file tools.
    pub fn is_internal(&self) -> bool {
        self.rel
            .rsplit('/')
            .next()
            .is_some_and(is_internal_name)
    }

    /// Display form used in tool responses.
    pub fn display(&self) -> &str {
        if self.rel.is_empty() {
            "."
        } else {
            &self.rel
        }
    }
}

/// Names starting with `_` or `.` are reserved for internal files.
pub fn is_internal_name(name: &str) -> bool {
    name.starts_with('_') || name.starts_with('.')
}

impl PathGuard {
    /// Guard for `root`, creating the directory if needed.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)
            .with_context(|| format!("failed to create memory directory {}", root.display()))?;
        Self::open(root)
    }

    /// Guard for an existing `root`. Fails if the directory is missing.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = root
            .canonicalize()
            .with_context(|| format!("failed to resolve memory directory {}", root.display()))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate `raw` against the root. `None`, empty and whitespace-only input
    /// resolve to the root.
    pub fn validate(&self, raw: Option<&str>) -> Result<GuardedPath> {
        let raw = raw.map(str::trim).unwrap_or("");
        let mut parts: Vec<String> = Vec::new();

        for component in Path::new(raw).components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir => {
                    if parts.pop().is_none() {
                        bail!("Invalid path: path traversal not allowed");
                    }
                }
                Component::RootDir | Component::Prefix(_) => {
                    bail!("Invalid path: path traversal not allowed");
                }
            }
        }

        let abs = parts.iter().fold(self.root.clone(), |acc, p| acc.join(p));

        if abs.exists() {
            let resolved = abs
                .canonicalize()
                .with_context(|| format!("failed to resolve {raw}"))?;
            if !resolved.starts_with(&self.root) {
                bail!("Invalid path: path traversal not allowed");
            }
        }

        Ok(GuardedPath {
            abs,
            rel: parts.join("/"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_path_is_root() {
        let tmp = TempDir::new().unwrap();
        let guard = PathGuard::new(tmp.path()).unwrap();
        for raw in [None, Some(""), Some("   "), Some("."), Some("./")] {
            let p = guard.validate(raw).unwrap();
            assert!(p.is_root(), "raw: {raw:?}");
            assert_eq!(p.display(), ".");
        }
    }

    #[test]
    fn test_open_does_not_create_root() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("memories");
        assert!(PathGuard::open(&missing).is_err());
        assert!(!missing.exists());

        PathGuard::new(&missing).unwrap();
        assert!(PathGuard::open(&missing).is_ok());
    }

    #[test]
    fn test_normalizes_relative_paths() {
        let tmp = TempDir::new().unwrap();
        let guard = PathGuard::new(tmp.path()).unwrap();
        let p = guard.validate(Some("projects/./alpha/../beta/notes.md")).unwrap();
        assert_eq!(p.rel(), "projects/beta/notes.md");
        assert_eq!(p.abs(), guard.root().join("projects/beta/notes.md"));
    }

    #[test]
    fn test_rejects_traversal() {
        let tmp = TempDir::new().unwrap();
        let guard = PathGuard::new(tmp.path()).unwrap();
        for raw in ["../escape.md", "a/../../escape.md", "/etc/passwd"] {
            let err = guard.validate(Some(raw)).unwrap_err();
            assert!(err.to_string().contains("path traversal"), "raw: {raw}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_rejects_symlink_escape() {
        let outside = TempDir::new().unwrap();
        let tmp = TempDir::new().unwrap();
        let guard = PathGuard::new(tmp.path()).unwrap();
        std::os::unix::fs::symlink(outside.path(), guard.root().join("link")).unwrap();
        assert!(guard.validate(Some("link")).is_err());
    }

    #[test]
    fn test_internal_names() {
        let tmp = TempDir::new().unwrap();
        let guard = PathGuard::new(tmp.path()).unwrap();
        assert!(guard.validate(Some("_covis.json")).unwrap().is_internal());
        assert!(guard.validate(Some("notes/.hidden")).unwrap().is_internal());
        assert!(!guard.validate(Some("_dir/notes.md")).unwrap().is_internal());
        assert!(!guard.validate(None).unwrap().is_internal());
    }
}
