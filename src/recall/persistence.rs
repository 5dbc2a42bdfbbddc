//! Durable storage for the co-visitation graph.
//!
//! The whole graph is one pretty-printed JSON document. Saves write a sibling
//! `.tmp` file and rename it over the target, so a reader sees either the old
//! document or the new one, never a partial write.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::recall::error::{RecallError, Result};
use crate::recall::types::CoVisitGraph;

/// Default file name of the co-visitation document under the memory root.
pub const DEFAULT_INDEX_FILE: &str = "_covis.json";

/// Loads and saves the co-visitation document at a fixed path.
#[derive(Debug, Clone)]
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<root>/<file_name>`.
    pub fn in_dir(root: impl AsRef<Path>, file_name: &str) -> Self {
        Self::new(root.as_ref().join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Read the document.
    ///
    /// A missing file yields an empty graph. Unparseable content is logged and
    /// also yields an empty graph; the next save overwrites it.
    pub fn load(&self) -> Result<CoVisitGraph> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no co-visitation index yet");
                return Ok(CoVisitGraph::new());
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "co-visitation index is not valid UTF-8, resetting"
                );
                return Ok(CoVisitGraph::new());
            }
            Err(e) => return Err(RecallError::storage(&self.path, e)),
        };

        match serde_json::from_str::<CoVisitGraph>(&contents) {
            Ok(graph) => {
                tracing::debug!(
                    path = %self.path.display(),
                    files = graph.len(),
                    "co-visitation index loaded"
                );
                Ok(graph)
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "corrupted co-visitation index, resetting"
                );
                Ok(CoVisitGraph::new())
            }
        }
    }

    /// Atomically replace the document with `graph`.
    pub fn save(&self, graph: &CoVisitGraph) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(graph)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RecallError::storage(parent, e))?;
        }

        let tmp_path = self.tmp_path();
        std::fs::write(&tmp_path, bytes).map_err(|e| RecallError::storage(&tmp_path, e))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp_path);
            RecallError::storage(&self.path, e)
        })?;

        tracing::trace!(path = %self.path.display(), files = graph.len(), "co-visitation index saved");
        Ok(())
    }

    /// Delete the document. Returns `false` if it did not exist.
    pub fn remove(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(RecallError::storage(&self.path, e)),
        }
    }
}
