//! Access orchestration: session tracking, pair counting, write-through
//! persistence and recommendation retrieval behind one lock.
//!
//! Every file operation that touches a memory item calls
//! [`MemoryAccessRecorder::on_access`] after its own I/O. The recorder pairs the
//! item with everything the session touched before it, saves the graph, and for
//! reads returns the item's strongest associations.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::RecallConfig;
use crate::recall::error::{RecallError, Result};
use crate::recall::index::{CoVisitationIndex, IndexStats};
use crate::recall::persistence::IndexStore;
use crate::recall::recommend::{self, DEFAULT_MAX_RECOMMENDATIONS};
use crate::recall::session::{SessionTracker, DEFAULT_CLEANUP_THRESHOLD};
use crate::recall::types::{AccessKind, Recommendation};

/// Tuning knobs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct RecorderOptions {
    /// Recommendations returned per read; 0 disables them.
    pub max_recommendations: usize,
    /// Accesses between session cleanup sweeps; 0 disables cleanup.
    pub cleanup_threshold: u64,
    /// Skip recommending paths the session has already touched.
    pub exclude_session_paths: bool,
    /// Skip recommending paths that no longer exist under the memory root.
    pub skip_missing: bool,
}

impl Default for RecorderOptions {
    fn default() -> Self {
        Self {
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
            cleanup_threshold: DEFAULT_CLEANUP_THRESHOLD,
            exclude_session_paths: false,
            skip_missing: true,
        }
    }
}

impl From<&RecallConfig> for RecorderOptions {
    fn from(config: &RecallConfig) -> Self {
        Self {
            max_recommendations: config.max_recommendations,
            cleanup_threshold: config.session_cleanup_threshold,
            exclude_session_paths: config.exclude_session_paths,
            skip_missing: config.skip_missing,
        }
    }
}

/// Live view of the recall layer for `memory_stats` and the CLI.
#[derive(Debug, Serialize)]
pub struct RecallStats {
    #[serde(flatten)]
    pub index: IndexStats,
    /// Sessions currently held in memory.
    pub active_sessions: usize,
    /// Accesses recorded since process start.
    pub accesses: u64,
    /// Location of the co-visitation document.
    pub index_path: PathBuf,
}

#[derive(Debug)]
struct RecorderState {
    sessions: SessionTracker,
    /// `None` until the first call loads the document.
    index: Option<CoVisitationIndex>,
}

/// Owns all associative-recall state for one memory root.
#[derive(Debug)]
pub struct MemoryAccessRecorder {
    root: PathBuf,
    store: IndexStore,
    options: RecorderOptions,
    state: Mutex<RecorderState>,
}

impl MemoryAccessRecorder {
    /// Recorder for `root`, persisting to `store`. Nothing is read from disk
    /// until the first access.
    pub fn new(root: impl Into<PathBuf>, store: IndexStore, options: RecorderOptions) -> Self {
        let sessions = SessionTracker::new(options.cleanup_threshold);
        Self {
            root: root.into(),
            store,
            options,
            state: Mutex::new(RecorderState {
                sessions,
                index: None,
            }),
        }
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, RecorderState>> {
        self.state.lock().map_err(|_| RecallError::LockPoisoned)
    }

    /// Load the document on first use. A failed load leaves the slot empty so
    /// the next call retries.
    fn loaded<'a>(
        store: &IndexStore,
        slot: &'a mut Option<CoVisitationIndex>,
    ) -> Result<&'a mut CoVisitationIndex> {
        let index = match slot.take() {
            Some(index) => index,
            None => {
                let index = CoVisitationIndex::from_graph(store.load()?);
                tracing::info!(
                    path = %store.path().display(),
                    files = index.len(),
                    "co-visitation index ready"
                );
                index
            }
        };
        Ok(slot.insert(index))
    }

    /// Record that `session_id` touched `path`.
    ///
    /// Returns `Ok(None)` for writes and for calls without a session identity.
    /// Reads return the path's recommendations. If saving the graph fails the
    /// increments are rolled back and the session does not record `path`, so the
    /// access leaves no trace.
    pub fn on_access(
        &self,
        session_id: Option<&str>,
        path: &str,
        kind: AccessKind,
    ) -> Result<Option<Vec<Recommendation>>> {
        let Some(session_id) = session_id.filter(|s| !s.is_empty()) else {
            tracing::debug!(path, "access without session identity, not tracked");
            return Ok(None);
        };

        let mut guard = self.lock()?;
        let RecorderState { sessions, index } = &mut *guard;
        let index = Self::loaded(&self.store, index)?;

        let prior = sessions.prior(session_id);
        let pairs = if prior.is_empty() {
            0
        } else {
            index.record_new_access(path, &prior)
        };

        if pairs > 0 {
            if let Err(e) = self.store.save(index.graph()) {
                index.retract_new_access(path, &prior);
                return Err(e);
            }
        }
        sessions.record(session_id, path);

        tracing::debug!(
            session = session_id,
            path,
            kind = %kind,
            prior = prior.len(),
            pairs,
            "access recorded"
        );

        match kind {
            AccessKind::Write => Ok(None),
            AccessKind::Read => Ok(Some(self.recommend_for(
                index,
                path,
                sessions.paths(session_id),
            ))),
        }
    }

    /// [`on_access`](Self::on_access) with the kind given as text. Unknown kinds
    /// are ignored.
    pub fn on_access_named(
        &self,
        session_id: Option<&str>,
        path: &str,
        kind: &str,
    ) -> Result<Option<Vec<Recommendation>>> {
        match kind.parse::<AccessKind>() {
            Ok(kind) => self.on_access(session_id, path, kind),
            Err(e) => {
                tracing::debug!(path, error = %e, "access not tracked");
                Ok(None)
            }
        }
    }

    fn recommend_for(
        &self,
        index: &CoVisitationIndex,
        path: &str,
        session_paths: &[String],
    ) -> Vec<Recommendation> {
        let limit = self.options.max_recommendations;
        if !self.options.exclude_session_paths && !self.options.skip_missing {
            return recommend::recommend(index, path, limit);
        }
        recommend::recommend_where(index, path, limit, |candidate| {
            if self.options.exclude_session_paths && session_paths.iter().any(|p| p == candidate)
            {
                return false;
            }
            !self.options.skip_missing || self.exists(candidate)
        })
    }

    fn exists(&self, rel: &str) -> bool {
        self.root.join(Path::new(rel)).is_file()
    }

    /// Associations of `path` without recording an access.
    pub fn related(&self, path: &str, limit: usize) -> Result<Vec<Recommendation>> {
        let mut guard = self.lock()?;
        let index = Self::loaded(&self.store, &mut guard.index)?;
        if !self.options.skip_missing {
            return Ok(recommend::recommend(index, path, limit));
        }
        Ok(recommend::recommend_where(index, path, limit, |candidate| {
            self.exists(candidate)
        }))
    }

    /// Run `f` against the current graph.
    pub fn with_index<R>(&self, f: impl FnOnce(&CoVisitationIndex) -> R) -> Result<R> {
        let mut guard = self.lock()?;
        let index = Self::loaded(&self.store, &mut guard.index)?;
        Ok(f(index))
    }

    /// Paths a session has touched, in first-touch order.
    pub fn session_paths(&self, session_id: &str) -> Result<Vec<String>> {
        Ok(self.lock()?.sessions.paths(session_id).to_vec())
    }

    /// Graph shape plus live session counters, listing the `top` strongest pairs.
    pub fn stats(&self, top: usize) -> Result<RecallStats> {
        let mut guard = self.lock()?;
        let RecorderState { sessions, index } = &mut *guard;
        let index = Self::loaded(&self.store, index)?;
        Ok(RecallStats {
            index: index.stats(top),
            active_sessions: sessions.session_count(),
            accesses: sessions.access_count(),
            index_path: self.store.path().to_path_buf(),
        })
    }
}
