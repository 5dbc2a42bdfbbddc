//! Per-session access tracking.
//!
//! [`SessionTracker`] remembers which paths each session has touched so the
//! recorder can pair a new access with everything that came before it. Session
//! identity is an opaque token with no "ended" signal, so memory is bounded by a
//! volume-based sweep instead of a lifecycle hook.

use std::collections::HashMap;

/// Default number of accesses between cleanup sweeps.
pub const DEFAULT_CLEANUP_THRESHOLD: u64 = 100;

#[derive(Debug, Default)]
struct SessionRecord {
    /// Touched paths in first-touch order, without duplicates.
    paths: Vec<String>,
    /// Access-counter value at this session's most recent touch.
    last_access: u64,
}

/// Ephemeral map of session id -> touched paths. Never persisted.
#[derive(Debug)]
pub struct SessionTracker {
    sessions: HashMap<String, SessionRecord>,
    access_count: u64,
    cleanup_threshold: u64,
}

impl SessionTracker {
    /// Create a tracker that sweeps every `cleanup_threshold` accesses.
    /// A threshold of 0 disables the sweep.
    pub fn new(cleanup_threshold: u64) -> Self {
        Self {
            sessions: HashMap::new(),
            access_count: 0,
            cleanup_threshold,
        }
    }

    /// Paths this session has touched so far, in first-touch order. The recorder
    /// pairs a new access against this set before committing it with
    /// [`record`](Self::record).
    pub fn prior(&self, session_id: &str) -> Vec<String> {
        self.paths(session_id).to_vec()
    }

    /// Return the paths this session touched before `path`, then record `path`.
    ///
    /// If `path` was already touched in this session it is not added twice, and
    /// the returned prior set contains it.
    pub fn record_and_get_prior(&mut self, session_id: &str, path: &str) -> Vec<String> {
        let prior = self.prior(session_id);
        self.record(session_id, path);
        prior
    }

    /// Record that `session_id` touched `path` and advance the access counter.
    /// A path already in the session is not added twice. Every
    /// `cleanup_threshold` accesses, idle sessions are swept.
    pub fn record(&mut self, session_id: &str, path: &str) {
        self.access_count += 1;
        let now = self.access_count;

        let record = self.sessions.entry(session_id.to_string()).or_default();
        if !record.paths.iter().any(|p| p == path) {
            record.paths.push(path.to_string());
        }
        record.last_access = now;

        if self.cleanup_threshold > 0 && now % self.cleanup_threshold == 0 {
            self.sweep(now - self.cleanup_threshold);
        }
    }

    /// Drop every session whose last touch is at or before `boundary`.
    fn sweep(&mut self, boundary: u64) {
        let before = self.sessions.len();
        self.sessions.retain(|_, record| record.last_access > boundary);
        tracing::debug!(
            access_count = self.access_count,
            dropped = before - self.sessions.len(),
            kept = self.sessions.len(),
            "session cleanup"
        );
    }

    /// Paths touched so far in a session, in first-touch order.
    pub fn paths(&self, session_id: &str) -> &[String] {
        self.sessions
            .get(session_id)
            .map(|r| r.paths.as_slice())
            .unwrap_or(&[])
    }

    /// Number of sessions currently held in memory.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Total accesses recorded since process start.
    pub fn access_count(&self) -> u64 {
        self.access_count
    }
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_CLEANUP_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_access_has_no_prior() {
        let mut tracker = SessionTracker::default();
        assert!(tracker.record_and_get_prior("s1", "a.md").is_empty());
        assert_eq!(tracker.paths("s1"), ["a.md"]);
    }

    #[test]
    fn test_prior_is_insertion_ordered() {
        let mut tracker = SessionTracker::default();
        tracker.record_and_get_prior("s1", "b.md");
        tracker.record_and_get_prior("s1", "a.md");
        let prior = tracker.record_and_get_prior("s1", "c.md");
        assert_eq!(prior, vec!["b.md", "a.md"]);
    }

    #[test]
    fn test_repeat_access_is_not_duplicated() {
        let mut tracker = SessionTracker::default();
        tracker.record_and_get_prior("s1", "a.md");
        tracker.record_and_get_prior("s1", "b.md");
        let prior = tracker.record_and_get_prior("s1", "a.md");
        assert_eq!(prior, vec!["a.md", "b.md"]);
        assert_eq!(tracker.paths("s1"), ["a.md", "b.md"]);
        assert_eq!(tracker.access_count(), 3);
    }

    #[test]
    fn test_prior_does_not_record() {
        let mut tracker = SessionTracker::default();
        tracker.record_and_get_prior("s1", "a.md");
        assert_eq!(tracker.prior("s1"), vec!["a.md"]);
        assert!(tracker.prior("s2").is_empty());
        assert_eq!(tracker.session_count(), 1);
        assert_eq!(tracker.access_count(), 1);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut tracker = SessionTracker::default();
        tracker.record_and_get_prior("s1", "a.md");
        assert!(tracker.record_and_get_prior("s2", "b.md").is_empty());
        assert_eq!(tracker.session_count(), 2);
    }

    #[test]
    fn test_cleanup_drops_sessions_idle_since_last_boundary() {
        let mut tracker = SessionTracker::new(4);
        tracker.record("old", "a.md"); // 1
        tracker.record("busy", "a.md"); // 2
        tracker.record("busy", "b.md"); // 3
        tracker.record("busy", "c.md"); // 4: boundary, nothing idle yet
        assert_eq!(tracker.session_count(), 2);

        tracker.record("busy", "d.md"); // 5
        tracker.record("new", "a.md"); // 6
        tracker.record("busy", "e.md"); // 7
        tracker.record("new", "b.md"); // 8: boundary, "old" idle since 1
        assert_eq!(tracker.session_count(), 2);
        assert!(tracker.paths("old").is_empty());
        assert_eq!(tracker.paths("busy").len(), 5);
        assert_eq!(tracker.paths("new"), ["a.md", "b.md"]);
    }

    #[test]
    fn test_zero_threshold_never_cleans_up() {
        let mut tracker = SessionTracker::new(0);
        for i in 0..250 {
            tracker.record(&format!("s{i}"), "a.md");
        }
        assert_eq!(tracker.session_count(), 250);
        assert_eq!(tracker.access_count(), 250);
    }
}
