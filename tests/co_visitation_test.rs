mod helpers;

use helpers::{test_recorder, test_recorder_with};
use memdir::recall::persistence::DEFAULT_INDEX_FILE;
use memdir::recall::{AccessKind, IndexStore, RecorderOptions};
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn view_view_create_counts_new_against_prior() {
    let tmp = TempDir::new().unwrap();
    let rec = test_recorder(tmp.path());

    rec.on_access(Some("s1"), "a.md", AccessKind::Read).unwrap();
    rec.on_access(Some("s1"), "b.md", AccessKind::Read).unwrap();
    rec.on_access(Some("s1"), "c.md", AccessKind::Write).unwrap();

    rec.with_index(|index| {
        assert_eq!(index.count("a.md", "b.md"), 1);
        assert_eq!(index.count("a.md", "c.md"), 1);
        assert_eq!(index.count("b.md", "c.md"), 1);
        assert_eq!(
            index.get_related("a.md", 2),
            vec![("b.md".to_string(), 1), ("c.md".to_string(), 1)]
        );
    })
    .unwrap();
}

#[test]
fn long_session_grows_linearly() {
    let tmp = TempDir::new().unwrap();
    let rec = test_recorder(tmp.path());

    for name in ["a.md", "b.md", "c.md", "d.md", "e.md"] {
        rec.on_access(Some("s1"), name, AccessKind::Read).unwrap();
    }

    // Each unordered pair is counted exactly once.
    let stats = rec.stats(0).unwrap();
    assert_eq!(stats.index.pairs, 10);
    assert_eq!(stats.index.total_co_visits, 10);
}

#[test]
fn two_sessions_accumulate() {
    let tmp = TempDir::new().unwrap();
    let rec = test_recorder(tmp.path());

    for session in ["s1", "s2"] {
        rec.on_access(Some(session), "a.md", AccessKind::Read).unwrap();
        rec.on_access(Some(session), "b.md", AccessKind::Read).unwrap();
    }

    assert_eq!(rec.with_index(|i| i.count("a.md", "b.md")).unwrap(), 2);
    assert_eq!(rec.with_index(|i| i.count("b.md", "a.md")).unwrap(), 2);
}

#[test]
fn interleaved_sessions_do_not_mix() {
    let tmp = TempDir::new().unwrap();
    let rec = test_recorder(tmp.path());

    rec.on_access(Some("s1"), "a.md", AccessKind::Read).unwrap();
    rec.on_access(Some("s2"), "x.md", AccessKind::Read).unwrap();
    rec.on_access(Some("s1"), "b.md", AccessKind::Read).unwrap();
    rec.on_access(Some("s2"), "y.md", AccessKind::Read).unwrap();

    rec.with_index(|i| {
        assert_eq!(i.count("a.md", "b.md"), 1);
        assert_eq!(i.count("x.md", "y.md"), 1);
        assert_eq!(i.count("a.md", "x.md"), 0);
        assert_eq!(i.count("b.md", "y.md"), 0);
    })
    .unwrap();
}

#[test]
fn revisiting_a_path_counts_again() {
    let tmp = TempDir::new().unwrap();
    let rec = test_recorder(tmp.path());

    for name in ["a.md", "b.md", "a.md"] {
        rec.on_access(Some("s1"), name, AccessKind::Read).unwrap();
    }

    assert_eq!(rec.with_index(|i| i.count("a.md", "b.md")).unwrap(), 2);
    let persisted = IndexStore::in_dir(tmp.path(), DEFAULT_INDEX_FILE)
        .load()
        .unwrap();
    assert_eq!(persisted["b.md"]["a.md"], 2);
}

#[test]
fn concurrent_sessions_are_serialized() {
    const SESSIONS: u64 = 16;

    let tmp = TempDir::new().unwrap();
    let rec = Arc::new(test_recorder(tmp.path()));

    let handles: Vec<_> = (0..SESSIONS)
        .map(|n| {
            let rec = Arc::clone(&rec);
            std::thread::spawn(move || {
                let session = format!("s{n}");
                rec.on_access(Some(&session), "a.md", AccessKind::Read)
                    .unwrap();
                rec.on_access(Some(&session), "b.md", AccessKind::Write)
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let graph = rec
        .with_index(|i| {
            assert_eq!(i.count("a.md", "b.md"), SESSIONS);
            assert_eq!(i.count("b.md", "a.md"), SESSIONS);
            i.graph().clone()
        })
        .unwrap();
    let persisted = IndexStore::in_dir(tmp.path(), DEFAULT_INDEX_FILE)
        .load()
        .unwrap();
    assert_eq!(persisted, graph);
    assert_eq!(rec.stats(0).unwrap().accesses, 2 * SESSIONS);
}

#[test]
fn read_returns_ranked_recommendations() {
    let tmp = TempDir::new().unwrap();
    let rec = test_recorder(tmp.path());

    for session in ["s1", "s2"] {
        rec.on_access(Some(session), "hub.md", AccessKind::Read).unwrap();
        rec.on_access(Some(session), "strong.md", AccessKind::Read).unwrap();
    }
    for (session, other) in [("s3", "weak-b.md"), ("s4", "weak-a.md"), ("s5", "weak-c.md")] {
        rec.on_access(Some(session), other, AccessKind::Write).unwrap();
        rec.on_access(Some(session), "hub.md", AccessKind::Write).unwrap();
    }

    let recs = rec
        .on_access(Some("reader"), "hub.md", AccessKind::Read)
        .unwrap()
        .unwrap();
    let got: Vec<(&str, u64)> = recs.iter().map(|r| (r.path.as_str(), r.count)).collect();
    assert_eq!(got, vec![("strong.md", 2), ("weak-a.md", 1), ("weak-b.md", 1)]);
}

#[test]
fn zero_max_recommendations_disables_them() {
    let tmp = TempDir::new().unwrap();
    let rec = test_recorder_with(
        tmp.path(),
        RecorderOptions {
            max_recommendations: 0,
            skip_missing: false,
            ..RecorderOptions::default()
        },
    );

    rec.on_access(Some("s1"), "a.md", AccessKind::Read).unwrap();
    let recs = rec.on_access(Some("s1"), "b.md", AccessKind::Read).unwrap();
    assert_eq!(recs, Some(Vec::new()));
    // Counting is unaffected.
    assert_eq!(rec.with_index(|i| i.count("a.md", "b.md")).unwrap(), 1);
}

#[test]
fn cleanup_drops_idle_sessions_but_keeps_counts() {
    let tmp = TempDir::new().unwrap();
    let rec = test_recorder_with(
        tmp.path(),
        RecorderOptions {
            cleanup_threshold: 100,
            skip_missing: false,
            ..RecorderOptions::default()
        },
    );

    rec.on_access(Some("idle"), "a.md", AccessKind::Read).unwrap();
    rec.on_access(Some("idle"), "b.md", AccessKind::Read).unwrap();
    let persisted_before = IndexStore::in_dir(tmp.path(), DEFAULT_INDEX_FILE)
        .load()
        .unwrap();

    // Accesses 3..=200 all come from one busy session, crossing the
    // boundaries at 100 and 200.
    for i in 0..198 {
        rec.on_access(Some("busy"), &format!("busy-{}.md", i % 2), AccessKind::Read)
            .unwrap();
    }

    let stats = rec.stats(0).unwrap();
    assert_eq!(stats.accesses, 200);
    assert_eq!(stats.active_sessions, 1);
    assert!(rec.session_paths("idle").unwrap().is_empty());
    assert_eq!(rec.session_paths("busy").unwrap().len(), 2);

    let persisted_after = IndexStore::in_dir(tmp.path(), DEFAULT_INDEX_FILE)
        .load()
        .unwrap();
    assert_eq!(persisted_after["a.md"], persisted_before["a.md"]);
    assert_eq!(persisted_after["b.md"]["a.md"], 1);
    // Alternating within one session pairs every access after the first.
    assert_eq!(persisted_after["busy-0.md"]["busy-1.md"], 197);
}

#[test]
fn session_cleared_by_cleanup_starts_fresh() {
    let tmp = TempDir::new().unwrap();
    let rec = test_recorder_with(
        tmp.path(),
        RecorderOptions {
            cleanup_threshold: 4,
            skip_missing: false,
            ..RecorderOptions::default()
        },
    );

    rec.on_access(Some("s1"), "a.md", AccessKind::Read).unwrap(); // 1
    for _ in 0..7 {
        rec.on_access(Some("other"), "x.md", AccessKind::Read).unwrap(); // 2..=8
    }
    // s1 was idle for a whole window and has been swept.
    assert!(rec.session_paths("s1").unwrap().is_empty());

    rec.on_access(Some("s1"), "b.md", AccessKind::Read).unwrap();
    assert_eq!(rec.with_index(|i| i.count("a.md", "b.md")).unwrap(), 0);
}
