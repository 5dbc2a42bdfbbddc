//! CLI `doctor` command: check the co-visitation index and print a health report.

use anyhow::{Context, Result};

use crate::cli::{format_bytes, modified_at};
use crate::config::MemdirConfig;
use crate::recall::{CoVisitGraph, IndexStore};

/// Invariant violations found in a parsed document.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GraphIssues {
    pub self_loops: usize,
    pub asymmetric: usize,
    pub zero_counts: usize,
}

impl GraphIssues {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

/// Count self-loops, one-sided or mismatched pairs, and zero counts.
pub fn check_graph(graph: &CoVisitGraph) -> GraphIssues {
    let mut issues = GraphIssues::default();
    for (a, neighbors) in graph {
        for (b, count) in neighbors {
            if a == b {
                issues.self_loops += 1;
                continue;
            }
            if *count == 0 {
                issues.zero_counts += 1;
            }
            let reverse = graph.get(b).and_then(|n| n.get(a));
            if reverse != Some(count) {
                issues.asymmetric += 1;
            }
        }
    }
    issues
}

/// Inspect the co-visitation document and print a health report.
pub fn doctor(config: &MemdirConfig) -> Result<()> {
    let root = config.resolved_memory_dir();
    let store = IndexStore::in_dir(&root, &config.storage.index_file);

    println!("memdir Health Report");
    println!("====================");
    println!();
    println!("Memory directory:  {}", root.display());
    println!("Index file:        {}", store.path().display());

    if !store.exists() {
        println!("Status:            not created yet (written on the first co-visit)");
        return Ok(());
    }

    let size = std::fs::metadata(store.path()).map(|m| m.len()).unwrap_or(0);
    println!("File size:         {}", format_bytes(size));
    if let Some(saved) = modified_at(store.path()) {
        println!("Last saved:        {saved}");
    }
    println!();

    let raw = std::fs::read(store.path())
        .with_context(|| format!("failed to read {}", store.path().display()))?;
    let graph = match serde_json::from_slice::<CoVisitGraph>(&raw) {
        Ok(graph) => graph,
        Err(e) => {
            println!("Parse check:       FAILED ({e})");
            println!();
            println!("The index will be reset to empty on next start; learned associations are lost.");
            println!("Run `memdir reset` to remove it now.");
            return Ok(());
        }
    };
    println!("Parse check:       PASSED ({} files)", graph.len());

    let issues = check_graph(&graph);
    if issues.is_clean() {
        println!("Invariants:        PASSED");
    } else {
        println!("Invariants:        REPAIRED ON LOAD");
        println!("  Self-loops:      {}", issues.self_loops);
        println!("  Asymmetric:      {}", issues.asymmetric);
        println!("  Zero counts:     {}", issues.zero_counts);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_graph_flags_violations() {
        let mut graph = CoVisitGraph::new();
        graph.entry("a.md".into()).or_default().insert("a.md".into(), 1);
        graph.entry("a.md".into()).or_default().insert("b.md".into(), 2);
        graph.entry("b.md".into()).or_default().insert("a.md".into(), 1);
        graph.entry("c.md".into()).or_default().insert("d.md".into(), 0);

        let issues = check_graph(&graph);
        assert_eq!(issues.self_loops, 1);
        assert_eq!(issues.asymmetric, 3);
        assert_eq!(issues.zero_counts, 1);
        assert!(!issues.is_clean());
    }

    #[test]
    fn check_graph_accepts_clean_graph() {
        let mut graph = CoVisitGraph::new();
        graph.entry("a.md".into()).or_default().insert("b.md".into(), 2);
        graph.entry("b.md".into()).or_default().insert("a.md".into(), 2);
        assert!(check_graph(&graph).is_clean());
    }
}
