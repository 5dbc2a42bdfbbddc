//! Symmetric co-visitation graph.
//!
//! [`CoVisitationIndex`] counts, for every unordered pair of memory paths, how
//! many times the two were touched in the same session. Both directions of a
//! pair are stored so neighbor lookups are a single map access; every mutation
//! keeps `count(a, b) == count(b, a)` and never records `count(a, a)`.

use serde::Serialize;

use crate::recall::types::CoVisitGraph;

/// In-memory co-visitation graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoVisitationIndex {
    graph: CoVisitGraph,
}

/// Summary of the graph's shape.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct IndexStats {
    /// Paths with at least one neighbor.
    pub files: usize,
    /// Distinct unordered pairs.
    pub pairs: usize,
    /// Sum of all pair counts, each pair counted once.
    pub total_co_visits: u64,
    /// Strongest pairs, count descending then by path.
    pub strongest: Vec<PairCount>,
}

/// One unordered pair with `a < b`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PairCount {
    pub a: String,
    pub b: String,
    pub count: u64,
}

impl CoVisitationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from a loaded document.
    ///
    /// Self-loops and zero counts are dropped. Where the two directions of a
    /// pair disagree, both take the larger count.
    pub fn from_graph(graph: CoVisitGraph) -> Self {
        let mut index = Self::new();
        for (a, neighbors) in graph {
            for (b, count) in neighbors {
                if a == b || count == 0 {
                    continue;
                }
                let current = index.count(&a, &b);
                if count > current {
                    index.set_symmetric(&a, &b, count);
                }
            }
        }
        index
    }

    fn set_symmetric(&mut self, a: &str, b: &str, count: u64) {
        self.graph
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string(), count);
        self.graph
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string(), count);
    }

    /// Increment the pair `(a, b)` in both directions. Returns `false` (and does
    /// nothing) when `a == b`.
    pub fn record_pair(&mut self, a: &str, b: &str) -> bool {
        if a == b {
            return false;
        }
        *self
            .graph
            .entry(a.to_string())
            .or_default()
            .entry(b.to_string())
            .or_insert(0) += 1;
        *self
            .graph
            .entry(b.to_string())
            .or_default()
            .entry(a.to_string())
            .or_insert(0) += 1;
        true
    }

    /// Pair `new_path` with each path the session touched before it. Returns the
    /// number of pairs incremented.
    pub fn record_new_access<S: AsRef<str>>(&mut self, new_path: &str, prior: &[S]) -> usize {
        prior
            .iter()
            .filter(|p| self.record_pair(new_path, p.as_ref()))
            .count()
    }

    /// Undo a [`record_new_access`](Self::record_new_access) with the same
    /// arguments. Counts that drop to zero are removed, as are paths left
    /// without neighbors.
    pub fn retract_new_access<S: AsRef<str>>(&mut self, new_path: &str, prior: &[S]) {
        for p in prior {
            let p = p.as_ref();
            if p != new_path {
                self.decrement(new_path, p);
                self.decrement(p, new_path);
            }
        }
    }

    fn decrement(&mut self, a: &str, b: &str) {
        let Some(neighbors) = self.graph.get_mut(a) else {
            return;
        };
        if let Some(count) = neighbors.get_mut(b) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                neighbors.remove(b);
            }
        }
        if neighbors.is_empty() {
            self.graph.remove(a);
        }
    }

    /// Neighbors of `path`, strongest first, ties broken by path ascending,
    /// truncated to `limit`.
    pub fn get_related(&self, path: &str, limit: usize) -> Vec<(String, u64)> {
        let Some(neighbors) = self.graph.get(path) else {
            return Vec::new();
        };

        let mut related: Vec<(String, u64)> = neighbors
            .iter()
            .map(|(p, c)| (p.clone(), *c))
            .collect();
        related.sort_by(|(pa, ca), (pb, cb)| cb.cmp(ca).then_with(|| pa.cmp(pb)));
        related.truncate(limit);
        related
    }

    /// Co-visit count for a pair; 0 if never recorded.
    pub fn count(&self, a: &str, b: &str) -> u64 {
        self.graph
            .get(a)
            .and_then(|n| n.get(b))
            .copied()
            .unwrap_or(0)
    }

    /// Unsorted neighbor map of `path`.
    pub fn neighbors(&self, path: &str) -> Option<&std::collections::BTreeMap<String, u64>> {
        self.graph.get(path)
    }

    /// Number of paths with at least one neighbor.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Borrow the raw graph for persistence.
    pub fn graph(&self) -> &CoVisitGraph {
        &self.graph
    }

    /// Compute [`IndexStats`], listing at most `top` strongest pairs.
    pub fn stats(&self, top: usize) -> IndexStats {
        let mut pairs: Vec<PairCount> = self
            .graph
            .iter()
            .flat_map(|(a, neighbors)| {
                neighbors
                    .iter()
                    .filter(move |(b, _)| a < *b)
                    .map(move |(b, c)| PairCount {
                        a: a.clone(),
                        b: b.clone(),
                        count: *c,
                    })
            })
            .collect();

        let total_co_visits = pairs.iter().map(|p| p.count).sum();
        let pair_total = pairs.len();

        pairs.sort_by(|x, y| {
            y.count
                .cmp(&x.count)
                .then_with(|| x.a.cmp(&y.a))
                .then_with(|| x.b.cmp(&y.b))
        });
        pairs.truncate(top);

        IndexStats {
            files: self.graph.len(),
            pairs: pair_total,
            total_co_visits,
            strongest: pairs,
        }
    }
}
