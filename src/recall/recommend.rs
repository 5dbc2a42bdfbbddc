//! Recommendation retrieval and rendering.
//!
//! Recommendations name related items and how often they were co-visited.
//! They never carry file content, so the agent still has to open an item
//! explicitly and that open keeps feeding the graph.

use crate::recall::index::CoVisitationIndex;
use crate::recall::types::Recommendation;

/// Default number of recommendations attached to a read.
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 3;

/// Top `limit` neighbors of `path`. A limit of 0 disables recommendations.
pub fn recommend(index: &CoVisitationIndex, path: &str, limit: usize) -> Vec<Recommendation> {
    index
        .get_related(path, limit)
        .into_iter()
        .map(|(path, count)| Recommendation { path, count })
        .collect()
}

/// Like [`recommend`], but neighbors rejected by `keep` are skipped before the
/// limit is applied.
pub fn recommend_where<F>(
    index: &CoVisitationIndex,
    path: &str,
    limit: usize,
    mut keep: F,
) -> Vec<Recommendation>
where
    F: FnMut(&str) -> bool,
{
    if limit == 0 {
        return Vec::new();
    }
    index
        .get_related(path, usize::MAX)
        .into_iter()
        .filter(|(p, _)| keep(p))
        .take(limit)
        .map(|(path, count)| Recommendation { path, count })
        .collect()
}

/// Render the "related files" section appended to a view response.
/// Returns an empty string when there is nothing to show.
pub fn format_related(recommendations: &[Recommendation]) -> String {
    if recommendations.is_empty() {
        return String::new();
    }

    let mut out = String::from("RELATED FILES (associative memory)\n");
    for (i, rec) in recommendations.iter().enumerate() {
        out.push_str(&format!(
            "  [{}] {} (co-visited {}x)\n",
            i + 1,
            rec.path,
            rec.count
        ));
    }
    out
}
