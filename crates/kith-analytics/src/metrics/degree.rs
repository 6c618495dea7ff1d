//! Degree centrality.
//!
//! `degree(v) = |neighbors(v)| / (N - 1)`, 0.0 when `N <= 1`.
//!
//! Unweighted on purpose: it measures reach (how many people), not
//! intensity. Strength feeds closeness, betweenness, and PageRank instead.

use crate::graph::ContactGraph;

use super::count_f64;

/// Compute normalized degree centrality in node order.
#[must_use]
pub fn degree_centrality(cg: &ContactGraph) -> Vec<f64> {
    let n = cg.node_count();
    if n <= 1 {
        return vec![0.0; n];
    }

    let denom = count_f64(n - 1);
    neighbor_counts(cg)
        .into_iter()
        .map(|count| count_f64(count) / denom)
        .collect()
}

/// Raw neighbor counts in node order.
#[must_use]
pub fn neighbor_counts(cg: &ContactGraph) -> Vec<usize> {
    cg.graph
        .node_indices()
        .map(|idx| cg.graph.neighbors(idx).count())
        .collect()
}
