//! Closeness centrality: proximity to everyone reachable.
//!
//! # Definition
//!
//! Wasserman-Faust style, restricted to the reachable set:
//!
//! ```text
//! C(v) = (r - 1) / Σ d(v, u)      over reachable u ≠ v
//! ```
//!
//! where `r` counts reachable contacts including `v` itself and `d` is the
//! weighted shortest-path distance from [`super::paths`]. Unreachable
//! contacts are left out of the sum. A contact that reaches no one scores
//! 0.0. Because every hop has length at least 1, `C(v)` lies in `[0, 1]`.
//!
//! # Complexity
//!
//! One Dijkstra per contact: O(N · E log N).

use kith_core::CancelFlag;
use kith_core::error::EngineError;
use tracing::instrument;

use crate::graph::ContactGraph;

use super::paths::{length_scale, single_source};
use super::{count_f64, map_over_sources};

/// Compute closeness centrality in node order.
///
/// # Errors
///
/// Returns [`EngineError::Cancelled`] if `cancel` is raised.
#[instrument(skip(cg, cancel), fields(nodes = cg.node_count()))]
pub fn closeness_centrality(
    cg: &ContactGraph,
    parallel: bool,
    cancel: &CancelFlag,
) -> Result<Vec<f64>, EngineError> {
    let scale = length_scale(cg);

    map_over_sources(cg.node_count(), parallel, cancel, |source| {
        let sp = single_source(cg, source, scale);
        let reachable = sp.order.len();
        if reachable <= 1 {
            return 0.0;
        }
        let total: f64 = sp.order.iter().map(|&v| sp.dist[v]).sum();
        (count_f64(reachable - 1) / total).clamp(0.0, 1.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kith_core::model::{ContactNode, RelationshipEdge};

    fn build(ids: &[&str], edges: &[(&str, &str, f64)]) -> ContactGraph {
        let nodes = ids.iter().map(|id| ContactNode::new(*id, *id)).collect();
        let edges = edges
            .iter()
            .enumerate()
            .map(|(i, (a, b, s))| RelationshipEdge::new(format!("e{i}"), *a, *b, *s))
            .collect();
        ContactGraph::build(nodes, edges).expect("build graph")
    }

    fn closeness(cg: &ContactGraph) -> Vec<f64> {
        closeness_centrality(cg, false, &CancelFlag::new()).expect("closeness")
    }

    #[test]
    fn isolated_nodes_score_zero() {
        assert_eq!(closeness(&build(&["a", "b"], &[])), vec![0.0, 0.0]);
    }

    #[test]
    fn path_of_three() {
        let cc = closeness(&build(&["a", "b", "c"], &[("a", "b", 1.0), ("b", "c", 1.0)]));
        // a: 2 / (1 + 2); b: 2 / (1 + 1)
        assert!((cc[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((cc[1] - 1.0).abs() < 1e-12);
        assert!((cc[2] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn unreachable_component_is_ignored() {
        // a-b pair plus an isolated c: both a and b reach one node at distance 1.
        let cc = closeness(&build(&["a", "b", "c"], &[("a", "b", 1.0)]));
        assert!((cc[0] - 1.0).abs() < 1e-12);
        assert!((cc[1] - 1.0).abs() < 1e-12);
        assert_eq!(cc[2], 0.0);
    }

    #[test]
    fn stronger_ties_are_closer() {
        // b-c strong, a-b weak: c is closer to b than a is.
        let cg = build(&["a", "b", "c"], &[("a", "b", 1.0), ("b", "c", 4.0)]);
        let cc = closeness(&cg);
        assert!(cc[2] > cc[0], "c {} should beat a {}", cc[2], cc[0]);
        assert!(cc.iter().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn cancelled_flag_aborts() {
        let cancel = CancelFlag::new();
        cancel.cancel();
        let cg = build(&["a", "b"], &[("a", "b", 1.0)]);
        assert_eq!(
            closeness_centrality(&cg, false, &cancel),
            Err(EngineError::Cancelled)
        );
    }
}
