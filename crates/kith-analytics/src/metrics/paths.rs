//! Weighted single-source shortest paths with path counting.
//!
//! Shared by closeness and betweenness. Edge length is
//! `max_strength / strength`: stronger ties are shorter, and the shortest
//! possible hop has length 1, so every distance between distinct contacts
//! is at least 1. With uniform strengths this reduces to hop count.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use petgraph::graph::NodeIndex;

use crate::graph::ContactGraph;

/// Relative tolerance for treating two path lengths as equal.
const TIE_TOLERANCE: f64 = 1e-9;

/// Shortest-path DAG from one source.
#[derive(Debug)]
pub(crate) struct ShortestPaths {
    /// Settled nodes in non-decreasing distance order (source first).
    pub order: Vec<usize>,
    /// Distance from the source; `f64::INFINITY` if unreachable.
    pub dist: Vec<f64>,
    /// Number of shortest paths from the source.
    pub sigma: Vec<f64>,
    /// Predecessors of each node on shortest paths.
    pub preds: Vec<Vec<usize>>,
}

/// Edge length scale for `cg`: its maximum strength, or 1.0 if edgeless.
pub(crate) fn length_scale(cg: &ContactGraph) -> f64 {
    cg.max_strength().unwrap_or(1.0)
}

/// Dijkstra from `source` with shortest-path counting (Brandes 2001,
/// weighted variant).
pub(crate) fn single_source(cg: &ContactGraph, source: usize, scale: f64) -> ShortestPaths {
    let n = cg.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut sigma = vec![0.0_f64; n];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut settled = vec![false; n];
    let mut order = Vec::with_capacity(n);

    dist[source] = 0.0;
    sigma[source] = 1.0;

    let mut heap = BinaryHeap::new();
    heap.push(Candidate {
        dist: 0.0,
        node: source,
    });

    while let Some(Candidate { dist: d, node: v }) = heap.pop() {
        if settled[v] {
            continue;
        }
        settled[v] = true;
        order.push(v);

        for (w, strength) in cg.weighted_neighbors(NodeIndex::new(v)) {
            let wi = w.index();
            if settled[wi] {
                continue;
            }
            let alt = d + scale / strength;
            let current = dist[wi];
            let tolerance = TIE_TOLERANCE * current.max(1.0);

            if current.is_infinite() || alt < current - tolerance {
                dist[wi] = alt;
                sigma[wi] = sigma[v];
                preds[wi].clear();
                preds[wi].push(v);
                heap.push(Candidate { dist: alt, node: wi });
            } else if (alt - current).abs() <= tolerance {
                sigma[wi] += sigma[v];
                preds[wi].push(v);
            }
        }
    }

    ShortestPaths {
        order,
        dist,
        sigma,
        preds,
    }
}

/// Min-heap entry; ties on distance pop the lower node index first.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    dist: f64,
    node: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}
