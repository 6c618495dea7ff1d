//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a contact lies on shortest
//! paths between other pairs of contacts. High-betweenness contacts are
//! brokers: removing them would push two groups much further apart.
//!
//! # Algorithm
//!
//! Brandes (2001), weighted variant:
//!
//! 1. For each source `s`, run Dijkstra to get shortest-path counts,
//!    distances, and predecessor lists ([`super::paths::single_source`]).
//! 2. Accumulate dependency scores in reverse settle order (farthest
//!    contacts first).
//! 3. Sum the dependency scores across all sources.
//!
//! Complexity: O(N · E log N).
//!
//! # Output
//!
//! Scores in node order, normalized by `(N-1)(N-2)`. Each unordered pair
//! is counted once from each endpoint, so a contact on every shortest path
//! between every other pair scores exactly 1.0. Graphs with `N <= 2` score
//! 0.0 everywhere.

use kith_core::CancelFlag;
use kith_core::error::EngineError;
use tracing::instrument;

use crate::graph::ContactGraph;

use super::paths::{length_scale, single_source};
use super::{accumulate_over_sources, count_f64};

/// Compute normalized betweenness centrality for all contacts.
///
/// # Errors
///
/// Returns [`EngineError::Cancelled`] if `cancel` is raised.
#[instrument(skip(cg, cancel), fields(nodes = cg.node_count()))]
pub fn betweenness_centrality(
    cg: &ContactGraph,
    parallel: bool,
    cancel: &CancelFlag,
) -> Result<Vec<f64>, EngineError> {
    let n = cg.node_count();
    if n <= 2 {
        cancel.check()?;
        return Ok(vec![0.0; n]);
    }

    let raw = raw_betweenness(cg, parallel, cancel)?;
    let denom = count_f64(n - 1) * count_f64(n - 2);

    Ok(raw
        .into_iter()
        .map(|score| (score / denom).clamp(0.0, 1.0))
        .collect())
}

/// Unnormalized betweenness: the sum over ordered source/target pairs of
/// the fraction of shortest paths through each contact.
///
/// # Errors
///
/// Returns [`EngineError::Cancelled`] if `cancel` is raised.
pub fn raw_betweenness(
    cg: &ContactGraph,
    parallel: bool,
    cancel: &CancelFlag,
) -> Result<Vec<f64>, EngineError> {
    let n = cg.node_count();
    let scale = length_scale(cg);

    accumulate_over_sources(n, parallel, cancel, |s, cb| {
        let sp = single_source(cg, s, scale);

        // Accumulate dependencies in reverse settle order.
        let mut delta: Vec<f64> = vec![0.0; n];

        for &w in sp.order.iter().rev() {
            for &v in &sp.preds[w] {
                if sp.sigma[w] > 0.0 {
                    delta[v] += (sp.sigma[v] / sp.sigma[w]) * (1.0 + delta[w]);
                }
            }

            if w != s {
                cb[w] += delta[w];
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
