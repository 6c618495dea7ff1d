//! Strength-weighted PageRank.
//!
//! # Overview
//!
//! PageRank favors contacts who hold strong ties to other well-connected
//! contacts. Each undirected relationship is followed in both directions;
//! a contact passes rank to a neighbor in proportion to the strength of
//! their tie relative to the contact's total strength.
//!
//! # Algorithm
//!
//! Power method:
//!
//! ```text
//! PR(v) = (1 - d) / N
//!       + d * Σ_u PR(u) * s(u, v) / S(u)        for each neighbor u
//!       + d * Σ_dangling PR(w) / N
//! ```
//!
//! where `d` is the damping factor (default 0.85), `s(u, v)` the tie
//! strength, and `S(u)` the total strength of `u`. Contacts with no ties
//! are dangling: their mass is spread uniformly so the ranks keep summing
//! to 1.
//!
//! Iteration stops when the L1 change drops below the tolerance or after
//! `max_iter` rounds. Hitting the cap is not an error; the result records
//! `converged = false`.

use kith_core::CancelFlag;
use kith_core::config::PageRankConfig;
use kith_core::error::EngineError;
use petgraph::visit::EdgeRef;
use tracing::{instrument, warn};

use crate::graph::ContactGraph;

use super::count_f64;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Result of a PageRank computation.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRankResult {
    /// PageRank scores in node order. Sums to 1 for non-empty graphs.
    pub scores: Vec<f64>,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the L1 delta fell below the tolerance within `max_iter`.
    pub converged: bool,
}

// ---------------------------------------------------------------------------
// Full PageRank
// ---------------------------------------------------------------------------

/// Compute weighted PageRank from uniform `1/N` initial ranks.
///
/// # Errors
///
/// Returns [`EngineError::Cancelled`] if `cancel` is raised; the flag is
/// checked once per iteration.
#[instrument(skip(cg, config, cancel), fields(nodes = cg.node_count()))]
pub fn pagerank(
    cg: &ContactGraph,
    config: &PageRankConfig,
    cancel: &CancelFlag,
) -> Result<PageRankResult, EngineError> {
    let n = cg.node_count();

    if n == 0 {
        return Ok(PageRankResult {
            scores: Vec::new(),
            iterations: 0,
            converged: true,
        });
    }

    let n_f64 = count_f64(n);
    let base = (1.0 - config.damping) / n_f64;

    // Total tie strength per contact; zero marks a dangling contact.
    let mut out_strength = vec![0.0_f64; n];
    for edge in cg.graph.edge_references() {
        out_strength[edge.source().index()] += *edge.weight();
        out_strength[edge.target().index()] += *edge.weight();
    }

    // Initialize ranks uniformly.
    let mut ranks = vec![1.0 / n_f64; n];
    let mut new_ranks = vec![0.0_f64; n];

    let mut iterations = 0;
    let mut converged = false;

    for _ in 0..config.max_iter {
        cancel.check()?;
        iterations += 1;

        let dangling_mass: f64 = ranks
            .iter()
            .zip(&out_strength)
            .filter(|&(_, &s)| s <= 0.0)
            .map(|(r, _)| r)
            .sum();
        let teleport = base + config.damping * dangling_mass / n_f64;

        // Reset new_ranks to the teleportation value.
        for r in &mut new_ranks {
            *r = teleport;
        }

        // Each tie carries rank both ways.
        for edge in cg.graph.edge_references() {
            let (a, b) = (edge.source().index(), edge.target().index());
            let w = *edge.weight();
            new_ranks[b] += config.damping * ranks[a] * w / out_strength[a];
            new_ranks[a] += config.damping * ranks[b] * w / out_strength[b];
        }

        // Check convergence: L1 norm of delta.
        let delta: f64 = ranks
            .iter()
            .zip(new_ranks.iter())
            .map(|(old, new)| (old - new).abs())
            .sum();

        std::mem::swap(&mut ranks, &mut new_ranks);

        if delta < config.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            iterations,
            tolerance = config.tolerance,
            "PageRank hit the iteration cap before converging"
        );
    }

    Ok(PageRankResult {
        scores: ranks,
        iterations,
        converged,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
