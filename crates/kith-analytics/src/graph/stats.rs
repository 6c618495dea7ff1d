//! Basic statistics for the contact graph.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: contacts and merged relationships.
//! - **density**: `2E / (N(N - 1))` for an undirected graph; 0.0 for
//!   graphs with fewer than 2 nodes.
//! - **component_count**: connected components. A value greater than 1
//!   means the network splits into groups that never meet.
//! - **isolated_node_count**: contacts with no relationships.
//! - **max_degree**: most relationships held by a single contact.
//! - **mean_strength**: average relationship strength (0.0 if no edges).

use petgraph::algo::connected_components;
use serde::{Deserialize, Serialize};

use super::build::ContactGraph;
use crate::metrics::count_f64;
use crate::metrics::degree::neighbor_counts;

/// Summary statistics for a contact graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub component_count: usize,
    pub isolated_node_count: usize,
    pub max_degree: usize,
    pub mean_strength: f64,
}

impl GraphStats {
    /// Compute statistics from a [`ContactGraph`].
    #[must_use]
    pub fn from_graph(cg: &ContactGraph) -> Self {
        let node_count = cg.node_count();
        let edge_count = cg.edge_count();

        let degrees = neighbor_counts(cg);

        let isolated_node_count = degrees.iter().filter(|&&d| d == 0).count();
        let max_degree = degrees.iter().copied().max().unwrap_or(0);

        let mean_strength = if edge_count == 0 {
            0.0
        } else {
            cg.graph.edge_weights().sum::<f64>() / count_f64(edge_count)
        };

        Self {
            node_count,
            edge_count,
            density: undirected_density(node_count, edge_count),
            component_count: connected_components(&cg.graph),
            isolated_node_count,
            max_degree,
            mean_strength,
        }
    }
}

/// `2E / (N(N - 1))`, or 0.0 when `N < 2`.
#[must_use]
pub fn undirected_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0;
    }
    let n = count_f64(node_count);
    2.0 * count_f64(edge_count) / (n * (n - 1.0))
}
