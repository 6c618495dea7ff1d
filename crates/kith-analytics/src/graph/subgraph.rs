//! Focus subgraph extraction.
//!
//! # Overview
//!
//! Visualizations center on one contact and show its neighborhood up to a
//! fixed number of hops. [`extract`] runs a bounded breadth-first search
//! from the focus and returns the **induced** subgraph: every relationship
//! whose endpoints were both selected, including cross-links between
//! contacts discovered at the same depth that the BFS never traversed.
//!
//! ```text
//!        A ─── B            extract(B, 1) selects {A, B, C}
//!         \   /             and keeps A─C even though the BFS
//!           C ─── D         only walked B─A and B─C.
//! ```

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use kith_core::error::EngineError;
use kith_core::model::{ContactNode, RelationshipEdge};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::build::ContactGraph;

/// A contact selected by [`extract`], with its hop distance from the focus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphNode {
    #[serde(flatten)]
    pub contact: ContactNode,
    pub hops: usize,
}

/// The neighborhood of a focus contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subgraph {
    pub focus: String,
    pub depth: usize,
    /// Selected contacts in graph (input) order.
    pub nodes: Vec<SubgraphNode>,
    /// Every relationship among the selected contacts, in graph order.
    pub edges: Vec<RelationshipEdge>,
}

impl Subgraph {
    #[must_use]
    pub fn contains(&self, contact_id: &str) -> bool {
        self.nodes.iter().any(|n| n.contact.id == contact_id)
    }

    /// Selected contact ids in graph order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.contact.id.as_str()).collect()
    }

    /// Selected relationship ids in graph order.
    #[must_use]
    pub fn edge_ids(&self) -> Vec<&str> {
        self.edges.iter().map(|e| e.id.as_str()).collect()
    }
}

/// Extract the contacts within `depth` hops of `focus` and every edge
/// among them.
///
/// Depth 0 returns the focus alone with no edges.
///
/// # Errors
///
/// Returns [`EngineError::NodeNotFound`] if `focus` is not in the graph.
#[instrument(skip(cg))]
pub fn extract(cg: &ContactGraph, focus: &str, depth: usize) -> Result<Subgraph, EngineError> {
    let start = cg
        .node_index(focus)
        .ok_or_else(|| EngineError::NodeNotFound(focus.to_string()))?;

    let n = cg.node_count();
    let mut selected = FixedBitSet::with_capacity(n);
    let mut hops: Vec<Option<usize>> = vec![None; n];
    let mut queue = VecDeque::new();

    selected.insert(start.index());
    hops[start.index()] = Some(0);
    queue.push_back((start, 0_usize));

    while let Some((v, d)) = queue.pop_front() {
        if d == depth {
            continue;
        }
        for w in cg.graph.neighbors(v) {
            if !selected.put(w.index()) {
                hops[w.index()] = Some(d + 1);
                queue.push_back((w, d + 1));
            }
        }
    }

    let nodes: Vec<SubgraphNode> = cg
        .nodes()
        .iter()
        .zip(&hops)
        .filter_map(|(contact, hop)| {
            hop.map(|hops| SubgraphNode {
                contact: contact.clone(),
                hops,
            })
        })
        .collect();

    let edges: Vec<RelationshipEdge> = cg
        .graph
        .edge_references()
        .filter(|e| selected.contains(e.source().index()) && selected.contains(e.target().index()))
        .map(|e| cg.edges()[e.id().index()].clone())
        .collect();

    debug!(
        selected = nodes.len(),
        edges = edges.len(),
        "extracted focus subgraph"
    );

    Ok(Subgraph {
        focus: focus.to_string(),
        depth,
        nodes,
        edges,
    })
}
