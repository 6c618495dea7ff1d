//! Graph construction from caller-supplied contacts and relationships.
//!
//! # Overview
//!
//! [`ContactGraph::build`] validates the input and produces an undirected
//! petgraph [`UnGraph`] whose node weights are contact ids and whose edge
//! weights are relationship strengths.
//!
//! ## Edge Direction
//!
//! A stored edge `A → B` records provenance ("A introduced B"), not graph
//! direction. Every algorithm in this crate treats it as `A — B`.
//!
//! ## Validation
//!
//! Checked in this order; the first failing check is reported with every
//! offending id in input order:
//!
//! 1. duplicate node ids
//! 2. edges whose endpoints are not supplied contacts
//! 3. self-loops
//! 4. strengths that are zero, negative, or non-finite
//!
//! ## Duplicate Edges
//!
//! Edges connecting the same unordered pair are merged into one: the
//! first edge keeps its id and kind, and takes the maximum strength,
//! confidence, and interaction counters of the group.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};

use kith_core::error::EngineError;
use kith_core::model::{ContactNode, RelationshipEdge};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// ContactGraph
// ---------------------------------------------------------------------------

/// A validated, undirected relationship graph for one analysis run.
///
/// Node `i` of [`ContactGraph::graph`] is `nodes()[i]`, and edge `j` is
/// `edges()[j]`; metric functions return score vectors in node order.
#[derive(Debug, Clone)]
pub struct ContactGraph {
    /// Undirected graph: node weight = contact id, edge weight = strength.
    pub graph: UnGraph<String, f64>,
    /// Mapping from contact id to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    nodes: Vec<ContactNode>,
    edges: Vec<RelationshipEdge>,
    content_hash: String,
}

impl ContactGraph {
    /// Validate `nodes`/`edges` and build the adjacency.
    ///
    /// Node order is preserved. Merged edges keep the position of the
    /// first edge in their group.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidGraph`] if any validation step fails.
    #[instrument(skip_all, fields(nodes = nodes.len(), edges = edges.len()))]
    pub fn build(
        nodes: Vec<ContactNode>,
        edges: Vec<RelationshipEdge>,
    ) -> Result<Self, EngineError> {
        let mut graph = UnGraph::<String, f64>::with_capacity(nodes.len(), edges.len());
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(nodes.len());

        let mut duplicates = Vec::new();
        for node in &nodes {
            if node_map.contains_key(&node.id) {
                duplicates.push(node.id.clone());
                continue;
            }
            let idx = graph.add_node(node.id.clone());
            node_map.insert(node.id.clone(), idx);
        }
        if !duplicates.is_empty() {
            return Err(EngineError::duplicate_node(duplicates));
        }

        validate_edges(&node_map, &edges)?;

        let raw_edge_count = edges.len();
        let merged = merge_duplicate_edges(edges);

        for edge in &merged {
            // Endpoints were validated above.
            let a = node_map[&edge.from];
            let b = node_map[&edge.to];
            graph.add_edge(a, b, edge.strength);
        }

        let content_hash = compute_content_hash(&nodes, &merged);

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            merged = raw_edge_count - merged.len(),
            "built contact graph"
        );

        Ok(Self {
            graph,
            node_map,
            nodes,
            edges: merged,
            content_hash,
        })
    }

    /// Rebuild this graph with `extra` edges appended.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidGraph`] if an extra edge is invalid.
    pub fn with_additional_edges(
        self,
        extra: Vec<RelationshipEdge>,
    ) -> Result<Self, EngineError> {
        if extra.is_empty() {
            return Ok(self);
        }
        let mut edges = self.edges;
        edges.extend(extra);
        Self::build(self.nodes, edges)
    }

    /// Return the number of contacts in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of (merged) relationships in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Contacts in input order.
    #[must_use]
    pub fn nodes(&self) -> &[ContactNode] {
        &self.nodes
    }

    /// Merged relationships, aligned with petgraph edge indices.
    #[must_use]
    pub fn edges(&self) -> &[RelationshipEdge] {
        &self.edges
    }

    /// BLAKE3 hash of node ids and the canonical edge set.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Look up the `NodeIndex` for a contact id.
    #[must_use]
    pub fn node_index(&self, contact_id: &str) -> Option<NodeIndex> {
        self.node_map.get(contact_id).copied()
    }

    /// Return the contact id label for a node.
    #[must_use]
    pub fn contact_id(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Neighbors of `contact_id` with the connecting strength.
    ///
    /// Isolated contacts yield an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NodeNotFound`] for an unknown id.
    pub fn neighbors(&self, contact_id: &str) -> Result<Vec<(String, f64)>, EngineError> {
        let idx = self
            .node_index(contact_id)
            .ok_or_else(|| EngineError::NodeNotFound(contact_id.to_string()))?;

        Ok(self
            .weighted_neighbors(idx)
            .map(|(other, strength)| (self.graph[other].clone(), strength))
            .collect())
    }

    /// Neighbor indices of `idx` with the connecting strength.
    pub(crate) fn weighted_neighbors(
        &self,
        idx: NodeIndex,
    ) -> impl Iterator<Item = (NodeIndex, f64)> + '_ {
        self.graph.edges(idx).map(move |edge| {
            let other = if edge.source() == idx {
                edge.target()
            } else {
                edge.source()
            };
            (other, *edge.weight())
        })
    }

    /// Largest edge strength, or `None` for an edgeless graph.
    #[must_use]
    pub fn max_strength(&self) -> Option<f64> {
        self.graph
            .edge_weights()
            .copied()
            .fold(None, |acc, s| Some(acc.map_or(s, |m: f64| m.max(s))))
    }

    /// Map a node-ordered score vector to contact ids.
    #[must_use]
    pub fn scores_by_id(&self, scores: &[f64]) -> HashMap<String, f64> {
        self.nodes
            .iter()
            .zip(scores)
            .map(|(node, &score)| (node.id.clone(), score))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn validate_edges(
    node_map: &HashMap<String, NodeIndex>,
    edges: &[RelationshipEdge],
) -> Result<(), EngineError> {
    let unknown = offending_ids(edges, |edge| {
        !node_map.contains_key(&edge.from) || !node_map.contains_key(&edge.to)
    });
    if !unknown.is_empty() {
        return Err(EngineError::unknown_endpoint(unknown));
    }

    let loops = offending_ids(edges, RelationshipEdge::is_self_loop);
    if !loops.is_empty() {
        return Err(EngineError::self_loop(loops));
    }

    let weak = offending_ids(edges, |edge| !(edge.strength.is_finite() && edge.strength > 0.0));
    if !weak.is_empty() {
        return Err(EngineError::non_positive_strength(weak));
    }

    Ok(())
}

fn offending_ids(
    edges: &[RelationshipEdge],
    pred: impl Fn(&RelationshipEdge) -> bool,
) -> Vec<String> {
    edges
        .iter()
        .filter(|edge| pred(edge))
        .map(|edge| edge.id.clone())
        .collect()
}

/// Collapse edges sharing an unordered endpoint pair.
fn merge_duplicate_edges(edges: Vec<RelationshipEdge>) -> Vec<RelationshipEdge> {
    let mut merged: Vec<RelationshipEdge> = Vec::with_capacity(edges.len());
    let mut by_pair: HashMap<(String, String), usize> = HashMap::with_capacity(edges.len());

    for edge in edges {
        let (a, b) = edge.unordered_pair();
        let key = (a.to_string(), b.to_string());
        if let Some(&slot) = by_pair.get(&key) {
            let kept = &mut merged[slot];
            kept.strength = kept.strength.max(edge.strength);
            kept.confidence = kept.confidence.max(edge.confidence);
            kept.counters = kept.counters.max(edge.counters);
        } else {
            by_pair.insert(key, merged.len());
            merged.push(edge);
        }
    }

    merged
}

/// BLAKE3 over sorted node ids and sorted canonical `(a, b, strength)`
/// triples, so input order does not change the hash.
fn compute_content_hash(nodes: &[ContactNode], edges: &[RelationshipEdge]) -> String {
    let mut ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    ids.sort_unstable();

    let mut pairs: Vec<(&str, &str, u64)> = edges
        .iter()
        .map(|edge| {
            let (a, b) = edge.unordered_pair();
            (a, b, edge.strength.to_bits())
        })
        .collect();
    pairs.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    for id in ids {
        hasher.update(id.as_bytes());
        hasher.update(b"\x00");
    }
    hasher.update(b"\x01");
    for (a, b, strength) in pairs {
        hasher.update(a.as_bytes());
        hasher.update(b"\x00");
        hasher.update(b.as_bytes());
        hasher.update(b"\x00");
        hasher.update(&strength.to_le_bytes());
    }
    format!("blake3:{}", hasher.finalize())
}

/// Ids of contacts with no relationship at all.
#[must_use]
pub fn isolated_contacts(graph: &ContactGraph) -> Vec<&str> {
    let connected: HashSet<NodeIndex> = graph
        .graph
        .edge_references()
        .flat_map(|edge| [edge.source(), edge.target()])
        .collect();

    graph
        .graph
        .node_indices()
        .filter(|idx| !connected.contains(idx))
        .filter_map(|idx| graph.contact_id(idx))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
