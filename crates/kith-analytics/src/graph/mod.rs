//! Contact graph model.
//!
//! # Overview
//!
//! Callers hand the engine a flat list of contacts and relationships. This
//! module validates them and builds an undirected, strength-weighted
//! petgraph adjacency that every metric runs over.
//!
//! ## Pipeline
//!
//! ```text
//! Vec<ContactNode> + Vec<RelationshipEdge>
//!        ↓  build::ContactGraph::build()
//! ContactGraph (validated, duplicates merged, UnGraph<String, f64>)
//!        ├─ stats::GraphStats::from_graph()   density, components, …
//!        └─ subgraph::extract()               bounded focus neighborhood
//! ```
//!
//! ## Cache Invalidation
//!
//! [`ContactGraph::content_hash`] is a BLAKE3 hash of the node ids and the
//! canonical edge set. Callers compare it against the hash stored with
//! their last metrics snapshot to skip recomputation.

pub mod build;
pub mod stats;
pub mod subgraph;

pub use build::ContactGraph;
pub use stats::GraphStats;
pub use subgraph::{Subgraph, SubgraphNode, extract};
