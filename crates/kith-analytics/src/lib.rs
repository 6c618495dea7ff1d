#![forbid(unsafe_code)]
//! kith-analytics: relationship-network analytics for a contact book.
//!
//! Given contacts and the relationships between them, this crate infers
//! likely missing ties, scores every contact on four centrality measures,
//! combines them into a single network value, and extracts focus
//! neighborhoods for visualization.
//!
//! # Conventions
//!
//! - **Errors**: every fallible operation returns
//!   [`kith_core::EngineError`]; there are no partial results.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Determinism**: scores come back in node input order and do not
//!   depend on whether rayon parallelism is enabled.

pub mod engine;
pub mod estimate;
pub mod graph;
pub mod metrics;
pub mod score;

pub use engine::{AnalysisReport, AnalyzedNode, Engine, FocusedNode, FocusedReport, extract_report};
pub use graph::{ContactGraph, GraphStats, Subgraph, SubgraphNode, extract};
