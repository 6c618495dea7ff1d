//! The end-to-end analysis pipeline.
//!
//! # Overview
//!
//! [`Engine::analyze`] takes one snapshot of contacts and relationships and
//! returns an [`AnalysisReport`] holding fresh metrics for every contact.
//! Nothing is cached between calls; callers persist the report themselves
//! and may use [`AnalysisReport::content_hash`] to skip unchanged snapshots.
//!
//! ```text
//! config.validate()            fail fast on bad weights / pagerank params
//!        ↓
//! ContactGraph::build()        explicit edges only; InvalidGraph stops here
//!        ↓
//! estimate::infer_edges()      when inference mode and density allow it
//!        ↓
//! degree / closeness / betweenness / pagerank
//!        ↓
//! score::aggregate_all()       min-max normalize, weighted network value
//!        ↓
//! AnalysisReport
//! ```

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use kith_core::CancelFlag;
use kith_core::config::{EngineConfig, InferenceMode};
use kith_core::error::EngineError;
use kith_core::model::{ContactNode, NodeMetrics, RelationshipEdge};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::estimate::{estimate, infer_edges};
use crate::graph::stats::undirected_density;
use crate::graph::{ContactGraph, GraphStats, Subgraph, extract};
use crate::metrics::betweenness::betweenness_centrality;
use crate::metrics::closeness::closeness_centrality;
use crate::metrics::degree::degree_centrality;
use crate::metrics::pagerank::pagerank;
use crate::score::{MetricInputs, aggregate_all};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// A contact together with the metrics computed for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedNode {
    #[serde(flatten)]
    pub contact: ContactNode,
    pub metrics: NodeMetrics,
}

/// Result of one [`Engine::analyze`] run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub analyzed_at: DateTime<Utc>,
    /// Hash of the analyzed graph, inferred edges included.
    pub content_hash: String,
    pub stats: GraphStats,
    /// Contacts in input order.
    pub nodes: Vec<AnalyzedNode>,
    /// Merged explicit edges followed by inferred edges.
    pub edges: Vec<RelationshipEdge>,
    pub page_rank_iterations: usize,
    pub page_rank_converged: bool,
    pub inferred_edge_count: usize,
}

impl AnalysisReport {
    #[must_use]
    pub fn metrics_for(&self, contact_id: &str) -> Option<&NodeMetrics> {
        self.nodes
            .iter()
            .find(|n| n.contact.id == contact_id)
            .map(|n| &n.metrics)
    }

    /// Contacts by descending network value; ties break on id.
    #[must_use]
    pub fn ranked(&self) -> Vec<&AnalyzedNode> {
        let mut ranked: Vec<&AnalyzedNode> = self.nodes.iter().collect();
        ranked.sort_by(|a, b| {
            b.metrics
                .network_value
                .total_cmp(&a.metrics.network_value)
                .then_with(|| a.contact.id.cmp(&b.contact.id))
        });
        ranked
    }

    /// Narrow this report to the neighborhood of `focus`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NodeNotFound`] if `focus` is not in the report.
    pub fn focus(&self, focus: &str, depth: usize) -> Result<FocusedReport, EngineError> {
        extract_report(self, focus, depth)
    }
}

/// A focus-subgraph contact with its hop distance and metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusedNode {
    #[serde(flatten)]
    pub contact: ContactNode,
    pub hops: usize,
    pub metrics: NodeMetrics,
}

/// The part of an [`AnalysisReport`] within `depth` hops of `focus`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusedReport {
    pub focus: String,
    pub depth: usize,
    pub nodes: Vec<FocusedNode>,
    pub edges: Vec<RelationshipEdge>,
}

/// Extract the focus subgraph of an analyzed snapshot, keeping the metrics
/// already computed for each selected contact.
///
/// # Errors
///
/// Returns [`EngineError::NodeNotFound`] for an unknown focus.
pub fn extract_report(
    report: &AnalysisReport,
    focus: &str,
    depth: usize,
) -> Result<FocusedReport, EngineError> {
    let contacts = report.nodes.iter().map(|n| n.contact.clone()).collect();
    let cg = ContactGraph::build(contacts, report.edges.clone())?;
    let sub = extract(&cg, focus, depth)?;

    let metrics: HashMap<&str, NodeMetrics> = report
        .nodes
        .iter()
        .map(|n| (n.contact.id.as_str(), n.metrics))
        .collect();

    let nodes = sub
        .nodes
        .into_iter()
        .filter_map(|node| {
            let m = metrics.get(node.contact.id.as_str()).copied()?;
            Some(FocusedNode {
                contact: node.contact,
                hops: node.hops,
                metrics: m,
            })
        })
        .collect();

    Ok(FocusedReport {
        focus: sub.focus,
        depth: sub.depth,
        nodes,
        edges: sub.edges,
    })
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Stateless analysis entry point. Cheap to construct; holds only config.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a snapshot, stamping metrics with the current time.
    ///
    /// # Errors
    ///
    /// See [`Engine::analyze_at`].
    pub fn analyze(
        &self,
        nodes: Vec<ContactNode>,
        edges: Vec<RelationshipEdge>,
    ) -> Result<AnalysisReport, EngineError> {
        self.analyze_at(nodes, edges, Utc::now(), &CancelFlag::new())
    }

    /// Analyze a snapshot with an explicit timestamp and cancel flag.
    ///
    /// Identical inputs (including order) and `now` produce identical
    /// reports.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidWeights`] / [`EngineError::InvalidConfig`]
    ///   before any graph work.
    /// - [`EngineError::InvalidGraph`] for bad explicit input.
    /// - [`EngineError::Cancelled`] if `cancel` is raised mid-run.
    #[instrument(skip_all, fields(nodes = nodes.len(), edges = edges.len()))]
    pub fn analyze_at(
        &self,
        nodes: Vec<ContactNode>,
        edges: Vec<RelationshipEdge>,
        now: DateTime<Utc>,
        cancel: &CancelFlag,
    ) -> Result<AnalysisReport, EngineError> {
        let config = &self.config;
        config.validate()?;

        let started = Instant::now();
        let mut cg = ContactGraph::build(nodes, edges)?;

        let mut inferred_edge_count = 0;
        if self.should_infer(&cg) {
            cancel.check()?;
            let phase = Instant::now();
            let inferred = infer_edges(cg.nodes(), cg.edges(), &config.estimator, config.parallel);
            inferred_edge_count = inferred.len();
            cg = cg.with_additional_edges(inferred)?;
            debug!(
                inferred = inferred_edge_count,
                elapsed_ms = phase.elapsed().as_millis(),
                "inference phase"
            );
        }

        cancel.check()?;
        let phase = Instant::now();
        let degree = degree_centrality(&cg);
        let closeness = closeness_centrality(&cg, config.parallel, cancel)?;
        let betweenness = betweenness_centrality(&cg, config.parallel, cancel)?;
        let pr = pagerank(&cg, &config.pagerank, cancel)?;
        debug!(
            pagerank_iterations = pr.iterations,
            elapsed_ms = phase.elapsed().as_millis(),
            "centrality phase"
        );

        let inputs: Vec<MetricInputs> = (0..cg.node_count())
            .map(|i| MetricInputs {
                degree: degree[i],
                betweenness: betweenness[i],
                closeness: closeness[i],
                page_rank: pr.scores[i],
            })
            .collect();
        let values = aggregate_all(&inputs, &config.weights)?;

        let analyzed: Vec<AnalyzedNode> = cg
            .nodes()
            .iter()
            .zip(inputs.iter().zip(&values))
            .map(|(contact, (m, &network_value))| AnalyzedNode {
                contact: contact.clone(),
                metrics: NodeMetrics {
                    degree: m.degree,
                    betweenness: m.betweenness,
                    closeness: m.closeness,
                    page_rank: m.page_rank,
                    network_value,
                    last_analyzed_at: now,
                },
            })
            .collect();

        let stats = GraphStats::from_graph(&cg);
        info!(
            nodes = stats.node_count,
            edges = stats.edge_count,
            inferred = inferred_edge_count,
            elapsed_ms = started.elapsed().as_millis(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            analyzed_at: now,
            content_hash: cg.content_hash().to_string(),
            stats,
            nodes: analyzed,
            edges: cg.edges().to_vec(),
            page_rank_iterations: pr.iterations,
            page_rank_converged: pr.converged,
            inferred_edge_count,
        })
    }

    /// Score a single pair with this engine's estimator settings.
    #[must_use]
    pub fn estimate(&self, a: &ContactNode, b: &ContactNode) -> f64 {
        estimate(a, b, &self.config.estimator)
    }

    /// Build `nodes`/`edges` and extract the focus subgraph without
    /// computing metrics.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidGraph`] for bad input,
    /// [`EngineError::NodeNotFound`] for an unknown focus.
    pub fn extract(
        &self,
        nodes: Vec<ContactNode>,
        edges: Vec<RelationshipEdge>,
        focus: &str,
        depth: usize,
    ) -> Result<Subgraph, EngineError> {
        let cg = ContactGraph::build(nodes, edges)?;
        extract(&cg, focus, depth)
    }

    fn should_infer(&self, cg: &ContactGraph) -> bool {
        let inference = &self.config.inference;
        match inference.mode {
            InferenceMode::Never => false,
            InferenceMode::Always => true,
            InferenceMode::Sparse => {
                let density = undirected_density(cg.node_count(), cg.edge_count());
                debug!(density, threshold = inference.sparse_density, "explicit edge density");
                density < inference.sparse_density
            }
        }
    }
}
