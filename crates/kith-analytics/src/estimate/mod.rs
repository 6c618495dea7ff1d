//! Relationship strength estimation for contacts with no recorded tie.
//!
//! # Overview
//!
//! Contact books rarely record every relationship. Before analysis, the
//! engine can score every unordered pair of contacts that lacks an
//! explicit edge and materialize the likely ones, so centrality is not
//! computed over an artificially sparse graph.
//!
//! # Scoring
//!
//! Additive, on a roughly 0–100 scale (constants from [`EstimatorConfig`]):
//!
//! | Signal | Default |
//! |---|---|
//! | same company | +30 |
//! | one introduced the other | +40 |
//! | both introduced by the same contact | +15 |
//! | each shared tag (capped at +20) | +5 |
//! | both high importance / both at least medium | +10 / +5 |
//!
//! Every signal is symmetric, so `estimate(a, b) == estimate(b, a)`.
//!
//! # Scalability
//!
//! [`infer_edges`] visits all `n(n-1)/2` pairs. That is a known ceiling,
//! not a bug: above [`EstimatorConfig::max_nodes`] contacts the pass is
//! skipped with a warning and callers are expected to batch.

use std::collections::{BTreeSet, HashSet};

use kith_core::config::EstimatorConfig;
use kith_core::model::{
    ContactNode, INFERRED_CONFIDENCE, Importance, InteractionCounters, RelationshipEdge,
    RelationshipKind,
};
use rayon::prelude::*;
use tracing::{debug, instrument, warn};

/// Upper bound of the score scale.
pub const MAX_SCORE: f64 = 100.0;

/// Divisor mapping a 0–100 score to an edge strength (0–10).
pub const SCORE_TO_STRENGTH: f64 = 10.0;

/// Score the likelihood/strength of a relationship between `a` and `b`.
#[must_use]
pub fn estimate(a: &ContactNode, b: &ContactNode, config: &EstimatorConfig) -> f64 {
    score_prepared(&Prepared::new(a), &Prepared::new(b), config)
}

/// An edge is materialized only when `score` strictly exceeds `threshold`.
#[must_use]
pub fn should_create_edge(score: f64, threshold: f64) -> bool {
    score > threshold
}

/// Generate edges for every unordered pair without an explicit edge whose
/// score passes the threshold.
///
/// Output order follows node input order: pairs `(i, j)` with `i < j`,
/// row by row. Generated edges are `business` ties with
/// [`INFERRED_CONFIDENCE`], `strength = score / 10` and zeroed counters.
/// `from`/`to` are the pair's ids in sorted order and the edge id is
/// `inferred:<from>:<to>` with `\` and `:` escaped inside each id, so
/// distinct pairs never share an id. An id already taken by an explicit
/// edge gets a `#<n>` suffix.
#[instrument(skip_all, fields(nodes = nodes.len(), explicit = explicit.len()))]
pub fn infer_edges(
    nodes: &[ContactNode],
    explicit: &[RelationshipEdge],
    config: &EstimatorConfig,
    parallel: bool,
) -> Vec<RelationshipEdge> {
    if nodes.len() > config.max_nodes {
        warn!(
            nodes = nodes.len(),
            max_nodes = config.max_nodes,
            "skipping relationship inference: contact set exceeds max_nodes"
        );
        return Vec::new();
    }

    let known: HashSet<(&str, &str)> = explicit.iter().map(RelationshipEdge::unordered_pair).collect();
    let prepared: Vec<Prepared<'_>> = nodes.iter().map(Prepared::new).collect();

    let row = |i: usize| -> Vec<RelationshipEdge> {
        let a = &prepared[i];
        prepared[i + 1..]
            .iter()
            .filter(|b| !known.contains(&canonical(a.id, b.id)))
            .filter_map(|b| {
                let score = score_prepared(a, b, config);
                should_create_edge(score, config.threshold).then(|| inferred_edge(a.id, b.id, score))
            })
            .collect()
    };

    let rows: Vec<Vec<RelationshipEdge>> = if parallel {
        (0..prepared.len()).into_par_iter().map(row).collect()
    } else {
        (0..prepared.len()).map(row).collect()
    };

    let mut edges: Vec<RelationshipEdge> = rows.into_iter().flatten().collect();
    rename_taken_ids(&mut edges, explicit);
    debug!(inferred = edges.len(), "relationship inference complete");
    edges
}

fn inferred_edge(a: &str, b: &str, score: f64) -> RelationshipEdge {
    let (from, to) = canonical(a, b);
    RelationshipEdge {
        id: inferred_edge_id(from, to),
        from: from.to_string(),
        to: to.to_string(),
        kind: RelationshipKind::Business,
        strength: score / SCORE_TO_STRENGTH,
        confidence: INFERRED_CONFIDENCE,
        counters: InteractionCounters::default(),
    }
}

/// `inferred:<from>:<to>` with each id escaped.
#[must_use]
pub fn inferred_edge_id(from: &str, to: &str) -> String {
    format!("inferred:{}:{}", escape_id(from), escape_id(to))
}

fn escape_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for ch in id.chars() {
        if matches!(ch, '\\' | ':') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn rename_taken_ids(inferred: &mut [RelationshipEdge], explicit: &[RelationshipEdge]) {
    let explicit_ids: HashSet<&str> = explicit.iter().map(|e| e.id.as_str()).collect();
    if !inferred.iter().any(|e| explicit_ids.contains(e.id.as_str())) {
        return;
    }

    let mut taken: HashSet<String> = explicit_ids.iter().map(|id| (*id).to_string()).collect();
    taken.extend(inferred.iter().map(|e| e.id.clone()));
    for edge in inferred.iter_mut() {
        if !explicit_ids.contains(edge.id.as_str()) {
            continue;
        }
        let renamed = (1_u64..)
            .map(|n| format!("{}#{n}", edge.id))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_default();
        warn!(id = %edge.id, renamed = %renamed, "inferred edge id already used by an explicit edge");
        taken.insert(renamed.clone());
        edge.id = renamed;
    }
}

fn canonical<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Attributes normalized once per contact for the pair pass.
struct Prepared<'a> {
    id: &'a str,
    company: Option<String>,
    introduced_by: Option<&'a str>,
    tags: BTreeSet<String>,
    importance: Option<Importance>,
}

impl<'a> Prepared<'a> {
    fn new(node: &'a ContactNode) -> Self {
        let attrs = &node.attributes;
        Self {
            id: &node.id,
            company: attrs
                .company
                .as_deref()
                .map(|c| c.trim().to_lowercase())
                .filter(|c| !c.is_empty()),
            introduced_by: attrs.introduced_by.as_deref().filter(|i| !i.is_empty()),
            tags: attrs
                .tags
                .iter()
                .map(|t| t.trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            importance: attrs.importance,
        }
    }
}

fn score_prepared(a: &Prepared<'_>, b: &Prepared<'_>, config: &EstimatorConfig) -> f64 {
    let mut score = 0.0;

    if a.company.is_some() && a.company == b.company {
        score += config.company_weight;
    }

    let introduced_each_other = a.introduced_by == Some(b.id) || b.introduced_by == Some(a.id);
    if introduced_each_other {
        score += config.introduction_weight;
    } else if a.introduced_by.is_some() && a.introduced_by == b.introduced_by {
        score += config.shared_introducer_weight;
    }

    #[allow(clippy::cast_precision_loss)]
    let shared_tags = a.tags.intersection(&b.tags).count() as f64;
    score += (shared_tags * config.tag_weight).min(config.max_tag_bonus);

    match (a.importance, b.importance) {
        (Some(Importance::High), Some(Importance::High)) => score += config.importance_weight,
        (Some(x), Some(y)) if x >= Importance::Medium && y >= Importance::Medium => {
            score += config.importance_weight / 2.0;
        }
        _ => {}
    }

    score.clamp(0.0, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EstimatorConfig {
        EstimatorConfig::default()
    }

    #[test]
    fn strangers_score_zero() {
        let a = ContactNode::new("a", "A");
        let b = ContactNode::new("b", "B");
        assert_eq!(estimate(&a, &b, &config()), 0.0);
    }

    #[test]
    fn company_match_is_case_insensitive() {
        let a = ContactNode::new("a", "A").with_company("Acme ");
        let b = ContactNode::new("b", "B").with_company("acme");
        assert!((estimate(&a, &b, &config()) - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn blank_company_does_not_match() {
        let a = ContactNode::new("a", "A").with_company("  ");
        let b = ContactNode::new("b", "B").with_company("");
        assert_eq!(estimate(&a, &b, &config()), 0.0);
    }

    #[test]
    fn introduction_counts_in_either_direction() {
        let a = ContactNode::new("a", "A");
        let b = ContactNode::new("b", "B").introduced_by("a");
        assert!((estimate(&a, &b, &config()) - 40.0).abs() < f64::EPSILON);
        assert!((estimate(&b, &a, &config()) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn shared_introducer_scores_less_than_direct_introduction() {
        let a = ContactNode::new("a", "A").introduced_by("z");
        let b = ContactNode::new("b", "B").introduced_by("z");
        assert!((estimate(&a, &b, &config()) - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn tag_bonus_is_capped() {
        let tags = ["a", "b", "c", "d", "e", "f"];
        let a = ContactNode::new("a", "A").with_tags(tags);
        let b = ContactNode::new("b", "B").with_tags(tags.map(str::to_uppercase));
        assert!((estimate(&a, &b, &config()) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn importance_levels() {
        let high = |id: &str| ContactNode::new(id, id).with_importance(Importance::High);
        let medium = |id: &str| ContactNode::new(id, id).with_importance(Importance::Medium);
        let low = |id: &str| ContactNode::new(id, id).with_importance(Importance::Low);

        assert!((estimate(&high("a"), &high("b"), &config()) - 10.0).abs() < f64::EPSILON);
        assert!((estimate(&high("a"), &medium("b"), &config()) - 5.0).abs() < f64::EPSILON);
        assert_eq!(estimate(&high("a"), &low("b"), &config()), 0.0);
    }

    #[test]
    fn score_is_clamped_to_scale() {
        let cfg = EstimatorConfig {
            company_weight: 90.0,
            ..config()
        };
        let a = ContactNode::new("a", "A").with_company("x");
        let b = ContactNode::new("b", "B").with_company("x").introduced_by("a");
        assert!((estimate(&a, &b, &cfg) - MAX_SCORE).abs() < f64::EPSILON);
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!should_create_edge(20.0, 20.0));
        assert!(should_create_edge(20.5, 20.0));
    }

    #[test]
    fn infer_edges_skips_explicit_pairs() {
        let nodes = vec![
            ContactNode::new("a", "A").with_company("acme"),
            ContactNode::new("b", "B").with_company("acme"),
            ContactNode::new("c", "C").with_company("acme"),
        ];
        let explicit = vec![RelationshipEdge::new("e1", "b", "a", 2.0)];

        let inferred = infer_edges(&nodes, &explicit, &config(), false);
        let ids: Vec<&str> = inferred.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["inferred:a:c", "inferred:b:c"]);

        let first = &inferred[0];
        assert_eq!(first.kind, RelationshipKind::Business);
        assert!((first.strength - 3.0).abs() < f64::EPSILON);
        assert!((first.confidence - INFERRED_CONFIDENCE).abs() < f64::EPSILON);
        assert_eq!(first.counters, InteractionCounters::default());
    }

    #[test]
    fn inferred_ids_are_sorted_and_unambiguous() {
        let nodes: Vec<ContactNode> = ["a:b", "c", "a", "b:c"]
            .iter()
            .map(|id| ContactNode::new(*id, "x").with_company("acme"))
            .collect();

        let inferred = infer_edges(&nodes, &[], &config(), false);
        assert_eq!(inferred.len(), 6);

        let ids: HashSet<&str> = inferred.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 6, "ids must be unique: {ids:?}");
        assert!(ids.contains(r"inferred:a\:b:c"));
        assert!(ids.contains(r"inferred:a:b\:c"));
        assert!(ids.contains("inferred:a:c"));

        for edge in &inferred {
            assert!(edge.from < edge.to, "{} -> {} not sorted", edge.from, edge.to);
            assert_eq!(edge.id, inferred_edge_id(&edge.from, &edge.to));
        }
    }

    #[test]
    fn inferred_id_clashing_with_explicit_edge_is_renamed() {
        let nodes = vec![
            ContactNode::new("a", "A").with_company("acme"),
            ContactNode::new("b", "B"),
            ContactNode::new("c", "C").with_company("acme"),
        ];
        let explicit = vec![
            RelationshipEdge::new("inferred:a:c", "a", "b", 1.0),
            RelationshipEdge::new("inferred:a:c#1", "b", "c", 1.0),
        ];

        let inferred = infer_edges(&nodes, &explicit, &config(), false);
        assert_eq!(inferred.len(), 1);
        assert_eq!(inferred[0].id, "inferred:a:c#2");
        assert_eq!((inferred[0].from.as_str(), inferred[0].to.as_str()), ("a", "c"));
    }

    #[test]
    fn infer_edges_respects_max_nodes() {
        let nodes: Vec<ContactNode> = (0..4)
            .map(|i| ContactNode::new(format!("n{i}"), "x").with_company("acme"))
            .collect();
        let cfg = EstimatorConfig {
            max_nodes: 3,
            ..config()
        };
        assert!(infer_edges(&nodes, &[], &cfg, false).is_empty());
    }

    #[test]
    fn parallel_inference_matches_sequential() {
        let nodes: Vec<ContactNode> = (0..40)
            .map(|i| {
                ContactNode::new(format!("n{i}"), "x")
                    .with_company(if i % 3 == 0 { "acme" } else { "globex" })
                    .with_tags([format!("t{}", i % 4), "common".to_string()])
            })
            .collect();
        let cfg = config();
        assert_eq!(
            infer_edges(&nodes, &[], &cfg, true),
            infer_edges(&nodes, &[], &cfg, false)
        );
    }
}
