//! Focus subgraph extraction over whole graphs and analyzed reports.

mod support;

use kith_analytics::{ContactGraph, Engine, extract};
use kith_core::EngineError;
use kith_core::config::{EngineConfig, InferenceMode};
use support::snapshot;

fn path_abcd() -> ContactGraph {
    let (nodes, edges) = snapshot(&["A", "B", "C", "D"], &[("A", "B"), ("B", "C"), ("C", "D")]);
    ContactGraph::build(nodes, edges).expect("build graph")
}

/// Five contacts: a square A-B-C-D-A with a tail D-E.
fn square_with_tail() -> ContactGraph {
    let (nodes, edges) = snapshot(
        &["A", "B", "C", "D", "E"],
        &[("A", "B"), ("B", "C"), ("C", "D"), ("D", "A"), ("D", "E")],
    );
    ContactGraph::build(nodes, edges).expect("build graph")
}

#[test]
fn path_focus_one_hop() {
    let sub = extract(&path_abcd(), "B", 1).expect("extract");
    assert_eq!(sub.node_ids(), vec!["A", "B", "C"]);
    assert_eq!(sub.edge_ids(), vec!["A-B", "B-C"]);
    assert!(!sub.contains("D"));
}

#[test]
fn depth_zero_returns_focus_without_edges() {
    let sub = extract(&square_with_tail(), "C", 0).expect("extract");
    assert_eq!(sub.node_ids(), vec!["C"]);
    assert!(sub.edges.is_empty());
}

#[test]
fn depth_covering_the_graph_returns_everything() {
    let cg = square_with_tail();
    let sub = extract(&cg, "B", 10).expect("extract");

    assert_eq!(sub.node_ids(), vec!["A", "B", "C", "D", "E"]);
    assert_eq!(sub.edges.len(), cg.edge_count());
    let hops: Vec<usize> = sub.nodes.iter().map(|n| n.hops).collect();
    assert_eq!(hops, vec![1, 0, 1, 2, 3]);
}

#[test]
fn edges_to_unselected_contacts_are_dropped() {
    // From E at depth 2: D at 1, A and C at 2. B is out, so A-B and B-C go.
    let sub = extract(&square_with_tail(), "E", 2).expect("extract");
    assert_eq!(sub.node_ids(), vec!["A", "C", "D", "E"]);
    assert_eq!(sub.edge_ids(), vec!["C-D", "D-A", "D-E"]);
}

#[test]
fn cross_link_at_the_frontier_is_kept() {
    // B and C are both one hop from A and tied to each other.
    let (nodes, edges) = snapshot(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("A", "C"), ("B", "C"), ("C", "D")],
    );
    let cg = ContactGraph::build(nodes, edges).expect("build graph");
    let sub = extract(&cg, "A", 1).expect("extract");
    assert_eq!(sub.edge_ids(), vec!["A-B", "A-C", "B-C"]);
}

#[test]
fn extraction_stays_inside_the_component() {
    let (nodes, edges) = snapshot(&["A", "B", "X", "Y"], &[("A", "B"), ("X", "Y")]);
    let cg = ContactGraph::build(nodes, edges).expect("build graph");
    let sub = extract(&cg, "A", 5).expect("extract");
    assert_eq!(sub.node_ids(), vec!["A", "B"]);
}

#[test]
fn unknown_focus_is_node_not_found() {
    assert_eq!(
        extract(&path_abcd(), "Z", 1),
        Err(EngineError::NodeNotFound("Z".to_string()))
    );
}

#[test]
fn engine_extract_validates_input() {
    let (nodes, mut edges) = snapshot(&["A", "B"], &[("A", "B")]);
    edges.push(kith_core::model::RelationshipEdge::new("bad", "A", "ghost", 1.0));
    let err = Engine::default().extract(nodes, edges, "A", 1).unwrap_err();
    assert!(matches!(err, EngineError::InvalidGraph { .. }));
}

#[test]
fn report_focus_carries_metrics_and_hops() {
    let (nodes, edges) = snapshot(&["A", "B", "C", "D"], &[("A", "B"), ("B", "C"), ("C", "D")]);
    let mut config = EngineConfig::default();
    config.inference.mode = InferenceMode::Never;
    let report = Engine::new(config).analyze(nodes, edges).expect("analyze");

    let focused = report.focus("B", 1).expect("focus");
    assert_eq!(focused.focus, "B");
    let summary: Vec<(&str, usize)> = focused
        .nodes
        .iter()
        .map(|n| (n.contact.id.as_str(), n.hops))
        .collect();
    assert_eq!(summary, vec![("A", 1), ("B", 0), ("C", 1)]);

    for node in &focused.nodes {
        assert_eq!(Some(&node.metrics), report.metrics_for(&node.contact.id));
    }
    assert_eq!(
        report.focus("nobody", 1).unwrap_err(),
        EngineError::NodeNotFound("nobody".to_string())
    );
}
