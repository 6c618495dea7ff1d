//! Shared fixtures for integration tests.
//!
//! Random snapshots come from a seeded `StdRng`, so a failing proptest
//! case reproduces from its seed alone.

#![allow(dead_code)]

use kith_core::model::{ContactNode, Importance, RelationshipEdge};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const COMPANIES: [&str; 3] = ["acme", "globex", "initech"];
const TAGS: [&str; 5] = ["rust", "climbing", "investor", "design", "alumni"];

/// Contacts named by `ids`, with strength-1 edges id'd `from-to`.
pub fn snapshot(
    ids: &[&str],
    edges: &[(&str, &str)],
) -> (Vec<ContactNode>, Vec<RelationshipEdge>) {
    let nodes = ids.iter().map(|id| ContactNode::new(*id, *id)).collect();
    let edges = edges
        .iter()
        .map(|(a, b)| RelationshipEdge::new(format!("{a}-{b}"), *a, *b, 1.0))
        .collect();
    (nodes, edges)
}

/// A random snapshot with `n` contacts and each pair tied with
/// probability `p`. Attributes are drawn so the estimator has signal.
pub fn random_snapshot(seed: u64, n: usize, p: f64) -> (Vec<ContactNode>, Vec<RelationshipEdge>) {
    let mut rng = StdRng::seed_from_u64(seed);

    let nodes: Vec<ContactNode> = (0..n)
        .map(|i| {
            let mut node = ContactNode::new(format!("c{i:03}"), format!("Contact {i}"));
            if rng.gen_bool(0.7) {
                node = node.with_company(COMPANIES[rng.gen_range(0..COMPANIES.len())]);
            }
            if i > 0 && rng.gen_bool(0.3) {
                node = node.introduced_by(format!("c{:03}", rng.gen_range(0..i)));
            }
            let tags: Vec<&str> = TAGS.iter().copied().filter(|_| rng.gen_bool(0.3)).collect();
            node = node.with_tags(tags);
            match rng.gen_range(0..4) {
                0 => node.with_importance(Importance::Low),
                1 => node.with_importance(Importance::Medium),
                2 => node.with_importance(Importance::High),
                _ => node,
            }
        })
        .collect();

    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.gen_bool(p) {
                let strength = rng.gen_range(0.5..10.0);
                edges.push(RelationshipEdge::new(
                    format!("e{i}-{j}"),
                    nodes[i].id.clone(),
                    nodes[j].id.clone(),
                    strength,
                ));
            }
        }
    }

    (nodes, edges)
}
