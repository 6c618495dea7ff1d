//! Property tests over random snapshots.
//!
//! Snapshots come from `support::random_snapshot`, seeded by proptest, so
//! shrinking reduces the seed/size rather than the graph structure.

mod support;

use chrono::{TimeZone, Utc};
use kith_analytics::estimate::estimate;
use kith_analytics::{AnalysisReport, Engine};
use kith_core::CancelFlag;
use kith_core::config::{EngineConfig, EstimatorConfig, InferenceMode};
use proptest::prelude::*;
use support::random_snapshot;

fn analyze(seed: u64, n: usize, p: f64, mode: InferenceMode, parallel: bool) -> AnalysisReport {
    let (nodes, edges) = random_snapshot(seed, n, p);
    let mut config = EngineConfig::default();
    config.inference.mode = mode;
    config.parallel = parallel;
    let now = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid time");
    Engine::new(config)
        .analyze_at(nodes, edges, now, &CancelFlag::new())
        .expect("analyze")
}

fn mode_strategy() -> impl Strategy<Value = InferenceMode> {
    prop_oneof![
        Just(InferenceMode::Never),
        Just(InferenceMode::Sparse),
        Just(InferenceMode::Always),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_metric_is_in_unit_range(
        seed in any::<u64>(),
        n in 1usize..30,
        p in 0.0f64..0.5,
        mode in mode_strategy(),
    ) {
        let report = analyze(seed, n, p, mode, true);
        for node in &report.nodes {
            let m = &node.metrics;
            for value in [m.degree, m.betweenness, m.closeness, m.page_rank, m.network_value] {
                prop_assert!((0.0..=1.0).contains(&value), "{}: {value}", node.contact.id);
            }
        }
    }

    #[test]
    fn page_rank_sums_to_one(seed in any::<u64>(), n in 1usize..30, p in 0.0f64..0.5) {
        let report = analyze(seed, n, p, InferenceMode::Never, true);
        let total: f64 = report.nodes.iter().map(|n| n.metrics.page_rank).sum();
        prop_assert!((total - 1.0).abs() < 1e-6, "sum = {total}");
    }

    #[test]
    fn analysis_is_idempotent(
        seed in any::<u64>(),
        n in 1usize..25,
        p in 0.0f64..0.4,
        mode in mode_strategy(),
    ) {
        prop_assert_eq!(analyze(seed, n, p, mode, true), analyze(seed, n, p, mode, true));
    }

    #[test]
    fn parallel_matches_sequential(seed in any::<u64>(), n in 1usize..40, p in 0.0f64..0.3) {
        let par = analyze(seed, n, p, InferenceMode::Always, true);
        let seq = analyze(seed, n, p, InferenceMode::Always, false);
        prop_assert_eq!(par, seq);
    }

    #[test]
    fn estimator_is_symmetric(seed in any::<u64>(), n in 2usize..20) {
        let (nodes, _) = random_snapshot(seed, n, 0.0);
        let config = EstimatorConfig::default();
        for a in &nodes {
            for b in &nodes {
                let ab = estimate(a, b, &config);
                prop_assert_eq!(ab.to_bits(), estimate(b, a, &config).to_bits());
                prop_assert!((0.0..=100.0).contains(&ab));
            }
        }
    }

    #[test]
    fn inferred_edges_never_shadow_explicit_ones(seed in any::<u64>(), n in 2usize..25, p in 0.0f64..0.5) {
        let (_, explicit) = random_snapshot(seed, n, p);
        let report = analyze(seed, n, p, InferenceMode::Always, false);

        let explicit_pairs: std::collections::HashSet<(String, String)> = explicit
            .iter()
            .map(|e| {
                let (a, b) = e.unordered_pair();
                (a.to_string(), b.to_string())
            })
            .collect();
        let inferred: Vec<_> = report
            .edges
            .iter()
            .filter(|e| e.id.starts_with("inferred:"))
            .collect();

        prop_assert_eq!(inferred.len(), report.inferred_edge_count);
        for edge in inferred {
            let (a, b) = edge.unordered_pair();
            prop_assert!(!explicit_pairs.contains(&(a.to_string(), b.to_string())));
            prop_assert!(edge.strength > 2.0);
        }
    }
}
