use kith_core::config::NetworkValueWeights;
use kith_core::error::EngineError;
use serde::{Deserialize, Serialize};

/// The four centrality scores of one contact.
///
/// [`aggregate`] clamps each field to `[0, 1]`. Callers combining raw
/// metrics across a node set should go through [`aggregate_all`], which
/// min-max normalizes each metric first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricInputs {
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
    pub page_rank: f64,
}

/// Weighted sum of already-normalized inputs:
///
/// `NV(v) = wD*D + wB*B + wC*C + wPR*PR`
///
/// Weights are not validated here; see [`NetworkValueWeights::validate`].
#[must_use]
pub fn aggregate(inputs: &MetricInputs, weights: &NetworkValueWeights) -> f64 {
    let d = normalize_unit(inputs.degree);
    let b = normalize_unit(inputs.betweenness);
    let c = normalize_unit(inputs.closeness);
    let pr = normalize_unit(inputs.page_rank);

    (weights.degree * d)
        + (weights.betweenness * b)
        + (weights.closeness * c)
        + (weights.page_rank * pr)
}

/// Normalize each metric across the node set and aggregate per node.
///
/// Metrics that are identical across every node (including the single-node
/// case) normalize to 0.0, so a one-node set always scores 0.0.
///
/// # Errors
///
/// Returns [`EngineError::InvalidWeights`] before touching the inputs if
/// the weights do not sum to 1.
pub fn aggregate_all(
    raw: &[MetricInputs],
    weights: &NetworkValueWeights,
) -> Result<Vec<f64>, EngineError> {
    weights.validate()?;

    let column = |f: fn(&MetricInputs) -> f64| -> Vec<f64> {
        normalize_metric(&raw.iter().map(f).collect::<Vec<_>>())
    };
    let degree = column(|m| m.degree);
    let betweenness = column(|m| m.betweenness);
    let closeness = column(|m| m.closeness);
    let page_rank = column(|m| m.page_rank);

    Ok((0..raw.len())
        .map(|i| {
            let normalized = MetricInputs {
                degree: degree[i],
                betweenness: betweenness[i],
                closeness: closeness[i],
                page_rank: page_rank[i],
            };
            normalize_unit(aggregate(&normalized, weights))
        })
        .collect())
}

/// Spreads narrower than this (relative to the largest magnitude) are
/// floating-point noise, not a ranking.
const FLAT_TOLERANCE: f64 = 1e-12;

/// Min-max normalization that maps raw metric values to `[0, 1]`.
///
/// If all values are equal (including a single-element slice), all outputs are
/// `0.0`. Values within [`FLAT_TOLERANCE`] of each other count as equal.
#[must_use]
pub fn normalize_metric(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    if !range.is_finite() || range <= FLAT_TOLERANCE * max.abs().max(min.abs()).max(1.0) {
        return vec![0.0; values.len()];
    }

    values
        .iter()
        .map(|&value| normalize_unit((value - min) / range))
        .collect()
}

fn normalize_unit(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }

    value.clamp(0.0, 1.0)
}
