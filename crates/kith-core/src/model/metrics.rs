use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-contact metrics produced by one analysis run.
///
/// Every score lies in `[0, 1]`. The caller persists these keyed by
/// contact id; the engine keeps nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetrics {
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
    pub page_rank: f64,
    pub network_value: f64,
    pub last_analyzed_at: DateTime<Utc>,
}

impl NodeMetrics {
    /// The four centrality scores in a fixed order:
    /// degree, betweenness, closeness, PageRank.
    #[must_use]
    pub const fn centralities(&self) -> [f64; 4] {
        [self.degree, self.betweenness, self.closeness, self.page_rank]
    }
}
