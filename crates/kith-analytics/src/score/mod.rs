//! Composite network value scoring.

pub mod network_value;

pub use kith_core::config::NetworkValueWeights;
pub use network_value::{MetricInputs, aggregate, aggregate_all, normalize_metric};
