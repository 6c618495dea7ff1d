//! Contact-graph data model.
//!
//! These are the records the surrounding contact store hands to the engine
//! (contacts and relationships) and the metrics the engine hands back.
//! Field names serialize in camelCase to match the store's JSON shape.

pub mod contact;
pub mod metrics;
pub mod relationship;

use std::fmt;

pub use contact::{ContactAttributes, ContactNode, Importance};
pub use metrics::NodeMetrics;
pub use relationship::{
    EXPLICIT_CONFIDENCE, INFERRED_CONFIDENCE, InteractionCounters, RelationshipEdge,
    RelationshipKind,
};

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}
