//! Error taxonomy for the analytics engine.
//!
//! Every engine failure is fatal to the call that produced it; no partial
//! results are returned. Numeric edge cases (isolated nodes, unreachable
//! pairs, tiny graphs) are not errors.

use std::fmt;

/// Errors surfaced by graph construction, aggregation, and extraction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The supplied nodes/edges do not form a valid graph.
    ///
    /// `edge_ids` lists every offending edge (or node id, for duplicate
    /// node ids), in input order.
    #[error("invalid graph: {reason} [{}]", .edge_ids.join(", "))]
    InvalidGraph {
        reason: GraphViolation,
        edge_ids: Vec<String>,
    },

    /// Network value weights are negative, non-finite, or do not sum to 1.
    #[error("network value weights must sum to 1 (got {sum})")]
    InvalidWeights { sum: f64 },

    /// A node id is not present in the graph.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// The caller's cancel flag was raised mid-computation.
    #[error("analysis cancelled")]
    Cancelled,

    /// Engine configuration is out of range.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidGraph { .. } => ErrorCode::InvalidGraph,
            Self::InvalidWeights { .. } => ErrorCode::InvalidWeights,
            Self::NodeNotFound(_) => ErrorCode::NodeNotFound,
            Self::Cancelled => ErrorCode::Cancelled,
            Self::InvalidConfig(_) => ErrorCode::InvalidConfig,
        }
    }

    pub(crate) fn invalid_graph(reason: GraphViolation, edge_ids: Vec<String>) -> Self {
        Self::InvalidGraph { reason, edge_ids }
    }
}

/// Which graph invariant was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphViolation {
    UnknownEndpoint,
    SelfLoop,
    NonPositiveStrength,
    DuplicateNode,
}

impl fmt::Display for GraphViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::UnknownEndpoint => "edge references an unknown node",
            Self::SelfLoop => "self-loop edge",
            Self::NonPositiveStrength => "edge strength must be positive and finite",
            Self::DuplicateNode => "duplicate node id",
        })
    }
}

/// Constructors used by the analytics crate.
impl EngineError {
    #[must_use]
    pub fn unknown_endpoint(edge_ids: Vec<String>) -> Self {
        Self::invalid_graph(GraphViolation::UnknownEndpoint, edge_ids)
    }

    #[must_use]
    pub fn self_loop(edge_ids: Vec<String>) -> Self {
        Self::invalid_graph(GraphViolation::SelfLoop, edge_ids)
    }

    #[must_use]
    pub fn non_positive_strength(edge_ids: Vec<String>) -> Self {
        Self::invalid_graph(GraphViolation::NonPositiveStrength, edge_ids)
    }

    #[must_use]
    pub fn duplicate_node(node_ids: Vec<String>) -> Self {
        Self::invalid_graph(GraphViolation::DuplicateNode, node_ids)
    }
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidGraph,
    InvalidWeights,
    NodeNotFound,
    Cancelled,
    InvalidConfig,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidGraph => "E2001",
            Self::InvalidWeights => "E2002",
            Self::NodeNotFound => "E2003",
            Self::Cancelled => "E5001",
            Self::InvalidConfig => "E1001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidGraph => "Invalid relationship graph",
            Self::InvalidWeights => "Invalid network value weights",
            Self::NodeNotFound => "Contact not found",
            Self::Cancelled => "Analysis cancelled",
            Self::InvalidConfig => "Invalid engine configuration",
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidGraph => Some(
                "Drop or repair the listed relationships; every endpoint must be a supplied contact.",
            ),
            Self::InvalidWeights => Some("Adjust [weights] so the four values sum to 1."),
            Self::NodeNotFound => Some("Check the contact id; it must be part of the snapshot."),
            Self::Cancelled => None,
            Self::InvalidConfig => Some("Fix the engine config file and retry."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
