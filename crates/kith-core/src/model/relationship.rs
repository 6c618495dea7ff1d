use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{ParseEnumError, normalize};

/// Confidence assigned to edges the estimator generates.
pub const INFERRED_CONFIDENCE: f64 = 0.6;

/// Confidence assigned to explicitly recorded relationships by default.
pub const EXPLICIT_CONFIDENCE: f64 = 0.9;

/// Categorical relationship tag. Informational only; algorithms consume
/// [`RelationshipEdge::strength`], never the kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Introduction,
    Colleague,
    #[default]
    Business,
    Friend,
    Family,
    Other,
}

impl RelationshipKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Introduction => "introduction",
            Self::Colleague => "colleague",
            Self::Business => "business",
            Self::Friend => "friend",
            Self::Family => "family",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "introduction" => Ok(Self::Introduction),
            "colleague" => Ok(Self::Colleague),
            "business" => Ok(Self::Business),
            "friend" => Ok(Self::Friend),
            "family" => Ok(Self::Family),
            "other" => Ok(Self::Other),
            _ => Err(ParseEnumError {
                expected: "relationship kind",
                got: s.to_string(),
            }),
        }
    }
}

/// Interaction counters carried on an edge.
///
/// Inputs for callers that derive strengths themselves; the engine never
/// reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionCounters {
    pub shared_projects: u32,
    pub meeting_count: u32,
    pub email_exchanges: u32,
}

impl InteractionCounters {
    /// Element-wise maximum, used when duplicate edges are merged.
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self {
            shared_projects: self.shared_projects.max(other.shared_projects),
            meeting_count: self.meeting_count.max(other.meeting_count),
            email_exchanges: self.email_exchanges.max(other.email_exchanges),
        }
    }
}

/// A relationship between two contacts.
///
/// `from`/`to` record provenance (e.g. who introduced whom). Every
/// algorithm treats the edge as undirected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub kind: RelationshipKind,
    pub strength: f64,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub counters: InteractionCounters,
}

const fn default_confidence() -> f64 {
    EXPLICIT_CONFIDENCE
}

impl RelationshipEdge {
    /// Create an explicitly recorded edge with default metadata.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        strength: f64,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            kind: RelationshipKind::default(),
            strength,
            confidence: EXPLICIT_CONFIDENCE,
            counters: InteractionCounters::default(),
        }
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: RelationshipKind) -> Self {
        self.kind = kind;
        self
    }

    /// The endpoint pair in canonical (lexicographic) order.
    #[must_use]
    pub fn unordered_pair(&self) -> (&str, &str) {
        if self.from <= self.to {
            (self.from.as_str(), self.to.as_str())
        } else {
            (self.to.as_str(), self.from.as_str())
        }
    }

    #[must_use]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unordered_pair_ignores_direction() {
        let ab = RelationshipEdge::new("e1", "a", "b", 1.0);
        let ba = RelationshipEdge::new("e2", "b", "a", 2.0);
        assert_eq!(ab.unordered_pair(), ba.unordered_pair());
    }

    #[test]
    fn edge_defaults_fill_missing_metadata() {
        let edge: RelationshipEdge =
            serde_json::from_str(r#"{"id":"e1","from":"a","to":"b","strength":3.5}"#)
                .expect("parse edge");
        assert_eq!(edge.kind, RelationshipKind::Business);
        assert!((edge.confidence - EXPLICIT_CONFIDENCE).abs() < f64::EPSILON);
        assert_eq!(edge.counters, InteractionCounters::default());
    }

    #[test]
    fn counters_merge_elementwise() {
        let a = InteractionCounters {
            shared_projects: 3,
            meeting_count: 1,
            email_exchanges: 0,
        };
        let b = InteractionCounters {
            shared_projects: 1,
            meeting_count: 4,
            email_exchanges: 9,
        };
        let merged = a.max(b);
        assert_eq!(merged.shared_projects, 3);
        assert_eq!(merged.meeting_count, 4);
        assert_eq!(merged.email_exchanges, 9);
    }

    #[test]
    fn kind_round_trips_through_text() {
        for kind in [
            RelationshipKind::Introduction,
            RelationshipKind::Colleague,
            RelationshipKind::Business,
            RelationshipKind::Friend,
            RelationshipKind::Family,
            RelationshipKind::Other,
        ] {
            assert_eq!(kind.to_string().parse::<RelationshipKind>(), Ok(kind));
        }
    }
}
