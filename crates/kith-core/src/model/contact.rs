use std::collections::BTreeSet;
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{ParseEnumError, normalize};

/// Caller-assigned importance of a contact.
///
/// Ordered: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Importance {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseEnumError {
                expected: "importance",
                got: s.to_string(),
            }),
        }
    }
}

/// Attributes the strength estimator compares between two contacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContactAttributes {
    /// Company identifier (compared case-insensitively).
    pub company: Option<String>,
    /// Id of the contact who introduced this one.
    pub introduced_by: Option<String>,
    pub tags: BTreeSet<String>,
    pub importance: Option<Importance>,
}

/// One contact, i.e. one graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactNode {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub attributes: ContactAttributes,
}

impl ContactNode {
    /// Create a node with empty attributes.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            attributes: ContactAttributes::default(),
        }
    }

    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.attributes.company = Some(company.into());
        self
    }

    #[must_use]
    pub fn introduced_by(mut self, introducer: impl Into<String>) -> Self {
        self.attributes.introduced_by = Some(introducer.into());
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub const fn with_importance(mut self, importance: Importance) -> Self {
        self.attributes.importance = Some(importance);
        self
    }
}
