//! Snapshot files: the contact store's JSON export.
//!
//! ```json
//! {
//!   "nodes": [{ "id": "ana", "label": "Ana", "attributes": { "company": "Acme" } }],
//!   "edges": [{ "id": "e1", "from": "ana", "to": "ben", "strength": 4.0 }]
//! }
//! ```
//!
//! `-` reads from stdin.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use kith_core::EngineError;
use kith_core::model::{ContactNode, RelationshipEdge};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub nodes: Vec<ContactNode>,
    #[serde(default)]
    pub edges: Vec<RelationshipEdge>,
}

impl Snapshot {
    /// Read and parse a snapshot from `path`, or stdin when `path` is `-`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = if path.as_os_str() == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read snapshot from stdin")?;
            buf
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?
        };

        let snapshot: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
        tracing::debug!(
            nodes = snapshot.nodes.len(),
            edges = snapshot.edges.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Find a contact by id.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NodeNotFound`] for an unknown id.
    pub fn contact(&self, id: &str) -> Result<&ContactNode, EngineError> {
        self.nodes
            .iter()
            .find(|n| n.id == id)
            .ok_or_else(|| EngineError::NodeNotFound(id.to_string()))
    }
}
