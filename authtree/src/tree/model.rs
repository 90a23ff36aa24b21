//! Built tree: immutable nodes, outcome-labeled edges and the routing index.
//!
//! Produced by `TreeBuilder::build`; shared as `Arc<Tree>` by every attempt that runs it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NodeProcessError;
use crate::step::StepRegistry;

/// Sentinel id for a successful end of the tree. Never a real node.
pub const SUCCESS: &str = "70e691a5-1e33-4ac3-a356-e7b6d60d92e0";

/// Sentinel id for a failed end of the tree. Never a real node.
pub const FAILURE: &str = "e301438c-0bd0-429c-ab0c-66126501069a";

/// True for the two terminal sentinel ids.
pub fn is_sentinel(id: &str) -> bool {
    id == SUCCESS || id == FAILURE
}

/// One step in a tree: id, step type (registry key), display name and declared config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub display_name: String,
    /// Step configuration handed to the step factory; `null` when the type takes none.
    #[serde(default)]
    pub config: Value,
}

impl GraphNode {
    pub fn new(
        id: impl Into<String>,
        node_type: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            display_name: display_name.into(),
            config: Value::Null,
        }
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }
}

/// Directed edge `source --outcome--> destination`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub outcome: String,
    pub destination: String,
}

impl Edge {
    pub fn new(
        source: impl Into<String>,
        outcome: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            outcome: outcome.into(),
            destination: destination.into(),
        }
    }
}

/// Immutable, validated authentication tree.
///
/// Holds the node map, outgoing edges per node (declaration order) and the
/// `(source, outcome) -> destination` routing index. Created only by
/// [`TreeBuilder::build`](super::TreeBuilder::build), so every edge endpoint resolves.
#[derive(Debug)]
pub struct Tree {
    pub(super) name: String,
    pub(super) realm: String,
    pub(super) entry_node_id: String,
    pub(super) nodes: HashMap<String, GraphNode>,
    pub(super) outgoing: HashMap<String, Vec<Edge>>,
    pub(super) routes: HashMap<String, HashMap<String, String>>,
}

impl Tree {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// Entry node id; may be a sentinel for a tree that ends immediately.
    pub fn entry_node_id(&self) -> &str {
        &self.entry_node_id
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn type_of(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).map(|n| n.node_type.as_str())
    }

    pub fn display_name_of(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).map(|n| n.display_name.as_str())
    }

    /// Outgoing edges of `id` in declaration order; empty for sentinels.
    pub fn outgoing(&self, id: &str) -> &[Edge] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Destination of the edge leaving `id` with label `outcome`.
    ///
    /// A missing edge means the step returned an outcome nobody wired, which is a
    /// configuration defect: returns [`NodeProcessError::UnknownOutcome`].
    pub fn next_node(&self, id: &str, outcome: &str) -> Result<&str, NodeProcessError> {
        self.routes
            .get(id)
            .and_then(|by_outcome| by_outcome.get(outcome))
            .map(String::as_str)
            .ok_or_else(|| NodeProcessError::UnknownOutcome {
                tree: self.name.clone(),
                node_id: id.to_string(),
                outcome: outcome.to_string(),
            })
    }

    /// Outcomes declared by each node's outcome provider that have no edge.
    ///
    /// Returns `(node_id, outcome)` pairs sorted by node id. A node of an unregistered
    /// type fails with `UnknownStepType`.
    pub fn unwired_outcomes(
        &self,
        registry: &StepRegistry,
    ) -> Result<Vec<(String, String)>, NodeProcessError> {
        let mut unwired = Vec::new();
        for node in self.nodes.values() {
            let provider = registry.outcome_provider_for(&node.node_type)?;
            let declared = provider.outcomes(&node.config).map_err(|source| {
                NodeProcessError::StepExecution {
                    node_id: node.id.clone(),
                    node_type: node.node_type.clone(),
                    source,
                }
            })?;
            for outcome in declared {
                if self.next_node(&node.id, &outcome).is_err() {
                    unwired.push((node.id.clone(), outcome));
                }
            }
        }
        unwired.sort();
        Ok(unwired)
    }
}
