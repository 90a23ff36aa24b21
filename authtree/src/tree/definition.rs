//! Loader record for one tree: what a configuration store hands the engine.

use serde::{Deserialize, Serialize};

use super::model::{Edge, GraphNode};

/// Tree description as supplied by a `TreeLoader`.
///
/// Type syntax is assumed valid; structure is re-validated by `Tree::from_definition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDefinition {
    pub name: String,
    pub realm: String,
    pub entry_node_id: String,
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}
