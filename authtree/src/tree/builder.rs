//! Tree builder: nodes + outcome-labeled edges (source --outcome--> destination).
//!
//! Add nodes with `add_node`, wire outcomes with `add_edge(source, outcome, destination)`
//! using [`SUCCESS`] and [`FAILURE`] as terminal destinations, pick the entry with
//! `set_entry`, then `build` to get an immutable [`Tree`].

use std::collections::{HashMap, HashSet};

use super::build_error::MalformedGraphError;
use super::definition::TreeDefinition;
use super::model::{is_sentinel, Edge, GraphNode, Tree, FAILURE, SUCCESS};

/// Mutable collection of nodes and edges; validated and frozen by [`build`](Self::build).
///
/// **Interaction**: Fed by a [`TreeDefinition`] (loader) or directly by tests; produces
/// the `Tree` consumed by the executor and the visitor.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    name: String,
    realm: String,
    entry: Option<String>,
    nodes: Vec<GraphNode>,
    edges: Vec<Edge>,
}

impl TreeBuilder {
    /// Creates an empty builder for tree `name` in `realm`.
    pub fn new(name: impl Into<String>, realm: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            realm: realm.into(),
            entry: None,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Sets the entry node id. May be a sentinel.
    pub fn set_entry(&mut self, id: impl Into<String>) -> &mut Self {
        self.entry = Some(id.into());
        self
    }

    /// Adds a node. Ids must be unique; duplicates are rejected by `build`.
    pub fn add_node(&mut self, node: GraphNode) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Adds an edge from `source` to `destination` taken when `source` returns `outcome`.
    pub fn add_edge(
        &mut self,
        source: impl Into<String>,
        outcome: impl Into<String>,
        destination: impl Into<String>,
    ) -> &mut Self {
        self.edges.push(Edge::new(source, outcome, destination));
        self
    }

    /// Validates and freezes the tree.
    ///
    /// Fails when the entry or any edge endpoint does not resolve to a node or a
    /// sentinel, when a (source, outcome) pair is wired twice, when an edge leaves a
    /// sentinel or when a node reuses a sentinel id.
    pub fn build(self) -> Result<Tree, MalformedGraphError> {
        let entry = self
            .entry
            .ok_or_else(|| MalformedGraphError::MissingEntry(self.name.clone()))?;

        let mut nodes = HashMap::with_capacity(self.nodes.len());
        for node in self.nodes {
            if is_sentinel(&node.id) {
                return Err(MalformedGraphError::SentinelNodeId(node.id));
            }
            if nodes.contains_key(&node.id) {
                return Err(MalformedGraphError::DuplicateNode(node.id));
            }
            nodes.insert(node.id.clone(), node);
        }

        if !is_sentinel(&entry) && !nodes.contains_key(&entry) {
            return Err(MalformedGraphError::EntryNotFound(entry));
        }

        let mut seen = HashSet::new();
        let mut outgoing: HashMap<String, Vec<Edge>> = HashMap::new();
        let mut routes: HashMap<String, HashMap<String, String>> = HashMap::new();
        for edge in self.edges {
            if is_sentinel(&edge.source) {
                return Err(MalformedGraphError::EdgeFromSentinel {
                    source_id: edge.source,
                    outcome: edge.outcome,
                });
            }
            if !nodes.contains_key(&edge.source) {
                return Err(MalformedGraphError::EdgeSourceNotFound {
                    source_id: edge.source,
                    outcome: edge.outcome,
                });
            }
            if edge.destination != SUCCESS
                && edge.destination != FAILURE
                && !nodes.contains_key(&edge.destination)
            {
                return Err(MalformedGraphError::EdgeTargetNotFound {
                    source_id: edge.source,
                    outcome: edge.outcome,
                    destination: edge.destination,
                });
            }
            if !seen.insert((edge.source.clone(), edge.outcome.clone())) {
                return Err(MalformedGraphError::DuplicateOutcome {
                    source_id: edge.source,
                    outcome: edge.outcome,
                });
            }
            routes
                .entry(edge.source.clone())
                .or_default()
                .insert(edge.outcome.clone(), edge.destination.clone());
            outgoing.entry(edge.source.clone()).or_default().push(edge);
        }

        Ok(Tree {
            name: self.name,
            realm: self.realm,
            entry_node_id: entry,
            nodes,
            outgoing,
            routes,
        })
    }
}

impl From<TreeDefinition> for TreeBuilder {
    fn from(def: TreeDefinition) -> Self {
        Self {
            name: def.name,
            realm: def.realm,
            entry: Some(def.entry_node_id),
            nodes: def.nodes,
            edges: def.edges,
        }
    }
}

impl Tree {
    /// Builds a tree from a loader record, re-validating its structure.
    pub fn from_definition(def: TreeDefinition) -> Result<Tree, MalformedGraphError> {
        TreeBuilder::from(def).build()
    }
}
