//! Tree build error.
//!
//! Returned by `TreeBuilder::build` when the entry or an edge references an unknown
//! node, or when outcome routing would not be deterministic.

use thiserror::Error;

/// Error when building a tree from its nodes and edges.
///
/// Each variant names the offending id or edge so the operator can find it in the
/// tree configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedGraphError {
    /// No entry node was set.
    #[error("tree {0} has no entry node")]
    MissingEntry(String),

    /// The entry id is neither a node of the tree nor a sentinel.
    #[error("entry node not found: {0}")]
    EntryNotFound(String),

    /// Two nodes were added with the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// A node uses one of the reserved SUCCESS/FAILURE ids.
    #[error("node id {0} is reserved for a terminal sentinel")]
    SentinelNodeId(String),

    /// An edge starts at an id that is not a node of the tree.
    #[error("edge {outcome:?} leaves unknown node {source_id}")]
    EdgeSourceNotFound { source_id: String, outcome: String },

    /// An edge starts at a sentinel; sentinels are terminal.
    #[error("edge {outcome:?} leaves terminal sentinel {source_id}")]
    EdgeFromSentinel { source_id: String, outcome: String },

    /// An edge points at an id that is neither a node nor a sentinel.
    #[error("edge {source_id} --{outcome:?}--> {destination}: destination not found")]
    EdgeTargetNotFound {
        source_id: String,
        outcome: String,
        destination: String,
    },

    /// Two edges share a (source, outcome) pair.
    #[error("duplicate outcome {outcome:?} on node {source_id}")]
    DuplicateOutcome { source_id: String, outcome: String },

    /// A lookup named a node that does not exist in the tree.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// An inner tree embeds a tree that is already being evaluated around it.
    #[error("inner tree {0} embeds itself")]
    InnerTreeCycle(String),
}
