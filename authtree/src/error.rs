//! Engine error types.
//!
//! [`StepError`] is what a step returns from `Step::process`; [`NodeProcessError`]
//! is what `TreeExecutor::process` (and the analyzer) return to callers.

use thiserror::Error;

use crate::tree::MalformedGraphError;

/// Fault raised by a step implementation or its factory.
///
/// Wrapped by the executor into [`NodeProcessError::StepExecution`] together with the
/// failing node's id and type; never retried.
#[derive(Debug, Error)]
pub enum StepError {
    /// The step failed while processing (e.g. a backend it depends on is down).
    #[error("step failed: {0}")]
    Failed(String),

    /// The node's declared configuration is not usable by this step type.
    #[error("invalid step configuration: {0}")]
    InvalidConfig(String),

    /// Submitted callbacks could not be interpreted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The step returned an action with neither an outcome nor callbacks.
    #[error("step returned no outcome")]
    NoOutcome,

    /// An engine call made by the step itself failed (inner trees).
    #[error("inner tree failed: {0}")]
    Engine(Box<NodeProcessError>),
}

/// Error returned by `TreeExecutor::process` and the auth level analyzer.
///
/// Every variant aborts the current call; the caller keeps its previous committed
/// `TreeState`.
#[derive(Debug, Error)]
pub enum NodeProcessError {
    /// The tree structure is invalid (dangling edge, duplicate outcome, ...).
    #[error(transparent)]
    MalformedGraph(#[from] MalformedGraphError),

    /// A step returned an outcome label that has no edge in the tree.
    #[error("node {node_id} in tree {tree} returned outcome {outcome:?} which is not wired")]
    UnknownOutcome {
        tree: String,
        node_id: String,
        outcome: String,
    },

    /// The attempt requires an auth level no remaining path can reach.
    #[error(
        "auth level {target} unreachable from node {node_id}: current {current}, max attainable {max_attainable:?}"
    )]
    LevelUnreachable {
        node_id: String,
        target: i32,
        current: i32,
        max_attainable: Option<i32>,
    },

    /// A step failed; wraps the step's own error with the node it ran at.
    #[error("step {node_type} at node {node_id} failed: {source}")]
    StepExecution {
        node_id: String,
        node_type: String,
        #[source]
        source: StepError,
    },

    /// A node names a step type nothing is registered for.
    #[error("unknown step type: {0}")]
    UnknownStepType(String),

    /// A named tree does not exist in the realm.
    #[error("tree {name} not found in realm {realm}")]
    TreeNotFound { realm: String, name: String },

    /// The tree loader failed to produce a definition.
    #[error("failed to load tree {name} in realm {realm}: {message}")]
    TreeLoad {
        realm: String,
        name: String,
        message: String,
    },
}

impl NodeProcessError {
    /// Errors an operator has to fix in the tree or step configuration.
    pub fn is_configuration_defect(&self) -> bool {
        matches!(
            self,
            NodeProcessError::MalformedGraph(_)
                | NodeProcessError::UnknownOutcome { .. }
                | NodeProcessError::UnknownStepType(_)
                | NodeProcessError::TreeNotFound { .. }
                | NodeProcessError::TreeLoad { .. }
        )
    }

    /// Security policy failures; reported to the user as a failed authentication.
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, NodeProcessError::LevelUnreachable { .. })
    }
}

impl From<NodeProcessError> for StepError {
    fn from(e: NodeProcessError) -> Self {
        StepError::Engine(Box::new(e))
    }
}
