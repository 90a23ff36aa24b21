//! Logging utilities for tree execution.
//!
//! Structured `tracing` events for step execution, suspension, terminal outcomes
//! and engine errors. The executor calls these; subscribers are installed by the
//! embedding binary.

use crate::error::NodeProcessError;
use crate::state::Outcome;

/// Log the start of a `process` call.
pub fn log_process_start(tree: &str, resume_node: Option<&str>) {
    tracing::info!(tree = tree, resume_node = ?resume_node, "Processing tree");
}

/// Log a step about to run.
pub fn log_step_start(node_id: &str, node_type: &str) {
    tracing::debug!(node_id = node_id, node_type = node_type, "Starting step");
}

/// Log a step that returned an outcome, and where it routes.
pub fn log_step_complete(node_id: &str, outcome: &str, next: &str) {
    tracing::debug!(node_id = node_id, outcome = outcome, next = next, "Step complete");
}

/// Log a suspension waiting for callbacks.
pub fn log_suspend(node_id: &str, callbacks: usize) {
    tracing::info!(node_id = node_id, callbacks = callbacks, "Suspended for input");
}

/// Log a terminal outcome.
pub fn log_terminal(tree: &str, outcome: Outcome) {
    tracing::info!(tree = tree, ?outcome, "Tree reached terminal outcome");
}

/// Log a failed `process` call.
///
/// Configuration defects are operator-actionable and logged at error; policy
/// violations are ordinary authentication failures and logged at warn.
pub fn log_process_error(tree: &str, error: &NodeProcessError) {
    if error.is_policy_violation() {
        tracing::warn!(tree = tree, %error, "Authentication policy not satisfiable");
    } else if error.is_configuration_defect() {
        tracing::error!(tree = tree, %error, "Tree configuration defect");
    } else {
        tracing::error!(tree = tree, %error, "Tree execution error");
    }
}

/// Log a tree built from its definition.
pub fn log_tree_built(realm: &str, name: &str, nodes: usize) {
    tracing::debug!(realm = realm, tree = name, nodes = nodes, "Built tree");
}

/// Log a cache eviction.
pub fn log_tree_evicted(realm: &str, name: &str) {
    tracing::debug!(realm = realm, tree = name, "Evicted cached tree");
}
