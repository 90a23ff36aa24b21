//! Context passed into a step for one `process` call.
//!
//! Holds read-only views of the attempt's state, the external request and any
//! submitted callbacks, plus the executor for steps that run inner trees.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::executor::TreeExecutor;
use crate::state::{Callback, JsonObject};

/// Request metadata of the call that drives this `process`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalRequest {
    #[serde(default)]
    pub parameters: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub headers: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub client_ip: Option<String>,
}

impl ExternalRequest {
    /// First value of query/form parameter `name`.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// First value of header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .and_then(|(_, v)| v.first())
            .map(String::as_str)
    }
}

/// Everything a step may read while processing.
pub struct StepContext<'a> {
    /// Realm (scope) the attempt runs in.
    pub realm: &'a str,
    /// Name of the tree the node belongs to.
    pub tree_name: &'a str,
    /// Id of the node being processed.
    pub node_id: &'a str,
    pub shared_state: &'a JsonObject,
    pub transient_state: &'a JsonObject,
    pub request: &'a ExternalRequest,
    /// Callbacks submitted by the caller; empty unless this node suspended last call.
    pub callbacks: &'a [Callback],
    tree_stack: &'a [String],
    executor: &'a TreeExecutor,
}

impl<'a> StepContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        realm: &'a str,
        tree_name: &'a str,
        node_id: &'a str,
        shared_state: &'a JsonObject,
        transient_state: &'a JsonObject,
        request: &'a ExternalRequest,
        callbacks: &'a [Callback],
        tree_stack: &'a [String],
        executor: &'a TreeExecutor,
    ) -> Self {
        Self {
            realm,
            tree_name,
            node_id,
            shared_state,
            transient_state,
            request,
            callbacks,
            tree_stack,
            executor,
        }
    }

    /// True when the caller submitted answers for this node.
    pub fn has_callbacks(&self) -> bool {
        !self.callbacks.is_empty()
    }

    /// First submitted callback of `callback_type`.
    pub fn callback(&self, callback_type: &str) -> Option<&'a Callback> {
        self.callbacks.iter().find(|c| c.is_type(callback_type))
    }

    /// Names of the trees being processed around this node, outermost first; the
    /// node's own tree is last.
    pub fn tree_stack(&self) -> &'a [String] {
        self.tree_stack
    }

    /// Executor running this attempt; used by steps that evaluate inner trees.
    pub fn executor(&self) -> &'a TreeExecutor {
        self.executor
    }
}
