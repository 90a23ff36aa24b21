//! `InnerTreeEvaluator`: runs another tree of the same realm as a single node.
//!
//! The inner tree shares the outer attempt's shared state. While the inner tree is
//! suspended its position is kept in shared state under [`position_key`], so a
//! resumed outer call lands back on this node and continues the inner tree there.
//! Positions of trees nested deeper are stored inside that record, never next to
//! it, so evaluator nodes of different trees may share an id.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StepError;
use crate::state::{JsonObject, Outcome, TreeState, TARGET_AUTH_LEVEL_KEY};
use crate::step::{Action, LevelContribution, Step, StepContext, StepSpec};

/// Registered type name.
pub const INNER_TREE_EVALUATOR: &str = "InnerTreeEvaluator";
/// Outcome when the inner tree reached SUCCESS.
pub const TRUE_OUTCOME: &str = "true";
/// Outcome when the inner tree reached FAILURE.
pub const FALSE_OUTCOME: &str = "false";

const POSITION_PREFIX: &str = "_innerTree:";

/// Shared-state key holding the suspended inner position of outer node `node_id`.
///
/// The value is an object: `nodeId` is the inner node that suspended, `nested` holds
/// the position records of evaluators inside the inner tree.
pub fn position_key(node_id: &str) -> String {
    format!("{}{}", POSITION_PREFIX, node_id)
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InnerPosition {
    node_id: String,
    #[serde(default)]
    nested: JsonObject,
}

/// Removes every position record from `doc` and returns them.
fn take_positions(doc: &mut JsonObject) -> JsonObject {
    let keys: Vec<String> = doc
        .keys()
        .filter(|k| k.starts_with(POSITION_PREFIX))
        .cloned()
        .collect();
    keys.into_iter()
        .filter_map(|k| doc.remove(&k).map(|v| (k, v)))
        .collect()
}

#[derive(Debug, Clone)]
pub struct InnerTreeStep {
    tree: String,
}

impl InnerTreeStep {
    pub fn new(tree: impl Into<String>) -> Self {
        Self { tree: tree.into() }
    }

    /// Reads `{"tree": name}` from the node's config.
    pub fn from_spec(spec: &StepSpec<'_>) -> Result<Arc<dyn Step>, StepError> {
        let tree = spec
            .config
            .get("tree")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                StepError::InvalidConfig(format!(
                    "node {}: \"tree\" must name the inner tree",
                    spec.node_id
                ))
            })?;
        Ok(Arc::new(Self::new(tree)))
    }

    pub fn tree(&self) -> &str {
        &self.tree
    }
}

#[async_trait]
impl Step for InnerTreeStep {
    async fn process(&self, ctx: &StepContext<'_>) -> Result<Action, StepError> {
        let key = position_key(ctx.node_id);
        let mut shared = ctx.shared_state.clone();
        let position = shared
            .remove(&key)
            .map(serde_json::from_value::<InnerPosition>)
            .transpose()
            .map_err(|e| {
                StepError::Failed(format!(
                    "node {}: unreadable inner tree position: {}",
                    ctx.node_id, e
                ))
            })?;
        // Records of other evaluators at this level stay out of the inner run.
        let outer_positions = take_positions(&mut shared);
        // The outer level check already covers this node; the inner tree is not
        // held to the attempt's target on its own.
        let target = shared.remove(TARGET_AUTH_LEVEL_KEY);

        let (resume_at, input) = match position {
            Some(InnerPosition { node_id, nested }) => {
                shared.extend(nested);
                (Some(node_id), ctx.callbacks.to_vec())
            }
            None => (None, Vec::new()),
        };
        let mut inner_state =
            TreeState::new(shared).with_transient_state(ctx.transient_state.clone());
        if let Some(node_id) = resume_at {
            inner_state = inner_state.with_current_node(node_id);
        }

        let run = ctx
            .executor()
            .process_inner(ctx, &self.tree, inner_state, input)
            .await?;

        let outcome = run.result.outcome();
        let callbacks = run.result.callbacks().to_vec();
        let inner = run.result.into_state();
        let mut shared: JsonObject = inner.shared_state().clone();
        let nested = take_positions(&mut shared);
        shared.extend(outer_positions);
        if let Some(target) = target {
            shared.insert(TARGET_AUTH_LEVEL_KEY.into(), target);
        }

        let action = match outcome {
            Outcome::NeedsInput => {
                if let Some(node_id) = inner.current_node_id() {
                    let record = InnerPosition {
                        node_id: node_id.to_string(),
                        nested,
                    };
                    let value = serde_json::to_value(record)
                        .map_err(|e| StepError::Failed(e.to_string()))?;
                    shared.insert(key, value);
                }
                Action::send(callbacks)
            }
            Outcome::True => Action::goto(TRUE_OUTCOME).with_transient_state(run.transient_state),
            Outcome::False => Action::goto(FALSE_OUTCOME).with_transient_state(run.transient_state),
        };
        Ok(action
            .with_shared_state(shared)
            .with_session_properties(inner.session_properties().clone())
            .with_session_hooks(inner.session_hooks().to_vec())
            .with_webhooks(inner.webhooks().to_vec()))
    }

    fn level_contribution(&self) -> LevelContribution {
        LevelContribution::InnerTree(self.tree.clone())
    }
}
