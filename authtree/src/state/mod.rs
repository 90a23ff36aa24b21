//! State and result values that cross the suspend/resume boundary.
//!
//! [`TreeState`] is the durable per-attempt state, [`TreeResult`] is what one
//! `process` call returns, [`Outcome`] classifies it. All are immutable values:
//! the executor produces a new `TreeState` after every step instead of editing one.

mod callback;
mod serializer;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::step::Action;

pub use callback::Callback;
pub use serializer::{JsonStateSerializer, StateError, StateSerializer};

/// JSON object used for shared and transient state. Never null; empty when unset.
pub type JsonObject = serde_json::Map<String, Value>;

/// Shared-state key holding the realm the attempt runs in.
pub const REALM_KEY: &str = "realm";
/// Shared-state key holding the auth level accumulated so far.
pub const AUTH_LEVEL_KEY: &str = "authLevel";
/// Shared-state key holding the auth level this attempt must reach.
pub const TARGET_AUTH_LEVEL_KEY: &str = "targetAuthLevel";

/// Terminal classification of a `process` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// The tree reached SUCCESS.
    True,
    /// The tree reached FAILURE.
    False,
    /// A step needs callbacks answered before the tree can continue.
    NeedsInput,
}

/// Post-success hook descriptor collected from steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionHook {
    pub hook_type: String,
    #[serde(default)]
    pub data: Value,
}

impl SessionHook {
    pub fn new(hook_type: impl Into<String>, data: Value) -> Self {
        Self {
            hook_type: hook_type.into(),
            data,
        }
    }
}

/// Durable state of one authentication attempt.
///
/// Persisted across a suspend as a flat document (`sharedState`, `currentNodeId`,
/// `sessionProperties`, `sessionHooks`, `webhooks`). Transient state is not persisted
/// and is always empty after a suspend or a terminal outcome.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeState {
    #[serde(default)]
    shared_state: JsonObject,
    #[serde(skip)]
    transient_state: JsonObject,
    #[serde(default)]
    current_node_id: Option<String>,
    #[serde(default)]
    session_properties: BTreeMap<String, String>,
    #[serde(default)]
    session_hooks: Vec<SessionHook>,
    #[serde(default)]
    webhooks: Vec<String>,
}

impl TreeState {
    /// State that has not processed any node yet, with the given shared state.
    pub fn new(shared_state: JsonObject) -> Self {
        Self {
            shared_state,
            ..Default::default()
        }
    }

    /// Fresh state for a new attempt: shared state stamped with the realm, an auth
    /// level of zero and, when given, the level the attempt must reach.
    pub fn initial(realm: &str, target_auth_level: Option<i32>) -> Self {
        let mut shared = JsonObject::new();
        shared.insert(REALM_KEY.into(), Value::from(realm));
        shared.insert(AUTH_LEVEL_KEY.into(), Value::from(0));
        if let Some(target) = target_auth_level {
            shared.insert(TARGET_AUTH_LEVEL_KEY.into(), Value::from(target));
        }
        Self::new(shared)
    }

    pub fn with_transient_state(self, transient_state: JsonObject) -> Self {
        Self {
            transient_state,
            ..self
        }
    }

    /// Returns the state positioned at `node_id`, as if that node had suspended.
    pub fn with_current_node(self, node_id: impl Into<String>) -> Self {
        Self {
            current_node_id: Some(node_id.into()),
            ..self
        }
    }

    pub fn shared_state(&self) -> &JsonObject {
        &self.shared_state
    }

    pub fn transient_state(&self) -> &JsonObject {
        &self.transient_state
    }

    /// Most recently processed node; `None` before the first step ran.
    pub fn current_node_id(&self) -> Option<&str> {
        self.current_node_id.as_deref()
    }

    pub fn session_properties(&self) -> &BTreeMap<String, String> {
        &self.session_properties
    }

    pub fn session_hooks(&self) -> &[SessionHook] {
        &self.session_hooks
    }

    pub fn webhooks(&self) -> &[String] {
        &self.webhooks
    }

    /// Auth level accumulated so far (`authLevel` in shared state, 0 when unset).
    pub fn auth_level(&self) -> i32 {
        read_level(&self.shared_state, AUTH_LEVEL_KEY).unwrap_or(0)
    }

    /// Auth level this attempt must reach, if one was requested.
    pub fn target_auth_level(&self) -> Option<i32> {
        read_level(&self.shared_state, TARGET_AUTH_LEVEL_KEY)
    }

    /// Persisted document for this state. Transient state is left out.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Reads a persisted document; transient state comes back empty.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Merges a step's action into a new state positioned at `node_id`.
    ///
    /// Shared/transient state are replaced only when the action supplies them;
    /// session properties are merged with the action winning; hooks and webhooks are
    /// appended. Returns the new state plus the action's routing: its outcome label
    /// and callbacks.
    pub(crate) fn apply_action(
        self,
        node_id: &str,
        action: Action,
    ) -> (TreeState, Option<String>, Vec<Callback>) {
        let Action {
            outcome,
            shared_state,
            transient_state,
            callbacks,
            session_properties,
            session_hooks,
            webhooks,
        } = action;

        let mut properties = self.session_properties;
        properties.extend(session_properties);
        let mut hooks = self.session_hooks;
        hooks.extend(session_hooks);
        let mut hook_urls = self.webhooks;
        hook_urls.extend(webhooks);

        let state = TreeState {
            shared_state: shared_state.unwrap_or(self.shared_state),
            transient_state: transient_state.unwrap_or(self.transient_state),
            current_node_id: Some(node_id.to_string()),
            session_properties: properties,
            session_hooks: hooks,
            webhooks: hook_urls,
        };
        (state, outcome, callbacks)
    }

    /// Drops transient state; applied on every suspend and terminal outcome.
    pub(crate) fn without_transient_state(self) -> Self {
        Self {
            transient_state: JsonObject::new(),
            ..self
        }
    }
}

fn read_level(shared: &JsonObject, key: &str) -> Option<i32> {
    shared
        .get(key)
        .and_then(Value::as_i64)
        .map(|v| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}

/// Output of one `process` call.
///
/// Callbacks are present only when the outcome is [`Outcome::NeedsInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeResult {
    state: TreeState,
    outcome: Outcome,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    callbacks: Vec<Callback>,
}

impl TreeResult {
    /// Terminal result. Transient state is cleared.
    pub(crate) fn complete(state: TreeState, reached_success: bool) -> Self {
        Self {
            state: state.without_transient_state(),
            outcome: if reached_success {
                Outcome::True
            } else {
                Outcome::False
            },
            callbacks: Vec::new(),
        }
    }

    /// Suspended result waiting for `callbacks`. Transient state is cleared.
    pub(crate) fn suspended(state: TreeState, callbacks: Vec<Callback>) -> Self {
        Self {
            state: state.without_transient_state(),
            outcome: Outcome::NeedsInput,
            callbacks,
        }
    }

    pub fn state(&self) -> &TreeState {
        &self.state
    }

    pub fn into_state(self) -> TreeState {
        self.state
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn callbacks(&self) -> &[Callback] {
        &self.callbacks
    }
}
