//! Action: what a step hands back to the executor.

use std::collections::BTreeMap;

use crate::state::{Callback, JsonObject, SessionHook};

/// Result of one `Step::process` call.
///
/// Either names an outcome label (the executor follows the matching edge) or carries
/// callbacks (the executor suspends). Replacement documents and session additions are
/// merged into the attempt's state in both cases.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    /// Outcome label selecting the outgoing edge; unset when sending callbacks.
    pub outcome: Option<String>,
    /// Replacement shared state; `None` keeps the current one.
    pub shared_state: Option<JsonObject>,
    /// Replacement transient state; `None` keeps the current one.
    pub transient_state: Option<JsonObject>,
    /// Input requests; non-empty means suspend.
    pub callbacks: Vec<Callback>,
    /// Session properties to set, overriding earlier values with the same key.
    pub session_properties: BTreeMap<String, String>,
    /// Post-success hooks to append.
    pub session_hooks: Vec<SessionHook>,
    /// Post-logout webhooks to append.
    pub webhooks: Vec<String>,
}

impl Action {
    /// Action that follows the edge labeled `outcome`.
    pub fn goto(outcome: impl Into<String>) -> Self {
        Self {
            outcome: Some(outcome.into()),
            ..Default::default()
        }
    }

    /// Action that suspends until `callbacks` are answered.
    pub fn send(callbacks: Vec<Callback>) -> Self {
        Self {
            callbacks,
            ..Default::default()
        }
    }

    pub fn sends_callbacks(&self) -> bool {
        !self.callbacks.is_empty()
    }

    pub fn with_shared_state(mut self, shared_state: JsonObject) -> Self {
        self.shared_state = Some(shared_state);
        self
    }

    pub fn with_transient_state(mut self, transient_state: JsonObject) -> Self {
        self.transient_state = Some(transient_state);
        self
    }

    pub fn with_session_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.session_properties.insert(key.into(), value.into());
        self
    }

    pub fn with_session_properties(mut self, properties: BTreeMap<String, String>) -> Self {
        self.session_properties.extend(properties);
        self
    }

    pub fn with_session_hook(mut self, hook: SessionHook) -> Self {
        self.session_hooks.push(hook);
        self
    }

    pub fn with_session_hooks(mut self, hooks: impl IntoIterator<Item = SessionHook>) -> Self {
        self.session_hooks.extend(hooks);
        self
    }

    pub fn with_webhook(mut self, webhook: impl Into<String>) -> Self {
        self.webhooks.push(webhook.into());
        self
    }

    pub fn with_webhooks(mut self, webhooks: impl IntoIterator<Item = String>) -> Self {
        self.webhooks.extend(webhooks);
        self
    }
}
