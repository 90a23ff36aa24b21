//! Callbacks: input requests surfaced on suspend, and the answers submitted on resume.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One input request/response unit.
///
/// A step sends callbacks with `input` unset; the caller returns the same callbacks
/// with `input` filled in on the next `process` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Callback {
    /// Callback kind, e.g. `ChoiceCallback`, `NameCallback`.
    #[serde(rename = "type")]
    pub callback_type: String,
    /// Prompt data shown to the user.
    #[serde(default)]
    pub output: Value,
    /// The user's answer; absent on requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
}

impl Callback {
    pub fn new(callback_type: impl Into<String>, output: Value) -> Self {
        Self {
            callback_type: callback_type.into(),
            output,
            input: None,
        }
    }

    /// Returns the callback answered with `input`.
    pub fn with_input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }

    pub fn is_type(&self, callback_type: &str) -> bool {
        self.callback_type == callback_type
    }
}
