//! `ChoiceCollector`: asks the user to pick one of the configured choices.
//!
//! Each choice is also an outcome label, so trees wire one edge per choice.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::StepError;
use crate::state::Callback;
use crate::step::{Action, OutcomeProvider, Step, StepContext, StepSpec};

/// Registered type name.
pub const CHOICE_COLLECTOR: &str = "ChoiceCollector";
/// Callback type sent and read back by the step.
pub const CHOICE_CALLBACK: &str = "ChoiceCallback";

/// Node configuration of a choice collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceConfig {
    pub choices: Vec<String>,
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_prompt() -> String {
    "Choose one".to_string()
}

impl ChoiceConfig {
    fn parse(config: &Value) -> Result<Self, StepError> {
        let parsed: ChoiceConfig = serde_json::from_value(config.clone())
            .map_err(|e| StepError::InvalidConfig(format!("choice collector: {}", e)))?;
        if parsed.choices.is_empty() {
            return Err(StepError::InvalidConfig(
                "choice collector: \"choices\" must not be empty".into(),
            ));
        }
        Ok(parsed)
    }
}

/// Sends a [`CHOICE_CALLBACK`] on first visit; on resume returns the chosen choice.
///
/// The answer may be the choice's index or its text.
#[derive(Debug, Clone)]
pub struct ChoiceCollectorStep {
    config: ChoiceConfig,
}

impl ChoiceCollectorStep {
    pub fn new(config: ChoiceConfig) -> Self {
        Self { config }
    }

    pub fn from_spec(spec: &StepSpec<'_>) -> Result<Arc<dyn Step>, StepError> {
        Ok(Arc::new(Self::new(ChoiceConfig::parse(spec.config)?)))
    }

    fn callback(&self) -> Callback {
        Callback::new(
            CHOICE_CALLBACK,
            json!({"prompt": self.config.prompt, "choices": self.config.choices}),
        )
    }

    fn resolve(&self, answer: &Value) -> Result<String, StepError> {
        let chosen = match answer {
            Value::Number(n) => n
                .as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| self.config.choices.get(i)),
            Value::String(s) => self.config.choices.iter().find(|c| *c == s),
            _ => None,
        };
        chosen
            .cloned()
            .ok_or_else(|| StepError::InvalidInput(format!("not a valid choice: {}", answer)))
    }
}

#[async_trait]
impl Step for ChoiceCollectorStep {
    async fn process(&self, ctx: &StepContext<'_>) -> Result<Action, StepError> {
        match ctx.callback(CHOICE_CALLBACK).and_then(|c| c.input.as_ref()) {
            Some(answer) => Ok(Action::goto(self.resolve(answer)?)),
            None => Ok(Action::send(vec![self.callback()])),
        }
    }
}

/// Outcomes of a choice collector are its configured choices.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChoiceOutcomes;

impl OutcomeProvider for ChoiceOutcomes {
    fn outcomes(&self, config: &Value) -> Result<Vec<String>, StepError> {
        Ok(ChoiceConfig::parse(config)?.choices)
    }
}
