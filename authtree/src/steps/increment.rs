//! `AuthLevelIncrement`: raises the attempt's auth level by a configured amount.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StepError;
use crate::state::AUTH_LEVEL_KEY;
use crate::step::{Action, LevelContribution, Step, StepContext, StepSpec};

/// Registered type name.
pub const AUTH_LEVEL_INCREMENT: &str = "AuthLevelIncrement";
/// The single outcome of the step.
pub const OUTCOME: &str = "outcome";

/// Adds `increment` to shared `authLevel` and continues.
#[derive(Debug, Clone)]
pub struct AuthLevelIncrementStep {
    increment: i32,
}

impl AuthLevelIncrementStep {
    pub fn new(increment: i32) -> Self {
        Self { increment }
    }

    /// Reads `{"increment": N}` from the node's config.
    pub fn from_spec(spec: &StepSpec<'_>) -> Result<Arc<dyn Step>, StepError> {
        let increment = spec
            .config
            .get("increment")
            .and_then(Value::as_i64)
            .and_then(|n| i32::try_from(n).ok())
            .ok_or_else(|| {
                StepError::InvalidConfig(format!(
                    "node {}: \"increment\" must be a 32-bit integer",
                    spec.node_id
                ))
            })?;
        Ok(Arc::new(Self::new(increment)))
    }
}

#[async_trait]
impl Step for AuthLevelIncrementStep {
    async fn process(&self, ctx: &StepContext<'_>) -> Result<Action, StepError> {
        let current = ctx
            .shared_state
            .get(AUTH_LEVEL_KEY)
            .and_then(Value::as_i64)
            .unwrap_or(0);
        let mut shared = ctx.shared_state.clone();
        shared.insert(
            AUTH_LEVEL_KEY.into(),
            Value::from(current.saturating_add(i64::from(self.increment))),
        );
        Ok(Action::goto(OUTCOME).with_shared_state(shared))
    }

    fn level_contribution(&self) -> LevelContribution {
        LevelContribution::Increment(self.increment)
    }
}
