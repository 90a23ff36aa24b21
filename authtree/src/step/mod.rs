//! Steps: the polymorphic units a tree node runs, and how they are created.
//!
//! A [`Step`] implements one `process(context) -> Action` capability. The engine
//! never looks at a step's concrete type; it creates steps through the
//! [`StepRegistry`] by node type name and, for analysis, asks each step for its
//! [`LevelContribution`].

mod action;
mod context;
mod middleware;
mod registry;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StepError;

pub use action::Action;
pub use context::{ExternalRequest, StepContext};
pub use middleware::StepMiddleware;
pub use registry::{StepFactory, StepRegistry, StepSpec};

/// What a step declares about the auth level it grants, for static analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelContribution {
    /// Ordinary step; grants nothing.
    None,
    /// Raises the auth level by the given amount when passed through.
    Increment(i32),
    /// Evaluates the named inner tree (same realm).
    InnerTree(String),
}

/// One unit of authentication work.
///
/// `process` returns an [`Action`] naming an outcome label (never a node id) or
/// carrying callbacks to suspend on. Errors are wrapped by the executor with the
/// node id and type.
#[async_trait]
pub trait Step: Send + Sync {
    async fn process(&self, ctx: &StepContext<'_>) -> Result<Action, StepError>;

    /// Auth level effect used by the analyzer. Defaults to none.
    fn level_contribution(&self) -> LevelContribution {
        LevelContribution::None
    }
}

/// Lists the outcome labels a step type can return for a given node configuration.
pub trait OutcomeProvider: Send + Sync {
    fn outcomes(&self, config: &Value) -> Result<Vec<String>, StepError>;
}

/// Outcome provider for step types with a fixed set of outcomes.
#[derive(Debug, Clone)]
pub struct StaticOutcomes(pub Vec<String>);

impl StaticOutcomes {
    pub fn new<I, S>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(outcomes.into_iter().map(Into::into).collect())
    }
}

impl OutcomeProvider for StaticOutcomes {
    fn outcomes(&self, _config: &Value) -> Result<Vec<String>, StepError> {
        Ok(self.0.clone())
    }
}
