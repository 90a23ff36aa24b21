//! Step middleware: wraps every step invocation made by the executor.

use async_trait::async_trait;

use crate::error::StepError;
use crate::tree::GraphNode;

use super::{Action, Step, StepContext};

/// Around-advice for `Step::process` (logging, timing, tracing spans).
///
/// Implementations must call `step.process(ctx)` exactly once and return its result
/// (possibly after observing it); the executor does not retry.
#[async_trait]
pub trait StepMiddleware: Send + Sync {
    async fn around_process(
        &self,
        node: &GraphNode,
        step: &dyn Step,
        ctx: &StepContext<'_>,
    ) -> Result<Action, StepError>;
}
