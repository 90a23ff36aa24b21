//! Logging middleware that records step enter/exit around each `Step::process` call.

use async_trait::async_trait;
use tracing::{info, warn};

use authtree::{Action, GraphNode, Step, StepContext, StepError, StepMiddleware};

/// Middleware that logs step enter/exit around each step invocation.
///
/// Emits `tracing` events (the binary writes them to stderr) so the JSON report on
/// stdout can be redirected separately.
pub struct LoggingMiddleware;

#[async_trait]
impl StepMiddleware for LoggingMiddleware {
    async fn around_process(
        &self,
        node: &GraphNode,
        step: &dyn Step,
        ctx: &StepContext<'_>,
    ) -> Result<Action, StepError> {
        info!(
            tree = ctx.tree_name,
            node_id = %node.id,
            node_type = %node.node_type,
            callbacks = ctx.callbacks.len(),
            "step enter"
        );
        let result = step.process(ctx).await;
        match &result {
            Ok(action) if action.sends_callbacks() => info!(
                node_id = %node.id,
                callbacks = action.callbacks.len(),
                "step exit: needs input"
            ),
            Ok(action) => info!(
                node_id = %node.id,
                outcome = action.outcome.as_deref().unwrap_or(""),
                "step exit"
            ),
            Err(e) => warn!(node_id = %node.id, error = %e, "step exit: failed"),
        }
        result
    }
}
