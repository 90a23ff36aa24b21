//! Tree executor: advances an attempt through a tree until it suspends or terminates.
//!
//! One `process` call resumes at the state's current node (or the entry), runs steps
//! and follows their outcome edges in a loop. Intermediate nodes are invisible to the
//! caller; only the suspend or terminal boundary is returned.

use std::sync::Arc;

use crate::error::{NodeProcessError, StepError};
use crate::service::TreeProvider;
use crate::state::{Callback, JsonObject, Outcome, TreeResult, TreeState};
use crate::step::{ExternalRequest, StepContext, StepMiddleware, StepRegistry};
use crate::tree::logging::{
    log_process_error, log_process_start, log_step_complete, log_step_start, log_suspend,
    log_terminal,
};
use crate::tree::{MalformedGraphError, Tree, FAILURE, SUCCESS};
use crate::visitor::AuthLevelAnalyzer;

/// Result of an inner tree run through [`TreeExecutor::process_inner`].
///
/// `transient_state` is the inner run's transient state at the boundary; empty when
/// the inner tree suspended.
#[derive(Debug, Clone, PartialEq)]
pub struct InnerTreeResult {
    pub result: TreeResult,
    pub transient_state: JsonObject,
}

/// Runs authentication trees.
///
/// Holds the step registry, the tree provider (inner trees, named lookups and level
/// analysis) and an optional step middleware. Stateless between calls: every attempt's
/// state travels in the `TreeState` passed in and returned.
///
/// **Interaction**: Creates steps through `StepRegistry`; runs `AuthLevelAnalyzer`
/// before each step when the attempt has a target level; consumes and produces
/// `TreeState`.
pub struct TreeExecutor {
    registry: Arc<StepRegistry>,
    trees: Arc<dyn TreeProvider>,
    middleware: Option<Arc<dyn StepMiddleware>>,
}

impl TreeExecutor {
    pub fn new(registry: Arc<StepRegistry>, trees: Arc<dyn TreeProvider>) -> Self {
        Self {
            registry,
            trees,
            middleware: None,
        }
    }

    /// Wraps every step invocation with `middleware`.
    pub fn with_middleware(self, middleware: Arc<dyn StepMiddleware>) -> Self {
        Self {
            middleware: Some(middleware),
            ..self
        }
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    pub fn trees(&self) -> &dyn TreeProvider {
        self.trees.as_ref()
    }

    /// Processes `tree` from `state` until it suspends or reaches a sentinel.
    ///
    /// `input` are the callbacks answered by the caller for the node that suspended
    /// last; only that node sees them. On error nothing is returned but the error;
    /// the caller's previous `TreeState` remains the committed one.
    pub async fn process(
        &self,
        realm: &str,
        tree: &Tree,
        state: TreeState,
        input: Vec<Callback>,
        request: &ExternalRequest,
    ) -> Result<TreeResult, NodeProcessError> {
        self.run_logged(realm, tree, state, input, request, &[])
            .await
            .map(|(result, _)| result)
    }

    /// Fetches the current definition of tree `name` and processes it.
    pub async fn process_named(
        &self,
        realm: &str,
        name: &str,
        state: TreeState,
        input: Vec<Callback>,
        request: &ExternalRequest,
    ) -> Result<TreeResult, NodeProcessError> {
        let tree = self.trees.tree(realm, name)?;
        self.process(realm, &tree, state, input, request).await
    }

    /// Processes inner tree `name` on behalf of the step running in `ctx`.
    ///
    /// Fails with `InnerTreeCycle` when `name` is already being processed around the
    /// calling node, directly or through other inner trees.
    pub async fn process_inner(
        &self,
        ctx: &StepContext<'_>,
        name: &str,
        state: TreeState,
        input: Vec<Callback>,
    ) -> Result<InnerTreeResult, NodeProcessError> {
        if ctx.tree_stack().iter().any(|t| t == name) {
            return Err(MalformedGraphError::InnerTreeCycle(name.to_string()).into());
        }
        let tree = self.trees.tree(ctx.realm, name)?;
        let (result, transient_state) = self
            .run_logged(ctx.realm, &tree, state, input, ctx.request, ctx.tree_stack())
            .await?;
        Ok(InnerTreeResult {
            result,
            transient_state,
        })
    }

    /// Maximum auth level attainable from `start_id` in `tree`.
    pub fn max_auth_level(
        &self,
        tree: &Tree,
        start_id: &str,
    ) -> Result<Option<i32>, NodeProcessError> {
        AuthLevelAnalyzer::new(&self.registry, self.trees.as_ref()).analyze(tree, start_id)
    }

    async fn run_logged(
        &self,
        realm: &str,
        tree: &Tree,
        state: TreeState,
        input: Vec<Callback>,
        request: &ExternalRequest,
        enclosing: &[String],
    ) -> Result<(TreeResult, JsonObject), NodeProcessError> {
        log_process_start(tree.name(), state.current_node_id());
        let result = self
            .run_loop(realm, tree, state, input, request, enclosing)
            .await;
        match &result {
            Ok((r, _)) if r.outcome() != Outcome::NeedsInput => {
                log_terminal(tree.name(), r.outcome())
            }
            Ok(_) => {}
            Err(e) => log_process_error(tree.name(), e),
        }
        result
    }

    /// Returns the boundary result plus the transient state it was reached with.
    async fn run_loop(
        &self,
        realm: &str,
        tree: &Tree,
        state: TreeState,
        input: Vec<Callback>,
        request: &ExternalRequest,
        enclosing: &[String],
    ) -> Result<(TreeResult, JsonObject), NodeProcessError> {
        let mut state = state;
        let mut input = input;
        let mut tree_stack = enclosing.to_vec();
        tree_stack.push(tree.name().to_string());
        let mut node_id = state
            .current_node_id()
            .unwrap_or_else(|| tree.entry_node_id())
            .to_string();

        loop {
            if node_id == SUCCESS || node_id == FAILURE {
                let transient = state.transient_state().clone();
                return Ok((TreeResult::complete(state, node_id == SUCCESS), transient));
            }

            self.check_level_reachable(tree, &node_id, &state)?;

            let node = tree
                .node(&node_id)
                .ok_or_else(|| MalformedGraphError::NodeNotFound(node_id.clone()))?;
            let step = self
                .registry
                .create_step(&node.node_type, &node.id, realm, tree)?;

            log_step_start(&node.id, &node.node_type);
            let action = {
                let ctx = StepContext::new(
                    realm,
                    tree.name(),
                    &node.id,
                    state.shared_state(),
                    state.transient_state(),
                    request,
                    &input,
                    &tree_stack,
                    self,
                );
                match &self.middleware {
                    Some(middleware) => middleware.around_process(node, step.as_ref(), &ctx).await,
                    None => step.process(&ctx).await,
                }
            }
            .map_err(|source| NodeProcessError::StepExecution {
                node_id: node.id.clone(),
                node_type: node.node_type.clone(),
                source,
            })?;
            input.clear();

            let (next_state, outcome, callbacks) = state.apply_action(&node.id, action);
            state = next_state;

            if !callbacks.is_empty() {
                log_suspend(&node.id, callbacks.len());
                return Ok((TreeResult::suspended(state, callbacks), JsonObject::new()));
            }

            let outcome = outcome.ok_or_else(|| NodeProcessError::StepExecution {
                node_id: node.id.clone(),
                node_type: node.node_type.clone(),
                source: StepError::NoOutcome,
            })?;
            let next = tree.next_node(&node.id, &outcome)?;
            log_step_complete(&node.id, &outcome, next);
            node_id = next.to_string();
        }
    }

    /// Fails fast when the attempt's target level cannot be met from `node_id`.
    fn check_level_reachable(
        &self,
        tree: &Tree,
        node_id: &str,
        state: &TreeState,
    ) -> Result<(), NodeProcessError> {
        let Some(target) = state.target_auth_level() else {
            return Ok(());
        };
        let current = state.auth_level();
        let max_attainable = self.max_auth_level(tree, node_id)?;
        let reachable = max_attainable
            .map(|max| current.saturating_add(max) >= target)
            .unwrap_or(false);
        if reachable {
            Ok(())
        } else {
            Err(NodeProcessError::LevelUnreachable {
                node_id: node_id.to_string(),
                target,
                current,
                max_attainable,
            })
        }
    }
}
