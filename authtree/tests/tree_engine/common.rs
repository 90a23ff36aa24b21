//! Shared fixtures: a registry with the built-ins plus two plain steps, and an
//! executor over an in-memory loader.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use authtree::steps::register_builtin_steps;
use authtree::{
    Action, Edge, EngineConfig, GraphNode, InMemoryTreeLoader, StaticOutcomes, Step,
    StepContext, StepError, StepRegistry, StepSpec, Tree, TreeDefinition, TreeExecutor,
    TreeService,
};

/// Always returns "next".
pub struct Noop;

#[async_trait]
impl Step for Noop {
    async fn process(&self, _ctx: &StepContext<'_>) -> Result<Action, StepError> {
        Ok(Action::goto("next"))
    }
}

/// Returns the `outcome` from its config ("true" when unset).
pub struct Decide(String);

#[async_trait]
impl Step for Decide {
    async fn process(&self, _ctx: &StepContext<'_>) -> Result<Action, StepError> {
        Ok(Action::goto(self.0.clone()))
    }
}

/// Writes `remembered` into transient state; outcome "next".
pub struct Remember;

#[async_trait]
impl Step for Remember {
    async fn process(&self, ctx: &StepContext<'_>) -> Result<Action, StepError> {
        let mut transient = ctx.transient_state.clone();
        transient.insert("remembered".into(), Value::from(ctx.node_id));
        Ok(Action::goto("next").with_transient_state(transient))
    }
}

/// "true" when transient state holds `remembered`, else "false".
pub struct Recall;

#[async_trait]
impl Step for Recall {
    async fn process(&self, ctx: &StepContext<'_>) -> Result<Action, StepError> {
        let found = ctx.transient_state.contains_key("remembered");
        Ok(Action::goto(if found { "true" } else { "false" }))
    }
}

pub fn registry() -> StepRegistry {
    let mut registry = StepRegistry::new();
    register_builtin_steps(&mut registry);
    registry
        .register("Noop", StaticOutcomes::new(["next"]), |_: &StepSpec<'_>| {
            Ok(Arc::new(Noop) as Arc<dyn Step>)
        })
        .register(
            "Decide",
            StaticOutcomes::new(["true", "false"]),
            |spec: &StepSpec<'_>| {
                let outcome = spec.config["outcome"].as_str().unwrap_or("true");
                Ok(Arc::new(Decide(outcome.to_string())) as Arc<dyn Step>)
            },
        )
        .register("Remember", StaticOutcomes::new(["next"]), |_: &StepSpec<'_>| {
            Ok(Arc::new(Remember) as Arc<dyn Step>)
        })
        .register(
            "Recall",
            StaticOutcomes::new(["true", "false"]),
            |_: &StepSpec<'_>| Ok(Arc::new(Recall) as Arc<dyn Step>),
        );
    registry
}

/// Engine fixture: the loader stays reachable so tests can add or change trees.
pub struct Engine {
    pub loader: Arc<InMemoryTreeLoader>,
    pub trees: Arc<TreeService>,
    pub executor: TreeExecutor,
}

impl Engine {
    pub fn new() -> Self {
        let loader = Arc::new(InMemoryTreeLoader::new());
        let trees = Arc::new(TreeService::new(loader.clone(), &EngineConfig::default()));
        let executor = TreeExecutor::new(Arc::new(registry()), trees.clone());
        Self {
            loader,
            trees,
            executor,
        }
    }

    /// Registers `definition` with the loader.
    pub fn add(&self, definition: TreeDefinition) -> &Self {
        self.loader.insert(definition);
        self
    }
}

/// Node shorthand: `(id, type, config)`.
pub type NodeSpec<'a> = (&'a str, &'a str, Value);

pub fn definition(
    name: &str,
    entry: &str,
    nodes: Vec<NodeSpec<'_>>,
    edges: &[(&str, &str, &str)],
) -> TreeDefinition {
    TreeDefinition {
        name: name.to_string(),
        realm: "root".to_string(),
        entry_node_id: entry.to_string(),
        nodes: nodes
            .into_iter()
            .map(|(id, node_type, config)| GraphNode::new(id, node_type, id).with_config(config))
            .collect(),
        edges: edges
            .iter()
            .map(|(s, o, d)| Edge::new(*s, *o, *d))
            .collect(),
    }
}

/// Builds `definition` into a tree, panicking on structural errors.
pub fn build(definition: TreeDefinition) -> Tree {
    Tree::from_definition(definition).expect("fixture tree is well formed")
}
