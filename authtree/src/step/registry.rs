//! Step registry: step type name -> factory + outcome provider.
//!
//! Populated once at startup (`register`), then read concurrently by every
//! executor and analyzer. Replaces runtime class lookup with a table of factories.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{NodeProcessError, StepError};
use crate::tree::Tree;

use super::{OutcomeProvider, Step};

static NO_CONFIG: Value = Value::Null;

/// What a factory is told about the node it builds a step for.
#[derive(Debug, Clone, Copy)]
pub struct StepSpec<'a> {
    pub node_id: &'a str,
    pub node_type: &'a str,
    pub realm: &'a str,
    pub tree_name: &'a str,
    /// The node's declared configuration; `null` when it has none.
    pub config: &'a Value,
}

/// Builds a step instance for one node.
pub trait StepFactory: Send + Sync {
    fn create(&self, spec: &StepSpec<'_>) -> Result<Arc<dyn Step>, StepError>;
}

impl<F> StepFactory for F
where
    F: Fn(&StepSpec<'_>) -> Result<Arc<dyn Step>, StepError> + Send + Sync,
{
    fn create(&self, spec: &StepSpec<'_>) -> Result<Arc<dyn Step>, StepError> {
        self(spec)
    }
}

#[derive(Clone)]
struct Registration {
    factory: Arc<dyn StepFactory>,
    outcomes: Arc<dyn OutcomeProvider>,
}

/// Table of known step types.
///
/// **Interaction**: Filled by `register_builtin_steps` and by embedders; consumed by
/// `TreeExecutor` (create per node) and the visitor's lazy step construction.
#[derive(Clone, Default)]
pub struct StepRegistry {
    steps: HashMap<String, Registration>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a step type with its outcome provider and a factory closure.
    /// Replaces any earlier registration of the same name.
    pub fn register<P, F>(&mut self, node_type: impl Into<String>, outcomes: P, factory: F) -> &mut Self
    where
        P: OutcomeProvider + 'static,
        F: Fn(&StepSpec<'_>) -> Result<Arc<dyn Step>, StepError> + Send + Sync + 'static,
    {
        self.register_factory(node_type, Arc::new(outcomes), Arc::new(factory))
    }

    /// Registers a step type with shared factory and outcome provider handles.
    pub fn register_factory(
        &mut self,
        node_type: impl Into<String>,
        outcomes: Arc<dyn OutcomeProvider>,
        factory: Arc<dyn StepFactory>,
    ) -> &mut Self {
        self.steps
            .insert(node_type.into(), Registration { factory, outcomes });
        self
    }

    pub fn is_known_type(&self, node_type: &str) -> bool {
        self.steps.contains_key(node_type)
    }

    /// Registered type names, sorted.
    pub fn step_types(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.steps.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Creates the step for node `node_id` of `tree`, passing the node's config to the factory.
    ///
    /// Unknown types fail with `UnknownStepType`; factory errors are wrapped as
    /// `StepExecution` for the node.
    pub fn create_step(
        &self,
        node_type: &str,
        node_id: &str,
        realm: &str,
        tree: &Tree,
    ) -> Result<Arc<dyn Step>, NodeProcessError> {
        let registration = self
            .steps
            .get(node_type)
            .ok_or_else(|| NodeProcessError::UnknownStepType(node_type.to_string()))?;
        let config = tree.node(node_id).map(|n| &n.config).unwrap_or(&NO_CONFIG);
        let spec = StepSpec {
            node_id,
            node_type,
            realm,
            tree_name: tree.name(),
            config,
        };
        registration
            .factory
            .create(&spec)
            .map_err(|source| NodeProcessError::StepExecution {
                node_id: node_id.to_string(),
                node_type: node_type.to_string(),
                source,
            })
    }

    /// Outcome provider for `node_type`.
    pub fn outcome_provider_for(
        &self,
        node_type: &str,
    ) -> Result<Arc<dyn OutcomeProvider>, NodeProcessError> {
        self.steps
            .get(node_type)
            .map(|r| Arc::clone(&r.outcomes))
            .ok_or_else(|| NodeProcessError::UnknownStepType(node_type.to_string()))
    }
}
