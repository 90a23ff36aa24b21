//! Built-in step types.
//!
//! [`register_builtin_steps`] adds them to a registry; embedders register their own
//! types next to these.

mod choice;
mod increment;
mod inner_tree;

use crate::step::{StaticOutcomes, StepRegistry, StepSpec};

pub use choice::{ChoiceCollectorStep, ChoiceConfig, ChoiceOutcomes, CHOICE_CALLBACK, CHOICE_COLLECTOR};
pub use increment::{AuthLevelIncrementStep, AUTH_LEVEL_INCREMENT};
pub use inner_tree::{position_key, InnerTreeStep, FALSE_OUTCOME, INNER_TREE_EVALUATOR, TRUE_OUTCOME};

/// Registers `AuthLevelIncrement`, `InnerTreeEvaluator` and `ChoiceCollector`.
pub fn register_builtin_steps(registry: &mut StepRegistry) -> &mut StepRegistry {
    registry
        .register(
            AUTH_LEVEL_INCREMENT,
            StaticOutcomes::new([increment::OUTCOME]),
            |spec: &StepSpec<'_>| AuthLevelIncrementStep::from_spec(spec),
        )
        .register(
            INNER_TREE_EVALUATOR,
            StaticOutcomes::new([TRUE_OUTCOME, FALSE_OUTCOME]),
            |spec: &StepSpec<'_>| InnerTreeStep::from_spec(spec),
        )
        .register(CHOICE_COLLECTOR, ChoiceOutcomes, |spec: &StepSpec<'_>| {
            ChoiceCollectorStep::from_spec(spec)
        })
}

/// Registry holding only the built-in steps.
pub fn builtin_registry() -> StepRegistry {
    let mut registry = StepRegistry::new();
    register_builtin_steps(&mut registry);
    registry
}
