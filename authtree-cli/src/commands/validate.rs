//! `validate`: structural checks plus outcomes nodes can return that nobody wired.

use serde::Serialize;

use authtree::TreeProvider;

use crate::config::{CliConfig, Error};

use super::CliEngine;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnwiredOutcome {
    pub node_id: String,
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateReport {
    pub tree: String,
    pub nodes: usize,
    /// Outcomes that would fail with UnknownOutcome if a step returned them.
    pub unwired: Vec<UnwiredOutcome>,
}

impl ValidateReport {
    pub fn is_fully_wired(&self) -> bool {
        self.unwired.is_empty()
    }
}

/// Builds tree `name` (any structural defect is an error) and lists its unwired outcomes.
pub fn validate(config: &CliConfig, name: &str) -> Result<ValidateReport, Error> {
    let engine = CliEngine::from_config(config);
    validate_with(&engine, config, name)
}

/// Validates every tree in the configured realm's directory, in name order.
pub fn validate_all(config: &CliConfig) -> Result<Vec<ValidateReport>, Error> {
    let engine = CliEngine::from_config(config);
    engine
        .loader
        .tree_names(&config.realm)?
        .iter()
        .map(|name| validate_with(&engine, config, name))
        .collect()
}

fn validate_with(engine: &CliEngine, config: &CliConfig, name: &str) -> Result<ValidateReport, Error> {
    let tree = engine.trees.tree(&config.realm, name)?;
    let unwired = tree
        .unwired_outcomes(&engine.registry)?
        .into_iter()
        .map(|(node_id, outcome)| UnwiredOutcome { node_id, outcome })
        .collect();
    Ok(ValidateReport {
        tree: name.to_string(),
        nodes: tree.len(),
        unwired,
    })
}
