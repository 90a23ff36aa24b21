//! `analyze`: certify the maximum auth level a tree can grant.

use serde::Serialize;

use authtree::TreeProvider;

use crate::config::{CliConfig, Error};

use super::CliEngine;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeReport {
    pub realm: String,
    pub tree: String,
    /// `None` when no path from the entry reaches SUCCESS.
    pub max_auth_level: Option<i32>,
}

/// Loads tree `name` and computes its maximum attainable auth level from the entry.
pub fn analyze(config: &CliConfig, name: &str) -> Result<AnalyzeReport, Error> {
    let engine = CliEngine::from_config(config);
    let tree = engine.trees.tree(&config.realm, name)?;
    let max_auth_level = engine.executor.max_auth_level(&tree, tree.entry_node_id())?;
    tracing::debug!(tree = name, max_auth_level = ?max_auth_level, "analyzed");
    Ok(AnalyzeReport {
        realm: config.realm.clone(),
        tree: name.to_string(),
        max_auth_level,
    })
}
