//! `run`: one `process` call with the attempt's state persisted in a file between calls.
//!
//! A missing state file starts a new attempt. A suspended attempt writes its state back;
//! a finished one removes the file so the next run starts over.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use authtree::{
    Callback, ExternalRequest, JsonStateSerializer, Outcome, StateSerializer, TreeState,
};

use crate::config::{CliConfig, Error};

use super::CliEngine;

/// Inputs of one `run` invocation.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub tree: String,
    /// Where the suspended attempt's state is kept.
    pub state_file: PathBuf,
    /// JSON array of answered callbacks for the node that suspended last.
    pub input_file: Option<PathBuf>,
    /// Auth level a new attempt must reach; ignored when resuming.
    pub target_level: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub callbacks: Vec<Callback>,
    pub current_node_id: Option<String>,
    pub auth_level: i32,
    pub session_properties: BTreeMap<String, String>,
}

pub async fn run(config: &CliConfig, request: &RunRequest) -> Result<RunReport, Error> {
    let engine = CliEngine::from_config(config);
    let serializer = JsonStateSerializer;

    let state = if request.state_file.exists() {
        let bytes = std::fs::read(&request.state_file)?;
        serializer.deserialize(&bytes)?
    } else {
        TreeState::initial(&config.realm, request.target_level)
    };
    let input: Vec<Callback> = match &request.input_file {
        Some(path) => serde_json::from_slice(&std::fs::read(path)?)?,
        None => Vec::new(),
    };

    let result = engine
        .executor
        .process_named(
            &config.realm,
            &request.tree,
            state,
            input,
            &ExternalRequest::default(),
        )
        .await?;

    if result.outcome() == Outcome::NeedsInput {
        std::fs::write(&request.state_file, serializer.serialize(result.state())?)?;
    } else if request.state_file.exists() {
        std::fs::remove_file(&request.state_file)?;
    }

    let state = result.state();
    Ok(RunReport {
        outcome: result.outcome(),
        callbacks: result.callbacks().to_vec(),
        current_node_id: state.current_node_id().map(str::to_string),
        auth_level: state.auth_level(),
        session_properties: state.session_properties().clone(),
    })
}
