//! Serializer for suspended tree state (state <-> bytes).
//!
//! Used by whatever stores a suspended attempt between `process` calls (session
//! store, CLI state file). Transient state never reaches the bytes.

use thiserror::Error;

use super::TreeState;

/// Error when encoding or decoding persisted tree state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state serialization failed: {0}")]
    Serialization(String),
}

/// Serializes and deserializes [`TreeState`] for storage across a suspend.
pub trait StateSerializer: Send + Sync {
    fn serialize(&self, state: &TreeState) -> Result<Vec<u8>, StateError>;
    fn deserialize(&self, bytes: &[u8]) -> Result<TreeState, StateError>;
}

/// JSON serializer producing the flat persisted document.
pub struct JsonStateSerializer;

impl StateSerializer for JsonStateSerializer {
    fn serialize(&self, state: &TreeState) -> Result<Vec<u8>, StateError> {
        serde_json::to_vec_pretty(state).map_err(|e| StateError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<TreeState, StateError> {
        serde_json::from_slice(bytes).map_err(|e| StateError::Serialization(e.to_string()))
    }
}
