//! Tree lookup: loader contract, built-tree cache and the provider the engine reads.
//!
//! A [`TreeLoader`] supplies [`TreeDefinition`]s from configuration; [`TreeService`]
//! builds them into `Arc<Tree>`, caches them and serves them through [`TreeProvider`].
//! Each executor call re-fetches its tree through the provider, so invalidating an
//! entry takes effect on the next call.

mod cache;

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::error::NodeProcessError;
use crate::tree::logging::log_tree_built;
use crate::tree::{Tree, TreeDefinition};

pub use cache::TreeCache;

/// Error raised by a [`TreeLoader`].
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Source of tree definitions (configuration store, files, ...).
pub trait TreeLoader: Send + Sync {
    /// Definition of tree `name` in `realm`; `Ok(None)` when it does not exist.
    fn load(&self, realm: &str, name: &str) -> Result<Option<TreeDefinition>, LoaderError>;
}

/// Resolves built trees by name. Implemented by [`TreeService`].
pub trait TreeProvider: Send + Sync {
    fn tree(&self, realm: &str, name: &str) -> Result<Arc<Tree>, NodeProcessError>;
}

/// Loader over definitions held in memory; for tests and embedding.
#[derive(Default)]
pub struct InMemoryTreeLoader {
    definitions: DashMap<(String, String), TreeDefinition>,
}

impl InMemoryTreeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a definition (keyed by its realm and name).
    pub fn insert(&self, definition: TreeDefinition) {
        self.definitions.insert(
            (definition.realm.clone(), definition.name.clone()),
            definition,
        );
    }

    pub fn remove(&self, realm: &str, name: &str) -> Option<TreeDefinition> {
        self.definitions
            .remove(&(realm.to_string(), name.to_string()))
            .map(|(_, d)| d)
    }
}

impl TreeLoader for InMemoryTreeLoader {
    fn load(&self, realm: &str, name: &str) -> Result<Option<TreeDefinition>, LoaderError> {
        Ok(self
            .definitions
            .get(&(realm.to_string(), name.to_string()))
            .map(|d| d.clone()))
    }
}

/// Cached tree lookup over a [`TreeLoader`].
///
/// **Interaction**: Given to `TreeExecutor` as its `TreeProvider`; used by the analyzer
/// to resolve inner trees and by `process_named` to re-fetch the current tree.
pub struct TreeService {
    loader: Arc<dyn TreeLoader>,
    cache: TreeCache,
}

impl TreeService {
    pub fn new(loader: Arc<dyn TreeLoader>, config: &EngineConfig) -> Self {
        Self {
            loader,
            cache: TreeCache::new(config.tree_cache_capacity),
        }
    }

    /// Drops the cached tree; the next lookup reloads and rebuilds it.
    pub fn invalidate(&self, realm: &str, name: &str) -> bool {
        self.cache.invalidate(realm, name)
    }

    pub fn invalidate_all(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &TreeCache {
        &self.cache
    }

    fn load_and_build(&self, realm: &str, name: &str) -> Result<Arc<Tree>, NodeProcessError> {
        let definition = self
            .loader
            .load(realm, name)
            .map_err(|e| NodeProcessError::TreeLoad {
                realm: realm.to_string(),
                name: name.to_string(),
                message: e.to_string(),
            })?
            .ok_or_else(|| NodeProcessError::TreeNotFound {
                realm: realm.to_string(),
                name: name.to_string(),
            })?;
        let tree = Arc::new(Tree::from_definition(definition)?);
        log_tree_built(tree.realm(), tree.name(), tree.len());
        Ok(tree)
    }
}

impl TreeProvider for TreeService {
    fn tree(&self, realm: &str, name: &str) -> Result<Arc<Tree>, NodeProcessError> {
        if let Some(tree) = self.cache.get(realm, name) {
            return Ok(tree);
        }
        let tree = self.load_and_build(realm, name)?;
        if tree.realm() == realm && tree.name() == name {
            self.cache.insert(Arc::clone(&tree));
        }
        Ok(tree)
    }
}
