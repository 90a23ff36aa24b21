//! Engine configuration.

/// Default number of built trees kept in the tree cache.
pub const DEFAULT_TREE_CACHE_CAPACITY: usize = 256;

/// Settings for the engine's shared services.
///
/// **Interaction**: Passed to `TreeService::new`; filled by embedders (the CLI reads
/// it from env).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of built trees cached; 0 disables caching.
    pub tree_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tree_cache_capacity: DEFAULT_TREE_CACHE_CAPACITY,
        }
    }
}
