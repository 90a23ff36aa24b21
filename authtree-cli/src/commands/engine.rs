use std::sync::Arc;

use authtree::steps::builtin_registry;
use authtree::{StepRegistry, TreeExecutor, TreeService};

use crate::config::CliConfig;
use crate::loader::DirectoryTreeLoader;
use crate::middleware::LoggingMiddleware;

/// Engine wired for one CLI invocation: directory loader, built-in steps, tree cache.
///
/// Verbose configs wrap every step with [`LoggingMiddleware`].
pub struct CliEngine {
    pub loader: Arc<DirectoryTreeLoader>,
    pub registry: Arc<StepRegistry>,
    pub trees: Arc<TreeService>,
    pub executor: TreeExecutor,
}

impl CliEngine {
    pub fn from_config(config: &CliConfig) -> Self {
        let loader = Arc::new(DirectoryTreeLoader::new(&config.tree_dir));
        let registry = Arc::new(builtin_registry());
        let trees = Arc::new(TreeService::new(loader.clone(), &config.engine_config()));
        let mut executor = TreeExecutor::new(Arc::clone(&registry), trees.clone());
        if config.verbose {
            executor = executor.with_middleware(Arc::new(LoggingMiddleware));
        }
        Self {
            loader,
            registry,
            trees,
            executor,
        }
    }
}
