//! CLI config: tree directory, realm, cache capacity. Filled from env / .env.
//!
//! Interacts with [`RunOptions`](super::RunOptions), the commands in
//! [`commands`](crate::commands) and authtree's [`EngineConfig`].

use std::path::PathBuf;

use authtree::config::DEFAULT_TREE_CACHE_CAPACITY;
use authtree::EngineConfig;

use super::RunOptions;

/// Error type used by config loading and the commands.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Directory used when `AUTHTREE_TREE_DIR` is not set.
pub const DEFAULT_TREE_DIR: &str = "trees";
/// Realm used when `AUTHTREE_REALM` is not set.
pub const DEFAULT_REALM: &str = "root";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliConfig {
    /// Directory holding one sub-directory per realm with `<tree>.json` files.
    pub tree_dir: PathBuf,
    /// Realm commands operate in.
    pub realm: String,
    /// Maximum number of built trees cached; 0 disables caching.
    pub cache_capacity: usize,
    /// When true, steps are wrapped with `LoggingMiddleware` and logs go to debug.
    pub verbose: bool,
}

impl CliConfig {
    /// Fill config from env vars (and .env). Call `dotenv::dotenv().ok()` first.
    ///
    /// `AUTHTREE_TREE_DIR`, `AUTHTREE_REALM` and `AUTHTREE_CACHE_CAPACITY` are optional;
    /// an unparsable capacity is an error rather than silently ignored.
    pub fn from_env() -> Result<Self, Error> {
        let tree_dir = std::env::var("AUTHTREE_TREE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TREE_DIR));
        let realm = std::env::var("AUTHTREE_REALM").unwrap_or_else(|_| DEFAULT_REALM.to_string());
        let cache_capacity = match std::env::var("AUTHTREE_CACHE_CAPACITY") {
            Ok(s) => s.trim().parse().map_err(|_| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("AUTHTREE_CACHE_CAPACITY must be a non-negative integer, got {:?}", s),
                )
            })?,
            Err(_) => DEFAULT_TREE_CACHE_CAPACITY,
        };
        Ok(Self {
            tree_dir,
            realm,
            cache_capacity,
            verbose: false,
        })
    }

    /// Apply optional overrides from `RunOptions` to this config.
    ///
    /// Only set fields in `options` override; `verbose` is always taken from options.
    pub fn apply_options(&mut self, options: &RunOptions) {
        if let Some(dir) = &options.tree_dir {
            self.tree_dir = dir.clone();
        }
        if let Some(realm) = &options.realm {
            self.realm = realm.clone();
        }
        if let Some(capacity) = options.cache_capacity {
            self.cache_capacity = capacity;
        }
        self.verbose = options.verbose;
    }

    /// Engine settings derived from this config.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            tree_cache_capacity: self.cache_capacity,
        }
    }
}
