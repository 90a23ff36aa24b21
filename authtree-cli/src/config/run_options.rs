//! Optional overrides for a CLI invocation (command-line flags or programmatic).
//!
//! Used by [`CliConfig::apply_options`](super::CliConfig::apply_options). Callers (the
//! binary or tests) build a `RunOptions` and apply it on top of the env-based config.

use std::path::PathBuf;

/// Optional overrides: tree directory, realm, cache capacity, verbosity.
///
/// All fields are optional; only set fields override the base config (from env).
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Directory holding `<realm>/<tree>.json` definitions.
    pub tree_dir: Option<PathBuf>,
    /// Realm the trees are looked up in.
    pub realm: Option<String>,
    /// Override the built-tree cache capacity.
    pub cache_capacity: Option<usize>,
    /// Log step enter/exit and engine debug output to stderr.
    pub verbose: bool,
}
