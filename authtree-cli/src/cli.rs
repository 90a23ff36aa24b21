//! Command-line arguments of the `authtree` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::RunOptions;

#[derive(Parser, Debug)]
#[command(name = "authtree")]
#[command(about = "Analyze, validate and step through authentication trees")]
pub struct Cli {
    /// Directory with `<realm>/<tree>.json` definitions (env: AUTHTREE_TREE_DIR).
    #[arg(long, global = true, value_name = "DIR")]
    pub tree_dir: Option<PathBuf>,

    /// Realm to look trees up in (env: AUTHTREE_REALM).
    #[arg(long, global = true)]
    pub realm: Option<String>,

    /// Built-tree cache capacity (env: AUTHTREE_CACHE_CAPACITY).
    #[arg(long, global = true, value_name = "N")]
    pub cache_capacity: Option<usize>,

    /// Log step enter/exit and engine debug events to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the maximum auth level a tree can grant.
    Analyze {
        tree: String,
    },
    /// Check a tree (or every tree in the realm) for unwired outcomes.
    Validate {
        /// Tree to check; all trees of the realm when omitted.
        tree: Option<String>,
    },
    /// Run one step of an attempt, keeping its state in a file between runs.
    Run {
        tree: String,
        /// State file; created on suspend, removed when the attempt finishes.
        #[arg(long, value_name = "FILE")]
        state: PathBuf,
        /// JSON array of answered callbacks.
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
        /// Auth level a new attempt must reach.
        #[arg(long, value_name = "LEVEL")]
        target_level: Option<i32>,
    },
}

impl Cli {
    /// Overrides carried by the global flags.
    pub fn options(&self) -> RunOptions {
        RunOptions {
            tree_dir: self.tree_dir.clone(),
            realm: self.realm.clone(),
            cache_capacity: self.cache_capacity,
            verbose: self.verbose,
        }
    }
}
