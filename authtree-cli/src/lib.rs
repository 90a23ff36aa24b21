//! authtree-cli library: the commands behind the `authtree` binary.
//!
//! Reads settings from env / .env ([`CliConfig::from_env`]), loads tree definitions
//! from a directory of JSON files and runs the engine's analyzer or executor.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), authtree_cli::Error> {
//! use authtree_cli::{analyze, CliConfig};
//!
//! dotenv::dotenv().ok();
//! let config = CliConfig::from_env()?;
//! let report = analyze(&config, "login")?;
//! println!("{:?}", report.max_auth_level);
//! # Ok(())
//! # }
//! ```

mod cli;
mod commands;
mod config;
mod loader;
mod middleware;

pub use cli::{Cli, Command};
pub use commands::{
    analyze, run, validate, validate_all, AnalyzeReport, CliEngine, RunReport, RunRequest,
    UnwiredOutcome, ValidateReport,
};
pub use config::{CliConfig, Error, RunOptions};
pub use loader::DirectoryTreeLoader;
pub use middleware::LoggingMiddleware;

#[cfg(test)]
mod tests;
