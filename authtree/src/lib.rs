//! # authtree
//!
//! Authentication tree engine. A tree is a directed graph of steps (username
//! collection, password check, OTP, ...) wired by outcome labels and ending in one of
//! two sentinel nodes, SUCCESS and FAILURE. The engine builds and validates trees,
//! computes the maximum auth level a tree can grant without running it, and executes
//! an attempt step by step, suspending whenever a step needs user input.
//!
//! ## Design Principles
//!
//! - **Immutable trees**: a built [`Tree`] is validated once and shared as `Arc<Tree>`
//!   by any number of concurrent attempts.
//! - **State-in, state-out**: [`TreeExecutor::process`] takes the attempt's
//!   [`TreeState`] by value and returns a new one; an error leaves the caller's
//!   committed state untouched.
//! - **Steps are opaque**: the engine only knows the [`Step`] trait and creates steps by
//!   type name through the [`StepRegistry`].
//!
//! ## Main Modules
//!
//! - [`tree`]: `Tree`, `TreeBuilder`, `TreeDefinition`, sentinels, structural validation.
//! - [`step`]: `Step`, `Action`, `StepContext`, `StepRegistry`, `StepMiddleware`.
//! - [`visitor`]: cycle-safe traversal and the `AuthLevelAnalyzer`.
//! - [`executor`]: `TreeExecutor`, the suspend/resume state machine.
//! - [`state`]: `TreeState`, `TreeResult`, `Outcome`, `Callback`, state serializers.
//! - [`service`]: `TreeLoader`, `TreeService` and the built-tree cache.
//! - [`steps`]: built-in step types.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use authtree::steps::builtin_registry;
//! use authtree::{
//!     EngineConfig, ExternalRequest, GraphNode, InMemoryTreeLoader, Outcome, TreeBuilder,
//!     TreeExecutor, TreeService, TreeState, SUCCESS,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut builder = TreeBuilder::new("login", "root");
//! builder
//!     .set_entry("level")
//!     .add_node(
//!         GraphNode::new("level", "AuthLevelIncrement", "Level")
//!             .with_config(serde_json::json!({"increment": 1})),
//!     )
//!     .add_edge("level", "outcome", SUCCESS);
//! let tree = builder.build().unwrap();
//!
//! let trees = Arc::new(TreeService::new(
//!     Arc::new(InMemoryTreeLoader::new()),
//!     &EngineConfig::default(),
//! ));
//! let executor = TreeExecutor::new(Arc::new(builtin_registry()), trees);
//! let result = executor
//!     .process("root", &tree, TreeState::initial("root", None), vec![], &ExternalRequest::default())
//!     .await
//!     .unwrap();
//! assert_eq!(result.outcome(), Outcome::True);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod service;
pub mod state;
pub mod step;
pub mod steps;
pub mod tree;
pub mod visitor;

pub use config::EngineConfig;
pub use error::{NodeProcessError, StepError};
pub use executor::{InnerTreeResult, TreeExecutor};
pub use service::{InMemoryTreeLoader, LoaderError, TreeCache, TreeLoader, TreeProvider, TreeService};
pub use state::{
    Callback, JsonObject, JsonStateSerializer, Outcome, SessionHook, StateError, StateSerializer,
    TreeResult, TreeState,
};
pub use step::{
    Action, ExternalRequest, LevelContribution, OutcomeProvider, StaticOutcomes, Step,
    StepContext, StepFactory, StepMiddleware, StepRegistry, StepSpec,
};
pub use tree::{
    is_sentinel, Edge, GraphNode, MalformedGraphError, Tree, TreeBuilder, TreeDefinition,
    FAILURE, SUCCESS,
};
pub use visitor::{visit, AuthLevelAnalyzer, TreeVisitor};
