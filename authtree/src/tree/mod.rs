//! Tree model: nodes + outcome-labeled edges, built once and shared.
//!
//! Build with [`TreeBuilder`] (or [`Tree::from_definition`]), then hand the
//! [`Tree`] to the executor or the visitor.

mod build_error;
mod builder;
mod definition;
pub mod logging;
mod model;

pub use build_error::MalformedGraphError;
pub use builder::TreeBuilder;
pub use definition::TreeDefinition;
pub use model::{is_sentinel, Edge, GraphNode, Tree, FAILURE, SUCCESS};
