//! Cycle-safe depth-first traversal of a tree.
//!
//! [`visit`] hands the [`TreeVisitor`] one [`NodeVisit`] per reached node: its id,
//! its step type, a lazily created step and one [`Continuation`] per outgoing edge
//! whose destination is not already on the current path. The visitor decides how
//! to combine values, usually bottom-up by forcing continuations first.
//!
//! The visited set is the ancestor path only: a node on the path is never entered
//! again from below it (loops terminate), while sibling branches may each enter a
//! shared descendant.

mod auth_level;

use std::cell::OnceCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::NodeProcessError;
use crate::step::{Step, StepRegistry};
use crate::tree::{Edge, GraphNode, Tree};

pub use auth_level::AuthLevelAnalyzer;

/// Folds a value over the nodes reached by [`visit`].
pub trait TreeVisitor {
    type Output;

    fn visit_node(&mut self, node: NodeVisit<'_>) -> Self::Output;
}

/// Walks `tree` depth-first from `start_id`, calling `visitor` for the start node.
///
/// Further nodes are visited only as the visitor forces continuations.
pub fn visit<V: TreeVisitor>(
    tree: &Tree,
    registry: &StepRegistry,
    start_id: &str,
    visitor: &mut V,
) -> V::Output {
    visit_from(tree, registry, start_id, None, visitor)
}

fn visit_from<'a, V: TreeVisitor>(
    tree: &'a Tree,
    registry: &'a StepRegistry,
    node_id: &'a str,
    parent: Option<Rc<PathLink<'a>>>,
    visitor: &mut V,
) -> V::Output {
    let path = Rc::new(PathLink {
        id: node_id,
        parent,
    });
    let node = tree.node(node_id);
    let visit = NodeVisit {
        tree,
        node_id,
        node_type: node.map(|n| n.node_type.as_str()),
        step: node.map(|n| LazyStep::new(tree, registry, n)),
        next: Continuations {
            tree,
            registry,
            edges: tree.outgoing(node_id).iter(),
            path,
        },
    };
    visitor.visit_node(visit)
}

/// One node handed to a visitor.
pub struct NodeVisit<'a> {
    /// Tree being walked.
    pub tree: &'a Tree,
    pub node_id: &'a str,
    /// Step type; `None` for sentinels.
    pub node_type: Option<&'a str>,
    /// Step instance, built on first use; `None` for sentinels.
    pub step: Option<LazyStep<'a>>,
    /// One continuation per outgoing edge leading off the current path.
    pub next: Continuations<'a>,
}

/// Step instance created through the registry on first access.
pub struct LazyStep<'a> {
    tree: &'a Tree,
    registry: &'a StepRegistry,
    node: &'a GraphNode,
    cell: OnceCell<Arc<dyn Step>>,
}

impl<'a> LazyStep<'a> {
    fn new(tree: &'a Tree, registry: &'a StepRegistry, node: &'a GraphNode) -> Self {
        Self {
            tree,
            registry,
            node,
            cell: OnceCell::new(),
        }
    }

    pub fn node(&self) -> &'a GraphNode {
        self.node
    }

    /// Returns the step, creating it on the first call.
    pub fn get(&self) -> Result<&Arc<dyn Step>, NodeProcessError> {
        if let Some(step) = self.cell.get() {
            return Ok(step);
        }
        let step = self.registry.create_step(
            &self.node.node_type,
            &self.node.id,
            self.tree.realm(),
            self.tree,
        )?;
        Ok(self.cell.get_or_init(|| step))
    }
}

/// Lazy sequence of continuations, skipping edges that lead back onto the path.
pub struct Continuations<'a> {
    tree: &'a Tree,
    registry: &'a StepRegistry,
    edges: std::slice::Iter<'a, Edge>,
    path: Rc<PathLink<'a>>,
}

impl<'a> Iterator for Continuations<'a> {
    type Item = Continuation<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for edge in self.edges.by_ref() {
            if self.path.contains(&edge.destination) {
                continue;
            }
            return Some(Continuation {
                tree: self.tree,
                registry: self.registry,
                edge,
                path: Rc::clone(&self.path),
            });
        }
        None
    }
}

/// Deferred visit of one edge's destination.
pub struct Continuation<'a> {
    tree: &'a Tree,
    registry: &'a StepRegistry,
    edge: &'a Edge,
    path: Rc<PathLink<'a>>,
}

impl<'a> Continuation<'a> {
    /// Outcome label of the edge this continuation follows.
    pub fn outcome(&self) -> &'a str {
        &self.edge.outcome
    }

    /// Node (or sentinel) id the edge leads to.
    pub fn target(&self) -> &'a str {
        &self.edge.destination
    }

    /// Visits the destination with `visitor`, extending the current path.
    pub fn visit<V: TreeVisitor>(self, visitor: &mut V) -> V::Output {
        visit_from(
            self.tree,
            self.registry,
            &self.edge.destination,
            Some(self.path),
            visitor,
        )
    }
}

/// Persistent ancestor path; each branch extends its own tail.
struct PathLink<'a> {
    id: &'a str,
    parent: Option<Rc<PathLink<'a>>>,
}

impl PathLink<'_> {
    fn contains(&self, id: &str) -> bool {
        let mut link = Some(self);
        while let Some(l) = link {
            if l.id == id {
                return true;
            }
            link = l.parent.as_deref();
        }
        false
    }
}
