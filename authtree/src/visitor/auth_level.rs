//! Maximum attainable auth level, computed without running any step.
//!
//! SUCCESS is worth 0; FAILURE is worth the analyzer's failure level (`None` for the
//! tree being certified, `Some(0)` for an inner tree analyzed on behalf of its
//! parent, whose failure outcome can still be wired to the parent's success). A node
//! is worth its own contribution plus the best of its successors; `None` means no
//! path reaches an attainable end and absorbs everything above it.

use crate::error::NodeProcessError;
use crate::service::TreeProvider;
use crate::step::{LevelContribution, StepRegistry};
use crate::tree::{is_sentinel, MalformedGraphError, Tree, FAILURE, SUCCESS};

use super::{visit, NodeVisit, TreeVisitor};

/// Visitor computing the maximum auth level reachable from a node.
///
/// **Interaction**: Runs over a `Tree` through [`visit`]; resolves inner trees through a
/// [`TreeProvider`] and analyzes each with a fresh analyzer (own path set).
pub struct AuthLevelAnalyzer<'a> {
    registry: &'a StepRegistry,
    trees: &'a dyn TreeProvider,
    failure_level: Option<i32>,
    /// `realm/name` of the trees enclosing the one being walked.
    tree_stack: Vec<String>,
}

impl<'a> AuthLevelAnalyzer<'a> {
    /// Analyzer for a top-level tree: FAILURE grants nothing.
    pub fn new(registry: &'a StepRegistry, trees: &'a dyn TreeProvider) -> Self {
        Self {
            registry,
            trees,
            failure_level: None,
            tree_stack: Vec::new(),
        }
    }

    /// Overrides the value FAILURE yields.
    pub fn with_failure_level(mut self, failure_level: Option<i32>) -> Self {
        self.failure_level = failure_level;
        self
    }

    /// Maximum auth level attainable from `start_id` in `tree`; `None` if SUCCESS is unreachable.
    pub fn analyze(&mut self, tree: &Tree, start_id: &str) -> Result<Option<i32>, NodeProcessError> {
        if !is_sentinel(start_id) && tree.node(start_id).is_none() {
            return Err(MalformedGraphError::NodeNotFound(start_id.to_string()).into());
        }
        self.tree_stack.push(tree_key(tree.realm(), tree.name()));
        let result = visit(tree, self.registry, start_id, self);
        self.tree_stack.pop();
        result
    }

    /// Maximum auth level of the whole tree, starting at its entry.
    pub fn analyze_tree(&mut self, tree: &Tree) -> Result<Option<i32>, NodeProcessError> {
        self.analyze(tree, tree.entry_node_id())
    }

    fn analyze_inner_tree(
        &self,
        realm: &str,
        name: &str,
    ) -> Result<Option<i32>, NodeProcessError> {
        let key = tree_key(realm, name);
        if self.tree_stack.contains(&key) {
            return Err(MalformedGraphError::InnerTreeCycle(name.to_string()).into());
        }
        let inner = self.trees.tree(realm, name)?;
        let mut analyzer = AuthLevelAnalyzer {
            registry: self.registry,
            trees: self.trees,
            failure_level: Some(0),
            tree_stack: self.tree_stack.clone(),
        };
        analyzer.analyze_tree(&inner)
    }
}

impl TreeVisitor for AuthLevelAnalyzer<'_> {
    type Output = Result<Option<i32>, NodeProcessError>;

    fn visit_node(&mut self, node: NodeVisit<'_>) -> Self::Output {
        if node.node_id == SUCCESS {
            return Ok(Some(0));
        }
        if node.node_id == FAILURE {
            return Ok(self.failure_level);
        }
        let NodeVisit {
            tree, step, next, ..
        } = node;
        let Some(step) = step else {
            return Ok(None);
        };

        let own = match step.get()?.level_contribution() {
            LevelContribution::None => Some(0),
            LevelContribution::Increment(n) => Some(n),
            LevelContribution::InnerTree(name) => self.analyze_inner_tree(tree.realm(), &name)?,
        };
        let Some(own) = own else {
            return Ok(None);
        };

        let mut best: Option<i32> = None;
        for continuation in next {
            if let Some(level) = continuation.visit(self)? {
                best = Some(best.map_or(level, |b| b.max(level)));
            }
        }
        Ok(best.map(|b| own.saturating_add(b)))
    }
}

fn tree_key(realm: &str, name: &str) -> String {
    format!("{}/{}", realm, name)
}
