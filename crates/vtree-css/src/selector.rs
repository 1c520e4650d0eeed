//! Compiled selector

use std::fmt;
use std::sync::Arc;

use vtree_dom::{DomTree, NodeId};

type MatchFn = dyn Fn(&DomTree, NodeId) -> bool + Send + Sync;

/// Compiled selector: a predicate over tree nodes.
///
/// Cloning shares the compiled predicate.
#[derive(Clone)]
pub struct Selector(Arc<MatchFn>);

impl Selector {
    /// Wrap a predicate
    pub fn new(f: impl Fn(&DomTree, NodeId) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Test a single node
    #[inline]
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        (self.0)(tree, node)
    }

    /// Every match in `root`'s subtree, `root` included, pre-order
    pub fn match_all(&self, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
        tree.descendants(root)
            .filter(|&node| self.matches(tree, node))
            .collect()
    }

    /// First match in pre-order
    pub fn match_first(&self, tree: &DomTree, root: NodeId) -> Option<NodeId> {
        tree.descendants(root).find(|&node| self.matches(tree, node))
    }

    /// Keep the matching nodes, in order
    pub fn filter(&self, tree: &DomTree, nodes: &[NodeId]) -> Vec<NodeId> {
        nodes
            .iter()
            .copied()
            .filter(|&node| self.matches(tree, node))
            .collect()
    }

    /// Both must match
    pub fn and(self, other: Selector) -> Selector {
        Selector::new(move |tree, node| self.matches(tree, node) && other.matches(tree, node))
    }

    /// Either matches
    pub fn or(self, other: Selector) -> Selector {
        Selector::new(move |tree, node| self.matches(tree, node) || other.matches(tree, node))
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Selector")
    }
}
