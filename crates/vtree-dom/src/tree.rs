//! DOM Tree (arena-based allocation)
//!
//! Nodes live in one `Vec` and address each other by [`NodeId`]. The link
//! table sits beside the nodes so a parent's [`ChildList`] can rewrite its
//! children's positions while the parent is borrowed mutably.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::child_list::{self, Links};
use crate::events::{Delegate, Event};
use crate::{
    ChildList, DomError, DomResult, GlobalIds, IdRegistry, IdSource, Node, NodeId, NodeType,
};

/// Default separator for reference paths
pub const REF_SEPARATOR: &str = "/";

static NO_CHILDREN: ChildList = ChildList::new();

/// Logical-order iterator over one node's children
pub type Children<'a> = child_list::Iter<'a, Vec<Links>>;

/// Arena-based DOM tree
pub struct DomTree {
    nodes: Vec<Node>,
    links: Vec<Links>,
    ids: Arc<dyn IdSource>,
}

impl DomTree {
    /// Create a new empty DOM tree drawing ids from the global counter
    pub fn new() -> Self {
        Self::with_id_source(GlobalIds)
    }

    /// Create a tree with its own id source
    pub fn with_id_source(ids: impl IdSource + 'static) -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            ids: Arc::new(ids),
        }
    }

    /// Number of nodes in the arena, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by ID
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Get a node, failing on foreign handles
    pub fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> DomResult<&mut Node> {
        self.nodes.get_mut(id.index()).ok_or(DomError::UnknownNode(id))
    }

    /// Positional links of a node inside its parent's list
    pub fn links(&self, id: NodeId) -> Option<&Links> {
        self.links.get(id.index())
    }

    /// Allocate a detached node with a fresh transient id
    pub fn create(
        &mut self,
        kind: NodeType,
        name: impl Into<String>,
        id: impl Into<String>,
    ) -> DomResult<NodeId> {
        let name = name.into();
        let id = id.into();
        if name.is_empty() {
            return Err(DomError::EmptyName);
        }
        if id.is_empty() {
            return Err(DomError::EmptyId);
        }
        let node = Node::new(kind, name, id, self.ids.next_id());
        tracing::trace!(kind = kind.type_name(), name = %node.name, tid = %node.tid, "create node");
        Ok(self.push(node))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.links.push(Links::new());
        id
    }

    /// Append `child` as the last child of `parent`, detaching it first if
    /// it is attached elsewhere
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_kind = self.node(parent)?.kind;
        self.node(child)?;
        if parent == child {
            return Err(DomError::InvalidOp("cannot append a node to itself"));
        }
        if parent_kind.is_character_data() {
            return Err(DomError::InvalidOp("text and comment nodes cannot have children"));
        }
        if self.ancestors(parent).any(|a| a == child) {
            return Err(DomError::InvalidOp("cannot append an ancestor to its descendant"));
        }
        if self.nodes[child.index()].parent.is_some() {
            self.remove(child)?;
        }

        let links = &self.links;
        self.nodes[parent.index()].children.add(child, links);
        self.nodes[child.index()].parent = Some(parent);
        self.inherit_delegates(parent, child);
        Ok(())
    }

    /// Detach a node from its parent. The subtree stays in the arena.
    pub fn remove(&mut self, node: NodeId) -> DomResult<()> {
        let parent = self
            .node(node)?
            .parent
            .ok_or(DomError::InvalidOp("cannot remove a node without a parent"))?;
        let index = self
            .position(node)
            .ok_or(DomError::InvalidOp("node is not linked into its parent"))?;

        let links = &self.links;
        self.nodes[parent.index()].children.remove_and_swap(index, links)?;
        self.nodes[node.index()].parent = None;
        self.strip_delegates(node);
        Ok(())
    }

    /// Copy a node with its identity, payload and events. A deep clone
    /// copies children in logical order.
    pub fn clone_node(&mut self, node: NodeId, deep: bool) -> DomResult<NodeId> {
        let source = self.node(node)?;
        let mut copy = Node::new(source.kind, source.name.clone(), source.id.clone(), source.tid);
        copy.atid = source.atid;
        copy.content = source.content.clone();
        copy.attrs = source.attrs.clone();
        copy.events = source.events.clone();
        copy.listens = source.listens.clone();

        let children: Vec<NodeId> = if deep {
            self.children(node).collect()
        } else {
            Vec::new()
        };
        let id = self.push(copy);
        for child in children {
            let cloned = self.clone_node(child, true)?;
            self.append_child(id, cloned)?;
        }
        Ok(id)
    }

    /// Put `other` into `node`'s place in the parent's list
    pub fn swap_node(&mut self, node: NodeId, other: NodeId) -> DomResult<()> {
        self.replace(node, other).map(|_| ())
    }

    /// Like [`swap_node`](Self::swap_node), and `other` also takes over
    /// `node`'s children. `other`'s previous children are detached.
    pub fn swap_all(&mut self, node: NodeId, other: NodeId) -> DomResult<()> {
        if self.node(other)?.kind.is_character_data() && !self.node(node)?.children.is_empty() {
            return Err(DomError::InvalidOp("text and comment nodes cannot have children"));
        }
        self.replace(node, other)?;

        let mut stale = std::mem::take(&mut self.nodes[other.index()].children);
        let dropped: Vec<NodeId> = stale.iter(&self.links).collect();
        stale.clear(&self.links);
        for child in dropped {
            self.nodes[child.index()].parent = None;
            self.strip_delegates(child);
        }

        let moved = std::mem::take(&mut self.nodes[node.index()].children);
        let adopted: Vec<NodeId> = moved.iter(&self.links).collect();
        self.nodes[other.index()].children = moved;
        for child in adopted {
            self.nodes[child.index()].parent = Some(other);
            self.strip_delegates(child);
            self.inherit_delegates(other, child);
        }
        Ok(())
    }

    fn replace(&mut self, node: NodeId, other: NodeId) -> DomResult<NodeId> {
        let parent = self
            .node(node)?
            .parent
            .ok_or(DomError::InvalidOp("cannot swap a node without a parent"))?;
        self.node(other)?;
        if node == other {
            return Err(DomError::InvalidOp("cannot swap a node with itself"));
        }
        if self.ancestors(node).any(|a| a == other) {
            return Err(DomError::InvalidOp("cannot swap a node with its ancestor"));
        }
        if self.nodes[other.index()].parent.is_some() {
            self.remove(other)?;
        }

        // read after the detach above, which may have moved `node`
        let index = self
            .position(node)
            .ok_or(DomError::InvalidOp("node is not linked into its parent"))?;
        let links = &self.links;
        self.nodes[parent.index()].children.swap_node(index, other, links)?;
        self.nodes[other.index()].parent = Some(parent);
        self.nodes[node.index()].parent = None;
        self.strip_delegates(node);
        self.inherit_delegates(parent, other);
        Ok(parent)
    }

    /// Compact a node's child list so positional access is valid
    pub fn balance(&mut self, node: NodeId) -> DomResult<()> {
        self.node(node)?;
        self.sort_children(node);
        Ok(())
    }

    /// Compact a known node's child list
    pub(crate) fn sort_children(&mut self, node: NodeId) {
        let links = &self.links;
        if let Some(target) = self.nodes.get_mut(node.index()) {
            target.children.sort_list(links);
        }
    }

    /// Number of live children; zero for unknown handles
    pub fn child_count(&self, node: NodeId) -> usize {
        self.get(node).map_or(0, |n| n.children.len())
    }

    /// Child in slot `index`. Only logical after [`balance`](Self::balance).
    pub fn child_at(&self, node: NodeId, index: usize) -> DomResult<NodeId> {
        self.node(node)?.children.get(index)
    }

    /// Visit children in logical order until `visit` returns false
    pub fn each_child<F>(&self, node: NodeId, visit: F)
    where
        F: FnMut(NodeId, usize) -> bool,
    {
        self.child_list(node).each(&self.links, visit);
    }

    /// Children in logical order
    pub fn children(&self, node: NodeId) -> Children<'_> {
        self.child_list(node).iter(&self.links)
    }

    fn child_list(&self, node: NodeId) -> &ChildList {
        self.get(node).map_or(&NO_CHILDREN, |n| &n.children)
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.children.first()
    }

    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.children.last()
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let next = self.links.get(node.index())?.next();
        self.nodes[parent.index()].children.slot(next)
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let prev = self.links.get(node.index())?.prev();
        self.nodes[parent.index()].children.slot(prev)
    }

    #[inline]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }

    /// Slot of an attached node inside its parent's list
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.parent(node)?;
        usize::try_from(self.links.get(node.index())?.index()).ok()
    }

    /// Parent chain, nearest first
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(node), move |&n| self.parent(n))
    }

    /// Topmost ancestor, or the node itself
    pub fn root(&self, node: NodeId) -> NodeId {
        self.ancestors(node).last().unwrap_or(node)
    }

    /// The node and its subtree, pre-order
    pub fn descendants(&self, node: NodeId) -> Descendants<'_> {
        let stack = if self.get(node).is_some() {
            vec![node]
        } else {
            Vec::new()
        };
        Descendants { tree: self, stack }
    }

    /// Concatenated text of every descendant text node
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_text(node, &mut out);
        out
    }

    fn write_text(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.get(node) else {
            return;
        };
        match n.kind {
            NodeType::Text => out.push_str(n.content().unwrap_or_default()),
            NodeType::Comment => {}
            _ => {
                for child in self.children(node) {
                    self.write_text(child, out);
                }
            }
        }
    }

    /// Text of direct text children only
    pub fn own_text(&self, node: NodeId) -> String {
        self.children(node)
            .filter_map(|child| self.get(child))
            .filter(|child| child.is_text())
            .filter_map(Node::content)
            .collect()
    }

    /// Ids from the root down to `node`, joined by `separator`
    pub fn reference_path(&self, node: NodeId, separator: &str) -> String {
        let mut ids: Vec<&str> = self
            .ancestors(node)
            .filter_map(|a| self.get(a))
            .map(Node::id)
            .collect();
        ids.reverse();
        if let Some(n) = self.get(node) {
            ids.push(n.id());
        }
        ids.join(separator)
    }

    /// Id-keyed registry over a parent's children
    pub fn sibling_registry(&self, parent: NodeId) -> DomResult<IdRegistry> {
        self.node(parent)?;
        let mut registry = IdRegistry::new();
        for child in self.children(parent) {
            registry.register(self.nodes[child.index()].id(), child)?;
        }
        Ok(registry)
    }

    /// Subscribe `node` to `event` on every current and future descendant
    pub fn listen_descendants(&mut self, node: NodeId, event: impl Into<String>) -> DomResult<()> {
        let event = event.into();
        let target = self.node_mut(node)?;
        if target.listens.contains(&event) {
            return Ok(());
        }
        target.listens.push(event.clone());

        let delegate = Delegate {
            event,
            listener: node,
        };
        let below: Vec<NodeId> = self.descendants(node).skip(1).collect();
        for id in below {
            let delegates = &mut self.nodes[id.index()].delegates;
            if !delegates.contains(&delegate) {
                delegates.push(delegate.clone());
            }
        }
        Ok(())
    }

    /// Deliver an event to `node`, then to subscribed ancestors nearest
    /// first. Returns the number of descriptors fired.
    pub fn dispatch(&self, node: NodeId, event: &mut Event) -> DomResult<usize> {
        let target = self.node(node)?;
        let name = event.name.clone();
        event.target = Some(node);
        event.current_target = Some(node);

        let mut fired = 0;
        for descriptor in target.events.get(&name) {
            descriptor.fire(event);
            fired += 1;
        }

        for listener in self.ancestors(node) {
            if event.is_propagation_stopped() {
                break;
            }
            let subscribed = target
                .delegates
                .iter()
                .any(|d| d.listener == listener && d.event == name);
            if !subscribed {
                continue;
            }
            event.current_target = Some(listener);
            for descriptor in self.nodes[listener.index()].events.get(&name) {
                descriptor.fire(event);
                fired += 1;
            }
        }
        tracing::trace!(event = %name, fired, "dispatch");
        Ok(fired)
    }

    /// Hand `parent`'s subscriptions down to a newly attached subtree
    fn inherit_delegates(&mut self, parent: NodeId, child: NodeId) {
        let source = &self.nodes[parent.index()];
        let mut inherited = source.delegates.clone();
        inherited.extend(source.listens.iter().map(|event| Delegate {
            event: event.clone(),
            listener: parent,
        }));
        if inherited.is_empty() {
            return;
        }

        let subtree: Vec<NodeId> = self.descendants(child).collect();
        for id in subtree {
            let delegates = &mut self.nodes[id.index()].delegates;
            for delegate in &inherited {
                if !delegates.contains(delegate) {
                    delegates.push(delegate.clone());
                }
            }
        }
    }

    /// Drop subscriptions whose listener is outside the detached subtree
    fn strip_delegates(&mut self, node: NodeId) {
        let subtree: Vec<NodeId> = self.descendants(node).collect();
        let inside: HashSet<NodeId> = subtree.iter().copied().collect();
        for id in subtree {
            self.nodes[id.index()]
                .delegates
                .retain(|d| inside.contains(&d.listener));
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DomTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomTree")
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

/// Pre-order walk of a subtree
pub struct Descendants<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(self.tree.children(node));
        self.stack[start..].reverse();
        Some(node)
    }
}
