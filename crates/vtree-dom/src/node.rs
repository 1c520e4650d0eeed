//! DOM Node
//!
//! Identity, type, payload and the owned child list. Positional links live
//! in the tree's link table so a parent can patch them while it is borrowed.

use crate::events::{Delegate, Events};
use crate::{Attributes, ChildList, NodeId, TransientId};

/// Node type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NodeType {
    Document = 0,
    DocumentFragment = 1,
    Element = 2,
    Text = 3,
    Comment = 4,
}

impl NodeType {
    /// Stable integer code used in JSON output
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Human-readable name
    pub fn type_name(self) -> &'static str {
        match self {
            NodeType::Document => "Document",
            NodeType::DocumentFragment => "DocumentFragment",
            NodeType::Element => "Element",
            NodeType::Text => "Text",
            NodeType::Comment => "Comment",
        }
    }

    /// Text and comment nodes carry content and never have children
    #[inline]
    pub fn is_character_data(self) -> bool {
        matches!(self, NodeType::Text | NodeType::Comment)
    }
}

/// DOM Node
#[derive(Debug)]
pub struct Node {
    pub(crate) kind: NodeType,
    pub(crate) name: String,
    pub(crate) id: String,
    pub(crate) tid: TransientId,
    pub(crate) atid: TransientId,
    pub(crate) content: Option<String>,
    pub(crate) attrs: Attributes,
    pub(crate) events: Events,
    /// Events this node listens to on behalf of its descendants
    pub(crate) listens: Vec<String>,
    /// Subscriptions inherited from ancestors
    pub(crate) delegates: Vec<Delegate>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: ChildList,
    pub(crate) removed: bool,
}

impl Node {
    pub(crate) fn new(kind: NodeType, name: String, id: String, tid: TransientId) -> Self {
        Self {
            kind,
            name,
            id,
            tid,
            atid: tid,
            content: None,
            attrs: Attributes::new(),
            events: Events::new(),
            listens: Vec::new(),
            delegates: Vec::new(),
            parent: None,
            children: ChildList::new(),
            removed: false,
        }
    }

    #[inline]
    pub fn kind(&self) -> NodeType {
        self.kind
    }

    /// Tag or type name
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Caller-supplied id
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Transient id
    #[inline]
    pub fn tid(&self) -> TransientId {
        self.tid
    }

    /// Transient id of this position's counterpart in a previous tree
    #[inline]
    pub fn atid(&self) -> TransientId {
        self.atid
    }

    /// Text payload (text and comment nodes)
    #[inline]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Replace the text payload
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = Some(content.into());
    }

    #[inline]
    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    #[inline]
    pub fn attrs_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    #[inline]
    pub fn events(&self) -> &Events {
        &self.events
    }

    #[inline]
    pub fn events_mut(&mut self) -> &mut Events {
        &mut self.events
    }

    /// Events declared for descendants
    pub fn listens(&self) -> &[String] {
        &self.listens
    }

    /// Subscriptions inherited from ancestors
    pub fn delegates(&self) -> &[Delegate] {
        &self.delegates
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Owned child list
    #[inline]
    pub fn children(&self) -> &ChildList {
        &self.children
    }

    /// Marked as deleted by the last reconciliation
    #[inline]
    pub fn removed(&self) -> bool {
        self.removed
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeType::Element
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == NodeType::Text
    }

    /// Structural equivalence, ignoring children and identity
    pub fn matches(&self, other: &Node) -> bool {
        if self.kind != other.kind {
            return false;
        }
        match self.kind {
            NodeType::Element => self.name == other.name && self.attrs.matches(&other.attrs),
            NodeType::Text | NodeType::Comment => self.content == other.content,
            NodeType::Document | NodeType::DocumentFragment => true,
        }
    }
}
