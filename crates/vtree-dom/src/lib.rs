//! vtree DOM - virtual document tree
//!
//! Arena-backed node tree with compact child lists, cross-tree events and
//! reconciliation between successive versions of a tree.

mod attributes;
mod build;
pub mod child_list;
mod error;
mod events;
mod ids;
mod node;
mod reconcile;
mod tree;

pub use attributes::{Attr, Attributes};
pub use build::{Build, Mount, comment, document, element, fragment, text};
pub use child_list::{ChildList, LinkTable, Links, NO_LINK};
pub use error::{DomError, DomResult};
pub use events::{
    Delegate, Event, EventDescriptor, EventResponder, Events, Responder, SignalResponder,
};
pub use ids::{GlobalIds, IdRegistry, IdSource, TransientId};
pub use node::{Node, NodeType};
pub use reconcile::{Change, ChangeLog, ChangeNotifier, ChangeRecord, reconcile};
pub use tree::{Children, Descendants, DomTree, REF_SEPARATOR};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena slot
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
