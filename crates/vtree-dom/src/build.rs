//! Construction API
//!
//! Trees are assembled from [`Build`] descriptions. Each description carries
//! [`Mount`]s that attach attributes, events and children to the node once it
//! exists in the arena.
//!
//! ```
//! use vtree_dom::{DomTree, Mount, element, text};
//!
//! let mut tree = DomTree::new();
//! let root = tree.build(element("ul", "menu", [
//!     Mount::attr("class", "nav"),
//!     Mount::child(element("li", "home", [Mount::child(text("label", "Home"))])),
//! ]));
//! assert_eq!(tree.text_content(root), "Home");
//! ```

use std::fmt;

use crate::{DomResult, DomTree, EventDescriptor, NodeId, NodeType, Responder};

type MountFn = Box<dyn FnOnce(&mut DomTree, NodeId) -> DomResult<()>>;

/// Deferred step applied to a freshly created node
pub struct Mount(MountFn);

impl Mount {
    /// Arbitrary mount step
    pub fn with(f: impl FnOnce(&mut DomTree, NodeId) -> DomResult<()> + 'static) -> Self {
        Self(Box::new(f))
    }

    /// Set an attribute
    pub fn attr(name: impl Into<String>, value: impl Into<String>) -> Self {
        let (name, value) = (name.into(), value.into());
        Self::with(move |tree, node| {
            tree.node_mut(node)?.attrs_mut().set(&name, &value);
            Ok(())
        })
    }

    /// Build a child and append it
    pub fn child(build: Build) -> Self {
        Self::with(move |tree, node| {
            let child = build.create(tree)?;
            tree.append_child(node, child)
        })
    }

    /// Build several children and append them in order
    pub fn children(builds: impl IntoIterator<Item = Build>) -> Self {
        let builds: Vec<Build> = builds.into_iter().collect();
        Self::with(move |tree, node| {
            for build in builds {
                let child = build.create(tree)?;
                tree.append_child(node, child)?;
            }
            Ok(())
        })
    }

    /// Append a node that already lives in the tree
    pub fn node(child: NodeId) -> Self {
        Self::with(move |tree, node| tree.append_child(node, child))
    }

    /// Bind a responder to an event name
    pub fn on(event: impl Into<String>, responder: Responder) -> Self {
        Self::event(EventDescriptor::new(event, responder))
    }

    /// Bind a prepared descriptor
    pub fn event(descriptor: EventDescriptor) -> Self {
        Self::with(move |tree, node| {
            tree.node_mut(node)?.events_mut().add(descriptor);
            Ok(())
        })
    }

    /// Listen for `event` on behalf of all descendants
    pub fn listen(event: impl Into<String>) -> Self {
        let event = event.into();
        Self::with(move |tree, node| tree.listen_descendants(node, event))
    }

    fn apply(self, tree: &mut DomTree, node: NodeId) -> DomResult<()> {
        (self.0)(tree, node)
    }
}

impl fmt::Debug for Mount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Mount")
    }
}

/// Description of a node to create
#[derive(Debug)]
pub struct Build {
    kind: NodeType,
    name: String,
    id: String,
    content: Option<String>,
    mounts: Vec<Mount>,
}

impl Build {
    pub fn new(kind: NodeType, name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            id: id.into(),
            content: None,
            mounts: Vec::new(),
        }
    }

    /// Add a mount step
    pub fn mount(mut self, mount: Mount) -> Self {
        self.mounts.push(mount);
        self
    }

    fn mounts(mut self, mounts: impl IntoIterator<Item = Mount>) -> Self {
        self.mounts.extend(mounts);
        self
    }

    fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Create the node and run its mounts in order
    pub fn create(self, tree: &mut DomTree) -> DomResult<NodeId> {
        let node = tree.create(self.kind, self.name, self.id)?;
        if let Some(content) = self.content {
            tree.node_mut(node)?.set_content(content);
        }
        for mount in self.mounts {
            mount.apply(tree, node)?;
        }
        Ok(node)
    }
}

/// Document root
pub fn document(id: impl Into<String>, mounts: impl IntoIterator<Item = Mount>) -> Build {
    Build::new(NodeType::Document, "#document", id).mounts(mounts)
}

/// Document fragment
pub fn fragment(id: impl Into<String>, mounts: impl IntoIterator<Item = Mount>) -> Build {
    Build::new(NodeType::DocumentFragment, "#document-fragment", id).mounts(mounts)
}

/// Element with tag `name`
pub fn element(
    name: impl Into<String>,
    id: impl Into<String>,
    mounts: impl IntoIterator<Item = Mount>,
) -> Build {
    Build::new(NodeType::Element, name, id).mounts(mounts)
}

/// Text node
pub fn text(id: impl Into<String>, content: impl Into<String>) -> Build {
    Build::new(NodeType::Text, "#text", id).content(content)
}

/// Comment node
pub fn comment(id: impl Into<String>, content: impl Into<String>) -> Build {
    Build::new(NodeType::Comment, "#comment", id).content(content)
}

impl DomTree {
    /// Create a node from a description
    pub fn try_build(&mut self, build: Build) -> DomResult<NodeId> {
        build.create(self)
    }

    /// Create a node from a description.
    ///
    /// # Panics
    /// On an empty name or id, or when a mount fails. Construction is
    /// program-controlled, so either is a bug in the calling code.
    pub fn build(&mut self, build: Build) -> NodeId {
        match self.try_build(build) {
            Ok(node) => node,
            Err(err) => panic!("failed to build node: {err}"),
        }
    }
}
