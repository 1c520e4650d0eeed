//! Tree reconciliation
//!
//! Walks a new tree against the previous one, reports what changed and
//! carries identity across: `atid` always points back at the counterpart,
//! and unchanged nodes adopt the old `tid` so renderers keep their handles.
//!
//! Decisions per node pair, in order:
//! 1. Type or name differ: old removed, new added, children not visited.
//! 2. Text and comment: same content is unchanged, otherwise updated.
//! 3. Element attributes differ: updated, children not visited.
//! 4. Child counts differ: updated, children not visited.
//! 5. Children compared by position after compaction.

use crate::{DomTree, NodeId, NodeType, TransientId};

/// Kind of change reported for one node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    /// Node from the old tree, flagged removed
    Removed,
    /// Node from the new tree whose counterpart differs
    Updated,
    /// Node from the new tree replacing a removed one
    Added,
}

/// Receives reconciliation results in emission order.
///
/// `tree` is the old tree for [`Change::Removed`] and the new tree otherwise.
pub trait ChangeNotifier {
    fn notify(&mut self, change: Change, tree: &DomTree, node: NodeId);
}

impl<F: FnMut(Change, &DomTree, NodeId)> ChangeNotifier for F {
    fn notify(&mut self, change: Change, tree: &DomTree, node: NodeId) {
        self(change, tree, node)
    }
}

/// One recorded notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub change: Change,
    pub node: NodeId,
    pub tid: TransientId,
    pub name: String,
}

/// Notifier that keeps every change
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    records: Vec<ChangeRecord>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records of one kind
    pub fn count(&self, change: Change) -> usize {
        self.records.iter().filter(|r| r.change == change).count()
    }
}

impl ChangeNotifier for ChangeLog {
    fn notify(&mut self, change: Change, tree: &DomTree, node: NodeId) {
        let Some(n) = tree.get(node) else {
            return;
        };
        self.records.push(ChangeRecord {
            change,
            node,
            tid: n.tid(),
            name: n.name().to_string(),
        });
    }
}

/// Reconcile `new_node` in `new` against `old_node` in `old`.
///
/// Returns whether anything in the subtree changed. Never fails: unknown
/// handles count as an add or a removal.
pub fn reconcile<N: ChangeNotifier + ?Sized>(
    new: &mut DomTree,
    new_node: NodeId,
    old: &mut DomTree,
    old_node: NodeId,
    notifier: &mut N,
) -> bool {
    let changed = diff(new, new_node, old, old_node, notifier);
    tracing::debug!(changed, nodes = new.len(), "reconciled tree");
    changed
}

fn diff<N: ChangeNotifier + ?Sized>(
    new: &mut DomTree,
    new_node: NodeId,
    old: &mut DomTree,
    old_node: NodeId,
    notifier: &mut N,
) -> bool {
    let (n, o) = match (new.get(new_node), old.get(old_node)) {
        (Some(n), Some(o)) => (n, o),
        (Some(_), None) => {
            notifier.notify(Change::Added, new, new_node);
            return true;
        }
        (None, Some(_)) => {
            mark_removed(old, old_node, notifier);
            return true;
        }
        (None, None) => return false,
    };

    if n.kind != o.kind || n.name != o.name {
        tracing::trace!(old = %o.name, new = %n.name, "replaced");
        mark_removed(old, old_node, notifier);
        notifier.notify(Change::Added, new, new_node);
        return true;
    }

    let kind = n.kind;
    let (old_tid, old_atid) = (o.tid, o.atid);
    let same_content = n.content == o.content;
    let same_attrs = n.attrs.matches(&o.attrs);
    let counts = (n.children.len(), o.children.len());
    if let Some(target) = new.get_mut(new_node) {
        target.atid = old_atid;
    }

    match kind {
        NodeType::Text | NodeType::Comment => {
            if same_content {
                adopt(new, new_node, old_tid);
                return false;
            }
            tracing::trace!(tid = %old_tid, "content updated");
            notifier.notify(Change::Updated, new, new_node);
            return true;
        }
        NodeType::Element if !same_attrs => {
            tracing::trace!(tid = %old_tid, "attributes updated");
            notifier.notify(Change::Updated, new, new_node);
            return true;
        }
        _ => {}
    }

    if counts.0 != counts.1 {
        tracing::trace!(tid = %old_tid, new = counts.0, old = counts.1, "child count changed");
        notifier.notify(Change::Updated, new, new_node);
        return true;
    }

    // positional access below needs compacted lists
    new.sort_children(new_node);
    old.sort_children(old_node);

    let mut changed = false;
    for index in 0..counts.1 {
        let Ok(old_child) = old.child_at(old_node, index) else {
            continue;
        };
        match new.child_at(new_node, index) {
            Ok(new_child) => changed |= diff(new, new_child, old, old_child, notifier),
            Err(_) => {
                mark_removed(old, old_child, notifier);
                changed = true;
            }
        }
    }

    if !changed {
        adopt(new, new_node, old_tid);
    }
    changed
}

fn mark_removed<N: ChangeNotifier + ?Sized>(tree: &mut DomTree, node: NodeId, notifier: &mut N) {
    if let Some(n) = tree.get_mut(node) {
        n.removed = true;
    }
    notifier.notify(Change::Removed, tree, node);
}

fn adopt(tree: &mut DomTree, node: NodeId, tid: TransientId) {
    if let Some(n) = tree.get_mut(node) {
        n.tid = tid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Mount, element, text};

    #[test]
    fn test_text_change_is_updated() {
        let mut old = DomTree::new();
        let old_root = old.build(text("t", "before"));
        let mut new = DomTree::new();
        let new_root = new.build(text("t", "after"));

        let mut log = ChangeLog::new();
        assert!(reconcile(&mut new, new_root, &mut old, old_root, &mut log));
        assert_eq!(log.count(Change::Updated), 1);

        let (n, o) = (new.get(new_root).unwrap(), old.get(old_root).unwrap());
        assert_eq!(n.atid(), o.atid());
        assert_ne!(n.tid(), o.tid());
    }

    #[test]
    fn test_attribute_change_skips_children() {
        let mut old = DomTree::new();
        let old_root = old.build(element(
            "div",
            "root",
            [Mount::attr("class", "a"), Mount::child(text("t", "x"))],
        ));
        let mut new = DomTree::new();
        let new_root = new.build(element(
            "div",
            "root",
            [Mount::attr("class", "b"), Mount::child(text("t", "y"))],
        ));

        let mut log = ChangeLog::new();
        assert!(reconcile(&mut new, new_root, &mut old, old_root, &mut log));
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].node, new_root);
    }

    #[test]
    fn test_child_count_change_is_coarse() {
        let mut old = DomTree::new();
        let old_root = old.build(element("ul", "l", [Mount::child(element("li", "a", []))]));
        let mut new = DomTree::new();
        let new_root = new.build(element(
            "ul",
            "l",
            [
                Mount::child(element("li", "a", [])),
                Mount::child(element("li", "b", [])),
            ],
        ));

        let mut seen = Vec::new();
        let mut notifier = |change: Change, _: &DomTree, node: NodeId| seen.push((change, node));
        assert!(reconcile(&mut new, new_root, &mut old, old_root, &mut notifier));
        assert_eq!(seen, vec![(Change::Updated, new_root)]);
    }

    #[test]
    fn test_changed_child_keeps_parent_tid_fresh() {
        let mut old = DomTree::new();
        let old_root = old.build(element(
            "div",
            "root",
            [Mount::child(text("a", "same")), Mount::child(text("b", "old"))],
        ));
        let mut new = DomTree::new();
        let new_root = new.build(element(
            "div",
            "root",
            [Mount::child(text("a", "same")), Mount::child(text("b", "new"))],
        ));

        let mut log = ChangeLog::new();
        assert!(reconcile(&mut new, new_root, &mut old, old_root, &mut log));
        assert_eq!(log.count(Change::Updated), 1);

        let first_new = new.first_child(new_root).unwrap();
        let first_old = old.first_child(old_root).unwrap();
        assert_eq!(new.get(first_new).unwrap().tid(), old.get(first_old).unwrap().tid());
        assert_ne!(new.get(new_root).unwrap().tid(), old.get(old_root).unwrap().tid());
        assert_eq!(new.get(new_root).unwrap().atid(), old.get(old_root).unwrap().atid());
    }
}
