//! Diff output
//!
//! Collects reconciliation results as JSON node records: removed nodes in
//! shallow form (they only need locating), updated and added nodes in full.

use vtree_dom::{Change, ChangeNotifier, DomTree, NodeId, reconcile};

use crate::json::{JsonSerializer, NodeJson};
use crate::{RenderError, RenderResult};

/// Change notifier that records JSON node records in emission order
#[derive(Debug, Default)]
pub struct DiffWriter {
    serializer: JsonSerializer,
    records: Vec<NodeJson>,
    error: Option<RenderError>,
}

impl DiffWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            serializer: JsonSerializer::with_separator(separator),
            ..Self::default()
        }
    }

    pub fn records(&self) -> &[NodeJson] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recorded changes, or the first rendering failure
    pub fn finish(self) -> RenderResult<Vec<NodeJson>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.records),
        }
    }

    /// Recorded changes as a JSON array string
    pub fn into_json(self) -> RenderResult<String> {
        let records = self.finish()?;
        Ok(serde_json::to_string(&records)?)
    }
}

impl ChangeNotifier for DiffWriter {
    fn notify(&mut self, change: Change, tree: &DomTree, node: NodeId) {
        if self.error.is_some() {
            return;
        }
        let record = match change {
            Change::Removed => self.serializer.shallow_node(tree, node),
            Change::Updated | Change::Added => self.serializer.node(tree, node),
        };
        match record {
            Ok(record) => self.records.push(record),
            Err(err) => self.error = Some(err),
        }
    }
}

/// Reconcile `new` against `old` and return the changes as a JSON array
pub fn render_diff(
    new: &mut DomTree,
    new_root: NodeId,
    old: &mut DomTree,
    old_root: NodeId,
) -> RenderResult<String> {
    let mut writer = DiffWriter::new();
    reconcile(new, new_root, old, old_root, &mut writer);
    tracing::debug!(changes = writer.len(), "rendered diff");
    writer.into_json()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtree_dom::{Mount, element, text};

    #[test]
    fn test_removed_records_are_shallow() {
        let mut old = DomTree::new();
        let old_root = old.build(element("div", "root", [Mount::child(text("t", "x"))]));
        let mut new = DomTree::new();
        let new_root = new.build(element("span", "root", [Mount::child(text("t", "x"))]));

        let mut writer = DiffWriter::new();
        reconcile(&mut new, new_root, &mut old, old_root, &mut writer);
        let records = writer.finish().unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[0].removed);
        assert_eq!(records[0].name, "div");
        assert!(records[0].children.is_none());
        assert!(!records[1].removed);
        assert_eq!(records[1].name, "span");
        assert_eq!(records[1].children.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_unchanged_trees_render_empty_array() {
        let mut old = DomTree::new();
        let old_root = old.build(element("p", "p", [Mount::attr("class", "a")]));
        let mut new = DomTree::new();
        let new_root = new.build(element("p", "p", [Mount::attr("class", "a")]));
        assert_eq!(render_diff(&mut new, new_root, &mut old, old_root).unwrap(), "[]");
    }
}
