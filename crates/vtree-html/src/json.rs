//! JSON Serialization
//!
//! Node records in the wire shape clients consume. The shallow form carries
//! identity only; the full form adds attributes, events and children.

use serde::{Deserialize, Serialize};
use vtree_dom::{DomTree, Node, NodeId, REF_SEPARATOR};

use crate::{RenderError, RenderResult};

/// One attribute in a node record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrJson {
    pub name: String,
    pub value: String,
}

/// One bound event in a node record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventJson {
    pub name: String,
    pub prevent_default: bool,
    pub stop_propagation: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Node record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeJson {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(rename = "ref")]
    pub reference: String,
    pub type_name: String,
    pub atid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub removed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub id: String,
    pub tid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Vec<AttrJson>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<EventJson>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NodeJson>>,
}

impl NodeJson {
    fn shallow(tree: &DomTree, node_id: NodeId, node: &Node, separator: &str) -> Self {
        let kind = node.kind();
        Self {
            kind: kind.code(),
            reference: tree.reference_path(node_id, separator),
            type_name: kind.type_name().to_string(),
            atid: node.atid().to_string(),
            name: node.name().to_string(),
            removed: node.removed(),
            content: node.content().map(str::to_string),
            id: node.id().to_string(),
            tid: node.tid().to_string(),
            attrs: None,
            events: None,
            children: None,
        }
    }
}

/// JSON serializer
#[derive(Debug, Clone)]
pub struct JsonSerializer {
    /// Separator for `ref` paths
    pub separator: String,
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self {
            separator: REF_SEPARATOR.to_string(),
        }
    }
}

impl JsonSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    /// Identity-only record
    pub fn shallow_node(&self, tree: &DomTree, node: NodeId) -> RenderResult<NodeJson> {
        let n = tree.get(node).ok_or(RenderError::UnknownNode(node))?;
        Ok(NodeJson::shallow(tree, node, n, &self.separator))
    }

    /// Full record including the subtree
    pub fn node(&self, tree: &DomTree, node: NodeId) -> RenderResult<NodeJson> {
        let n = tree.get(node).ok_or(RenderError::UnknownNode(node))?;
        let mut record = NodeJson::shallow(tree, node, n, &self.separator);

        record.attrs = Some(
            n.attrs()
                .iter()
                .map(|a| AttrJson {
                    name: a.name.clone(),
                    value: a.value.clone(),
                })
                .collect(),
        );
        record.events = Some(
            n.events()
                .iter()
                .map(|e| EventJson {
                    name: e.name.clone(),
                    prevent_default: e.prevent_default,
                    stop_propagation: e.stop_propagation,
                })
                .collect(),
        );
        record.children = Some(
            tree.children(node)
                .map(|child| self.node(tree, child))
                .collect::<RenderResult<_>>()?,
        );
        Ok(record)
    }

    pub fn to_value(&self, tree: &DomTree, node: NodeId) -> RenderResult<serde_json::Value> {
        Ok(serde_json::to_value(self.node(tree, node)?)?)
    }

    pub fn to_shallow_value(&self, tree: &DomTree, node: NodeId) -> RenderResult<serde_json::Value> {
        Ok(serde_json::to_value(self.shallow_node(tree, node)?)?)
    }

    /// Full record as a JSON string
    pub fn to_string(&self, tree: &DomTree, node: NodeId) -> RenderResult<String> {
        Ok(serde_json::to_string(&self.node(tree, node)?)?)
    }
}
