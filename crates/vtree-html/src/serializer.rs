//! HTML Serialization
//!
//! Renders a subtree as HTML carrying the identity metadata a client needs
//! to patch its copy: `id`, `_atid`, `_tid`, `_removed`, `_ref`, then the
//! user attributes and an `events` list.

use vtree_dom::{DomTree, Node, NodeId, NodeType, REF_SEPARATOR};

/// Void elements (self-closing, no end tag)
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// HTML serializer
#[derive(Debug, Clone)]
pub struct HtmlSerializer {
    /// Whether to put each node on its own indented line
    pub pretty_print: bool,
    /// Indentation string
    pub indent: String,
    /// Separator for `_ref` paths
    pub separator: String,
}

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self {
            pretty_print: false,
            indent: "  ".to_string(),
            separator: REF_SEPARATOR.to_string(),
        }
    }
}

impl HtmlSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self {
            pretty_print: true,
            ..Self::default()
        }
    }

    /// Render a node and its descendants
    pub fn render(&self, tree: &DomTree, node: NodeId) -> String {
        let mut output = String::new();
        self.render_node(tree, node, &mut output, 0, true);
        output
    }

    /// Render a node without its children
    pub fn render_shallow(&self, tree: &DomTree, node: NodeId) -> String {
        let mut output = String::new();
        self.render_node(tree, node, &mut output, 0, false);
        output
    }

    fn render_node(
        &self,
        tree: &DomTree,
        node_id: NodeId,
        output: &mut String,
        depth: usize,
        deep: bool,
    ) {
        let Some(node) = tree.get(node_id) else {
            return;
        };

        match node.kind() {
            NodeType::Document | NodeType::DocumentFragment => {
                if deep {
                    self.render_children(tree, node_id, output, depth);
                }
            }
            NodeType::Element => {
                let tag = node.name();
                self.new_line(output, depth);
                output.push('<');
                output.push_str(tag);
                self.render_attributes(tree, node_id, node, output);

                let has_children = deep && tree.first_child(node_id).is_some();
                if !has_children && VOID_ELEMENTS.contains(&tag) {
                    output.push_str(" />");
                    return;
                }
                output.push('>');
                if has_children {
                    self.render_children(tree, node_id, output, depth + 1);
                    self.new_line(output, depth);
                }
                output.push_str("</");
                output.push_str(tag);
                output.push('>');
            }
            NodeType::Text => {
                self.new_line(output, depth);
                escape_text(node.content().unwrap_or_default(), output);
            }
            NodeType::Comment => {
                self.new_line(output, depth);
                output.push_str("<!--");
                escape_comment(node.content().unwrap_or_default(), output);
                output.push_str("-->");
            }
        }
    }

    fn render_children(&self, tree: &DomTree, parent: NodeId, output: &mut String, depth: usize) {
        for child in tree.children(parent) {
            self.render_node(tree, child, output, depth, true);
        }
    }

    fn render_attributes(&self, tree: &DomTree, node_id: NodeId, node: &Node, output: &mut String) {
        push_attribute("id", node.id(), output);
        push_attribute("_atid", &node.atid().to_string(), output);
        push_attribute("_tid", &node.tid().to_string(), output);
        if node.removed() {
            push_attribute("_removed", "true", output);
        }
        push_attribute("_ref", &tree.reference_path(node_id, &self.separator), output);

        for attr in node.attrs().iter() {
            push_attribute(&attr.name, &attr.value, output);
        }

        if !node.events().is_empty() {
            push_attribute("events", &event_list(node), output);
        }
    }

    fn new_line(&self, output: &mut String, depth: usize) {
        if !self.pretty_print || output.is_empty() {
            return;
        }
        output.push('\n');
        for _ in 0..depth {
            output.push_str(&self.indent);
        }
    }
}

/// `name-PS` per bound descriptor, space separated
fn event_list(node: &Node) -> String {
    node.events()
        .iter()
        .map(|e| {
            format!(
                "{}-{}{}",
                e.name,
                u8::from(e.prevent_default),
                u8::from(e.stop_propagation)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_attribute(name: &str, value: &str, output: &mut String) {
    output.push(' ');
    output.push_str(name);
    output.push_str("=\"");
    escape_attribute(value, output);
    output.push('"');
}

/// Escape text content for HTML
fn escape_text(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}

/// Break up `--` runs and a trailing `-` so content cannot close the
/// comment early
fn escape_comment(text: &str, output: &mut String) {
    let mut previous = None;
    for c in text.chars() {
        if c == '-' && previous == Some('-') {
            output.push(' ');
        }
        output.push(c);
        previous = Some(c);
    }
    if previous == Some('-') {
        output.push(' ');
    }
}

/// Escape attribute value
fn escape_attribute(text: &str, output: &mut String) {
    for c in text.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            _ => output.push(c),
        }
    }
}
