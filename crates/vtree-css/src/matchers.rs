//! Primitive matchers and combinators
//!
//! Every function returns a [`Selector`]. Unless noted, only element nodes
//! match.

use regex::Regex;
use vtree_dom::{DomTree, Node, NodeId, NodeType};

use crate::Selector;
use crate::nth::Nth;

fn element(tree: &DomTree, node: NodeId) -> Option<&Node> {
    tree.get(node).filter(|n| n.is_element())
}

/// Values of attribute `key`. `id` falls back to the node id.
fn attr_values<'a>(node: &'a Node, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    let fallback = (key == "id" && !node.attrs().has("id")).then(|| node.id());
    node.attrs()
        .iter()
        .filter(move |a| a.name.eq_ignore_ascii_case(key))
        .map(|a| a.value.as_str())
        .chain(fallback)
}

/// Elements of any type
pub fn universal() -> Selector {
    Selector::new(|tree, node| element(tree, node).is_some())
}

/// Elements named `tag`, ASCII case-insensitively
pub fn tag(tag: String) -> Selector {
    Selector::new(move |tree, node| {
        element(tree, node).is_some_and(|n| n.name().eq_ignore_ascii_case(&tag))
    })
}

/// Elements whose node id is `id`
pub fn id(id: String) -> Selector {
    Selector::new(move |tree, node| element(tree, node).is_some_and(|n| n.id() == id))
}

/// Some value of `key` satisfies `f`
pub fn attribute(
    key: String,
    f: impl Fn(&str) -> bool + Send + Sync + 'static,
) -> Selector {
    Selector::new(move |tree, node| {
        element(tree, node).is_some_and(|n| attr_values(n, &key).any(&f))
    })
}

/// `[key]`
pub fn attribute_exists(key: String) -> Selector {
    attribute(key, |_| true)
}

/// `[key=val]`
pub fn attribute_equals(key: String, val: String) -> Selector {
    attribute(key, move |s| s == val)
}

/// `[key!=val]`: no value of `key` equals `val`, or there is none
pub fn attribute_not_equal(key: String, val: String) -> Selector {
    Selector::new(move |tree, node| {
        element(tree, node).is_some_and(|n| attr_values(n, &key).all(|s| s != val))
    })
}

/// `[key~=val]`: whitespace-separated token
pub fn attribute_includes(key: String, val: String) -> Selector {
    attribute(key, move |s| s.split_ascii_whitespace().any(|token| token == val))
}

/// `[key|=val]`: exact, or followed by a hyphen
pub fn attribute_dash_match(key: String, val: String) -> Selector {
    attribute(key, move |s| {
        s == val || (s.len() > val.len() && s.starts_with(val.as_str()) && s.as_bytes()[val.len()] == b'-')
    })
}

/// `[key^=val]`
pub fn attribute_prefix(key: String, val: String) -> Selector {
    attribute(key, move |s| !s.trim().is_empty() && s.starts_with(val.as_str()))
}

/// `[key$=val]`
pub fn attribute_suffix(key: String, val: String) -> Selector {
    attribute(key, move |s| !s.trim().is_empty() && s.ends_with(val.as_str()))
}

/// `[key*=val]`
pub fn attribute_substring(key: String, val: String) -> Selector {
    attribute(key, move |s| !s.trim().is_empty() && s.contains(val.as_str()))
}

/// `[key#=regex]`
pub fn attribute_regex(key: String, rx: Regex) -> Selector {
    attribute(key, move |s| rx.is_match(s))
}

/// `:contains()`; `val` is already lower-cased
pub fn text_contains(val: String, own: bool) -> Selector {
    Selector::new(move |tree, node| {
        element(tree, node).is_some()
            && text_of(tree, node, own).to_lowercase().contains(&val)
    })
}

/// `:matches()`
pub fn text_regex(rx: Regex, own: bool) -> Selector {
    Selector::new(move |tree, node| {
        element(tree, node).is_some() && rx.is_match(&text_of(tree, node, own))
    })
}

fn text_of(tree: &DomTree, node: NodeId, own: bool) -> String {
    if own {
        tree.own_text(node)
    } else {
        tree.text_content(node)
    }
}

/// Element siblings counted by a node's position rules
fn sibling_position(tree: &DomTree, node: NodeId, of_type: bool) -> Option<(i32, i32)> {
    let n = element(tree, node)?;
    let parent = tree.parent(node)?;
    let mut position = None;
    let mut count = 0;
    for child in tree.children(parent) {
        let Some(c) = element(tree, child) else {
            continue;
        };
        if of_type && c.name() != n.name() {
            continue;
        }
        count += 1;
        if child == node {
            position = Some(count);
        }
    }
    position.map(|p| (p, count))
}

/// `:nth-child()` and friends; `last` counts from the end
pub fn nth_child(nth: Nth, last: bool, of_type: bool) -> Selector {
    Selector::new(move |tree, node| {
        sibling_position(tree, node, of_type).is_some_and(|(position, count)| {
            let position = if last { count - position + 1 } else { position };
            nth.matches(position)
        })
    })
}

/// `:only-child`, `:only-of-type`
pub fn only_child(of_type: bool) -> Selector {
    Selector::new(move |tree, node| {
        sibling_position(tree, node, of_type).is_some_and(|(_, count)| count == 1)
    })
}

/// `:input`: form controls
pub fn input() -> Selector {
    Selector::new(|tree, node| {
        element(tree, node).is_some_and(|n| {
            ["input", "select", "textarea", "button"]
                .iter()
                .any(|name| n.name().eq_ignore_ascii_case(name))
        })
    })
}

/// `:empty`: no element or text children
pub fn empty() -> Selector {
    Selector::new(|tree, node| {
        element(tree, node).is_some()
            && !tree.children(node).any(|child| {
                tree.get(child)
                    .is_some_and(|c| matches!(c.kind(), NodeType::Element | NodeType::Text))
            })
    })
}

/// `:root`: top element, under a document or fragment at most
pub fn root() -> Selector {
    Selector::new(|tree, node| {
        element(tree, node).is_some()
            && tree.parent(node).and_then(|p| tree.get(p)).is_none_or(|p| {
                matches!(p.kind(), NodeType::Document | NodeType::DocumentFragment)
            })
    })
}

/// `:not()`
pub fn negation(inner: Selector) -> Selector {
    Selector::new(move |tree, node| element(tree, node).is_some() && !inner.matches(tree, node))
}

/// `:has()`: some descendant matches
pub fn has_descendant(inner: Selector) -> Selector {
    Selector::new(move |tree, node| {
        element(tree, node).is_some()
            && tree.descendants(node).skip(1).any(|d| inner.matches(tree, d))
    })
}

/// `:haschild()`: some direct child matches
pub fn has_child(inner: Selector) -> Selector {
    Selector::new(move |tree, node| {
        element(tree, node).is_some() && tree.children(node).any(|c| inner.matches(tree, c))
    })
}

/// `a b`
pub fn descendant(ancestor: Selector, inner: Selector) -> Selector {
    Selector::new(move |tree, node| {
        inner.matches(tree, node) && tree.ancestors(node).any(|a| ancestor.matches(tree, a))
    })
}

/// `a > b`
pub fn child(parent: Selector, inner: Selector) -> Selector {
    Selector::new(move |tree, node| {
        inner.matches(tree, node) && tree.parent(node).is_some_and(|p| parent.matches(tree, p))
    })
}

/// `a + b` (adjacent) and `a ~ b`. The adjacent form skips text and
/// comment siblings.
pub fn sibling(before: Selector, inner: Selector, adjacent: bool) -> Selector {
    Selector::new(move |tree, node| {
        if !inner.matches(tree, node) {
            return false;
        }
        let mut previous = std::iter::successors(tree.previous_sibling(node), |&s| {
            tree.previous_sibling(s)
        });
        if adjacent {
            previous
                .find(|&s| tree.get(s).is_some_and(|n| !n.kind().is_character_data()))
                .is_some_and(|s| before.matches(tree, s))
        } else {
            previous.any(|s| before.matches(tree, s))
        }
    })
}
