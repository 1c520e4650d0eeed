//! Comprehensive tests for vtree-css
//!
//! Parsing and matching through `query` on small hand-built trees.

use proptest::prelude::*;
use vtree_css::{Nth, SelectorError, query};
use vtree_dom::{DomTree, Mount, NodeId, comment, document, element, text};

fn ids(tree: &DomTree, nodes: Vec<NodeId>) -> Vec<String> {
    nodes
        .into_iter()
        .map(|n| tree.get(n).unwrap().id().to_string())
        .collect()
}

fn select(tree: &DomTree, root: NodeId, selector: &str) -> Vec<String> {
    let compiled = query(selector).unwrap_or_else(|e| panic!("{selector}: {e}"));
    ids(tree, compiled.match_all(tree, root))
}

fn page() -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let root = tree.build(document(
        "doc",
        [Mount::child(element(
            "div",
            "app",
            [
                Mount::attr("class", "shell dark"),
                Mount::child(element(
                    "nav",
                    "nav",
                    [
                        Mount::child(element(
                            "a",
                            "docs",
                            [Mount::attr("href", "/docs/page"), Mount::child(text("t1", "Read the Docs"))],
                        )),
                        Mount::child(element(
                            "a",
                            "blog",
                            [Mount::attr("href", "/blog/"), Mount::child(text("t2", "Blog"))],
                        )),
                    ],
                )),
                Mount::child(element(
                    "div",
                    "content",
                    [
                        Mount::child(element("span", "x", [])),
                        Mount::child(comment("c1", "separator")),
                        Mount::child(element("p", "intro", [Mount::attr("lang", "en-GB")])),
                        Mount::child(element("span", "y", [Mount::child(element("span", "x2", []))])),
                    ],
                )),
                Mount::child(element(
                    "form",
                    "form",
                    [
                        Mount::child(element("input", "name", [Mount::attr("type", "text")])),
                        Mount::child(element("button", "go", [])),
                    ],
                )),
            ],
        ))],
    ));
    (tree, root)
}

fn ten_items() -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let items: Vec<_> = (1..=10)
        .map(|i| Mount::child(element("li", format!("i{i}"), [])))
        .collect();
    let root = tree.build(element("ul", "list", items));
    (tree, root)
}

// ============================================================================
// TYPE, ID AND COMBINATORS
// ============================================================================

#[test]
fn test_type_selector_matches_only_that_tag() {
    let (tree, root) = page();
    assert_eq!(select(&tree, root, "div"), vec!["app", "content"]);
    assert_eq!(select(&tree, root, "DIV"), vec!["app", "content"]);
}

#[test]
fn test_child_with_id() {
    let (tree, root) = page();
    assert_eq!(select(&tree, root, "div > span#x"), vec!["x"]);
    assert_eq!(select(&tree, root, "div span"), vec!["x", "y", "x2"]);
    assert_eq!(select(&tree, root, "span > span"), vec!["x2"]);
}

#[test]
fn test_sibling_combinators() {
    let (tree, root) = page();
    assert_eq!(select(&tree, root, "span + p"), vec!["intro"]);
    assert_eq!(select(&tree, root, "span ~ span"), vec!["y"]);
    assert_eq!(select(&tree, root, "p+span"), vec!["y"]);
}

#[test]
fn test_group_and_universal() {
    let (tree, root) = page();
    assert_eq!(select(&tree, root, "nav, form"), vec!["nav", "form"]);
    assert_eq!(select(&tree, root, "form > *"), vec!["name", "go"]);
    assert_eq!(select(&tree, root, "/* nav links */ nav > a"), vec!["docs", "blog"]);
}

// ============================================================================
// ATTRIBUTES
// ============================================================================

#[test]
fn test_regex_attribute() {
    let (tree, root) = page();
    assert_eq!(select(&tree, root, "a[href#=^/docs/]"), vec!["docs"]);
    assert!(select(&tree, root, "a[href#=^/blog/x]").is_empty());
    assert_eq!(select(&tree, root, "a[href#=(^/blog/$)]"), vec!["blog"]);
}

#[test]
fn test_attribute_operators() {
    let (tree, root) = page();
    assert_eq!(select(&tree, root, "[href]"), vec!["docs", "blog"]);
    assert_eq!(select(&tree, root, "a[href='/blog/']"), vec!["blog"]);
    assert_eq!(select(&tree, root, "a[href!=\"/blog/\"]"), vec!["docs"]);
    assert_eq!(select(&tree, root, "[class~=dark]"), vec!["app"]);
    assert_eq!(select(&tree, root, ".shell.dark"), vec!["app"]);
    assert_eq!(select(&tree, root, "[lang|=en]"), vec!["intro"]);
    assert_eq!(select(&tree, root, "[href^='/d']"), vec!["docs"]);
    assert_eq!(select(&tree, root, "[href$='page']"), vec!["docs"]);
    assert_eq!(select(&tree, root, "[href*=log]"), vec!["blog"]);
    assert_eq!(select(&tree, root, "[ TYPE = text ]"), vec!["name"]);
    assert_eq!(select(&tree, root, "[id=content]"), vec!["content"]);
}

// ============================================================================
// PSEUDO-CLASSES
// ============================================================================

#[test]
fn test_nth_child_arithmetic() {
    let (tree, root) = ten_items();
    let odd = vec!["i1", "i3", "i5", "i7", "i9"];
    assert_eq!(select(&tree, root, "li:nth-child(2n+1)"), odd);
    assert_eq!(select(&tree, root, "li:nth-child(odd)"), odd);
    assert_eq!(select(&tree, root, "li:nth-child(-n+3)"), vec!["i1", "i2", "i3"]);
    assert_eq!(select(&tree, root, "li:nth-child( 3n - 1 )"), vec!["i2", "i5", "i8"]);
    assert_eq!(select(&tree, root, "li:nth-last-child(2)"), vec!["i9"]);
    assert_eq!(select(&tree, root, "li:nth-child(even):nth-child(-n+5)"), vec!["i2", "i4"]);
}

#[test]
fn test_nth_child_with_extreme_offsets() {
    let (tree, root) = ten_items();
    assert_eq!(select(&tree, root, "li:nth-child(n-2147483647)").len(), 10);
    assert!(select(&tree, root, "li:nth-child(-n-2147483647)").is_empty());
    assert!(select(&tree, root, "li:nth-child(2147483647)").is_empty());
    assert_eq!(select(&tree, root, "li:nth-last-child(2147483647n+1)"), vec!["i10"]);
}

#[test]
fn test_structural_pseudo_classes() {
    let (tree, root) = page();
    assert_eq!(select(&tree, root, "span:first-child"), vec!["x", "x2"]);
    assert_eq!(select(&tree, root, "#content > :last-child"), vec!["y"]);
    assert_eq!(select(&tree, root, "p:only-of-type"), vec!["intro"]);
    assert_eq!(select(&tree, root, "span:only-child"), vec!["x2"]);
    assert_eq!(select(&tree, root, "span:empty"), vec!["x", "x2"]);
    assert_eq!(select(&tree, root, ":root"), vec!["app"]);
    assert_eq!(select(&tree, root, ":input"), vec!["name", "go"]);
}

#[test]
fn test_logical_pseudo_classes() {
    let (tree, root) = page();
    assert_eq!(select(&tree, root, "a:not([href^='/blog'])"), vec!["docs"]);
    assert_eq!(select(&tree, root, "div:has(span#x2)"), vec!["app", "content"]);
    assert_eq!(select(&tree, root, "div:haschild(nav)"), vec!["app"]);
}

#[test]
fn test_text_pseudo_classes() {
    let (tree, root) = page();
    assert_eq!(select(&tree, root, "a:contains('read THE')"), vec!["docs"]);
    assert_eq!(select(&tree, root, "nav:contains(blog)"), vec!["nav"]);
    assert!(select(&tree, root, "nav:containsown(blog)").is_empty());
    assert_eq!(select(&tree, root, "a:matches(^B)"), vec!["blog"]);
    assert!(select(&tree, root, "a:matches(^b)").is_empty());
    assert_eq!(select(&tree, root, "a:matchesown([dD]ocs$)"), vec!["docs"]);
}

#[test]
fn test_match_first_and_filter() {
    let (tree, root) = page();
    let links = query("a").unwrap();
    let first = links.match_first(&tree, root).unwrap();
    assert_eq!(tree.get(first).unwrap().id(), "docs");

    let spans = query("span").unwrap().match_all(&tree, root);
    let inner = query("span span").unwrap().filter(&tree, &spans);
    assert_eq!(ids(&tree, inner), vec!["x2"]);
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_parse_errors() {
    assert!(matches!(query(""), Err(SelectorError::UnexpectedEof { .. })));
    assert_eq!(
        query("div )"),
        Err(SelectorError::TrailingInput {
            selector: "div )".to_string(),
            left: 1
        })
    );
    assert_eq!(
        query("p:hover"),
        Err(SelectorError::UnknownPseudoClass("hover".to_string()))
    );
    assert!(matches!(query("a[href"), Err(SelectorError::UnexpectedEof { .. })));
    assert!(matches!(query("a[href@=x]"), Err(SelectorError::UnsupportedOperator(_))));
    assert!(matches!(query("a[href%x]"), Err(SelectorError::Unexpected { .. })));
    assert!(matches!(query("a[href#=(]"), Err(SelectorError::UnexpectedEof { .. })));
    assert!(matches!(query("a[title='x]"), Err(SelectorError::UnterminatedString(_))));
    assert!(matches!(query(":not(p"), Err(SelectorError::ExpectedClosingParenthesis(_))));
    assert!(matches!(query(":nth-child"), Err(SelectorError::ExpectedParenthesis(_))));
    assert!(matches!(query(":nth-child(x)"), Err(SelectorError::NthInvalid(_))));
    assert!(matches!(query("li:matches(*x)"), Err(SelectorError::InvalidRegex { .. })));
}

#[test]
fn test_escaped_identifiers() {
    let mut tree = DomTree::new();
    let root = tree.build(element(
        "div",
        "root",
        [Mount::child(element("p", "a.b", [Mount::attr("class", "x:y")]))],
    ));
    assert_eq!(select(&tree, root, r"#a\.b"), vec!["a.b"]);
    assert_eq!(select(&tree, root, r".x\3a y"), vec!["a.b"]);
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_nth_matches_some_non_negative_n(a in -6i32..=6, b in -20i32..=20, position in 1i32..=60) {
        let expected = (0..=200).any(|n| a * n + b == position);
        prop_assert_eq!(Nth::new(a, b).matches(position), expected);
    }

    #[test]
    fn prop_nth_child_selects_matching_positions(a in -3i32..=3, b in -4i32..=12) {
        let (tree, root) = ten_items();
        let selector = format!("li:nth-child({a}n{b:+})");
        let expected: Vec<String> = (1..=10)
            .filter(|&p| Nth::new(a, b).matches(p))
            .map(|p| format!("i{p}"))
            .collect();
        prop_assert_eq!(select(&tree, root, &selector), expected);
    }
}
