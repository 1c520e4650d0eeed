//! Comprehensive tests for vtree
//!
//! Build, query, reconcile and render through the facade.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use vtree::dom::{Event, EventDescriptor, Mount, Responder, document, element, text};
use vtree::{Config, DomTree, NodeId, RenderSession, query};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn todo_list(items: &[&str]) -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let rows: Vec<_> = items
        .iter()
        .enumerate()
        .map(|(i, label)| {
            Mount::child(element(
                "li",
                format!("item{i}"),
                [Mount::attr("class", "todo"), Mount::child(text("label", *label))],
            ))
        })
        .collect();
    let root = tree.build(document(
        "page",
        [Mount::child(element("ul", "todos", rows))],
    ));
    (tree, root)
}

// ============================================================================
// SESSION
// ============================================================================

#[test]
fn test_session_diffs_successive_frames() -> Result<()> {
    init_tracing();
    let mut session = RenderSession::new(Config::default());

    let (tree, root) = todo_list(&["milk", "eggs"]);
    let first = session.render(tree, root)?;
    assert_eq!(first.changes, 1);

    let (tree, root) = todo_list(&["milk", "bread"]);
    let second = session.render(tree, root)?;
    let diff: Value = serde_json::from_str(&second.diff)?;
    let entries = diff.as_array().context("diff is an array")?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["content"], "bread");
    assert_eq!(entries[0]["ref"], "page/todos/item1/label");
    assert!(second.html.contains(">bread</li>"));
    Ok(())
}

#[test]
fn test_added_row_updates_list() -> Result<()> {
    init_tracing();
    let mut session = RenderSession::new(Config::default());
    let (tree, root) = todo_list(&["milk"]);
    session.render(tree, root)?;

    let (tree, root) = todo_list(&["milk", "eggs"]);
    let frame = session.render(tree, root)?;
    let diff: Value = serde_json::from_str(&frame.diff)?;
    assert_eq!(diff[0]["id"], "todos");
    assert_eq!(diff[0]["children"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn test_pretty_config_and_separator() -> Result<()> {
    let config = Config {
        pretty_print: true,
        indent: "\t".to_string(),
        ref_separator: ":".to_string(),
    };
    let mut session = RenderSession::new(config);
    let (tree, root) = todo_list(&["milk"]);
    let frame = session.render(tree, root)?;

    let lines: Vec<_> = frame.html.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("<ul id=\"todos\""));
    assert!(lines[1].starts_with("\t<li id=\"item0\""));
    assert!(lines[1].contains("_ref=\"page:todos:item0\""));
    assert_eq!(lines[2], "\t\tmilk");
    assert_eq!(lines[3], "\t</li>");
    assert_eq!(lines[4], "</ul>");
    Ok(())
}

// ============================================================================
// QUERY AND EVENTS
// ============================================================================

#[test]
fn test_query_then_dispatch() -> Result<()> {
    init_tracing();
    let (mut tree, root) = todo_list(&["milk", "eggs", "tea"]);
    let todos = query("ul > li.todo:nth-child(2)")?;
    let second = todos.match_first(&tree, root).context("second row")?;

    let descriptor = EventDescriptor::new(
        "click",
        Responder::event(|event: &mut Event| event.prevent_default()),
    );
    tree.node_mut(second)?.events_mut().add(descriptor);

    let mut click = Event::new("click");
    let fired = tree.dispatch(second, &mut click)?;
    assert_eq!(fired, 1);
    assert!(click.is_default_prevented());

    let mut session = RenderSession::new(Config::default());
    let frame = session.render(tree, root)?;
    assert!(frame.html.contains("events=\"click-00\""));
    Ok(())
}
