//! vtree
//!
//! A virtual DOM: an arena tree with compact child lists, CSS selector
//! queries, reconciliation between tree generations, and HTML/JSON output.
//!
//! # Example
//! ```
//! use vtree::{Config, RenderSession};
//! use vtree::dom::{DomTree, Mount, element, text};
//!
//! let mut session = RenderSession::new(Config::default());
//!
//! let mut tree = DomTree::new();
//! let root = tree.build(element("p", "msg", [Mount::child(text("t", "hello"))]));
//! let frame = session.render(tree, root).unwrap();
//! assert!(frame.html.contains(">hello</p>"));
//! assert_eq!(frame.changes, 1);
//! ```

mod config;
mod session;

pub use config::Config;
pub use session::{Frame, RenderSession};

// Re-export sub-crates for advanced usage
pub use vtree_css as css;
pub use vtree_dom as dom;
pub use vtree_html as html;

pub use vtree_css::{Selector, SelectorError, query};
pub use vtree_dom::{DomError, DomResult, DomTree, NodeId, NodeType, reconcile};
pub use vtree_html::{HtmlSerializer, JsonSerializer, RenderError, RenderResult, render_diff};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
