//! vtree HTML - rendering for vtree
//!
//! HTML output with identity metadata, JSON node records, and the JSON diff
//! produced by reconciling two trees.
//!
//! ```
//! use vtree_dom::{DomTree, Mount, element, text};
//! use vtree_html::HtmlSerializer;
//!
//! let mut tree = DomTree::new();
//! let root = tree.build(element("p", "greeting", [Mount::child(text("t", "hi"))]));
//! let html = HtmlSerializer::new().render(&tree, root);
//! assert!(html.starts_with("<p id=\"greeting\""));
//! assert!(html.ends_with(">hi</p>"));
//! ```

mod diff;
mod error;
mod json;
mod serializer;

pub use diff::{DiffWriter, render_diff};
pub use error::{RenderError, RenderResult};
pub use json::{AttrJson, EventJson, JsonSerializer, NodeJson};
pub use serializer::HtmlSerializer;
