//! vtree CSS - selector engine
//!
//! Compiles CSS3 selectors (plus the jQuery-style `:contains`, `:has`,
//! `:matches` and `:input` extensions) into predicates over a
//! [`vtree_dom::DomTree`].
//!
//! ```
//! use vtree_css::query;
//! use vtree_dom::{DomTree, Mount, element};
//!
//! let mut tree = DomTree::new();
//! let root = tree.build(element("div", "root", [
//!     Mount::child(element("span", "x", [])),
//! ]));
//! let selector = query("div > span#x").unwrap();
//! assert_eq!(selector.match_all(&tree, root).len(), 1);
//! ```

mod error;
pub mod matchers;
mod nth;
mod parser;
mod selector;

pub use error::{SelectorError, SelectorResult};
pub use nth::Nth;
pub use selector::Selector;

use parser::Parser;

/// Compile a selector group. Fails if input remains after the last
/// complete selector.
pub fn query(selector: &str) -> SelectorResult<Selector> {
    let mut parser = Parser::new(selector);
    let compiled = parser.parse_selector_group()?;
    let left = parser.remaining();
    if left > 0 {
        return Err(SelectorError::TrailingInput {
            selector: selector.to_string(),
            left,
        });
    }
    tracing::trace!(selector, "compiled selector");
    Ok(compiled)
}
