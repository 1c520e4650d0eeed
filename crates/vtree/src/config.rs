//! Rendering Configuration

use vtree_dom::REF_SEPARATOR;
use vtree_html::{DiffWriter, HtmlSerializer};

/// Rendering configuration options
#[derive(Debug, Clone)]
pub struct Config {
    /// Put each rendered node on its own indented line
    pub pretty_print: bool,

    /// Indentation per depth level when pretty printing
    pub indent: String,

    /// Separator joining ids in reference paths
    pub ref_separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pretty_print: false,
            indent: "  ".to_string(),
            ref_separator: REF_SEPARATOR.to_string(),
        }
    }
}

impl Config {
    pub(crate) fn html_serializer(&self) -> HtmlSerializer {
        HtmlSerializer {
            pretty_print: self.pretty_print,
            indent: self.indent.clone(),
            separator: self.ref_separator.clone(),
        }
    }

    pub(crate) fn diff_writer(&self) -> DiffWriter {
        DiffWriter::with_separator(self.ref_separator.clone())
    }
}
