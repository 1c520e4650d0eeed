//! Selector parse errors
//!
//! Positions are byte offsets into the selector source.

/// Result type for selector parsing
pub type SelectorResult<T> = Result<T, SelectorError>;

/// Selector parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("expected {expected}, found EOF instead")]
    UnexpectedEof { expected: &'static str },

    #[error("expected {expected}, found {found:?} at {pos}")]
    Unexpected {
        expected: &'static str,
        found: char,
        pos: usize,
    },

    #[error("unterminated string starting at {0}")]
    UnterminatedString(usize),

    #[error("unescaped newline in string at {0}")]
    NewlineInString(usize),

    #[error("integer out of range at {0}")]
    IntegerOverflow(usize),

    #[error("invalid regular expression {pattern:?}: {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("attribute operator {0:?} is not supported")]
    UnsupportedOperator(String),

    #[error("unknown pseudoclass :{0}")]
    UnknownPseudoClass(String),

    #[error("expected 'odd' or 'even', found {0:?} instead")]
    InvalidNthKeyword(String),

    #[error("unexpected EOF while attempting to parse expression of form an+b")]
    NthEof,

    #[error("unexpected character at {0} while attempting to parse expression of form an+b")]
    NthInvalid(usize),

    #[error("expected '(' at {0}")]
    ExpectedParenthesis(usize),

    #[error("expected ')' at {0}")]
    ExpectedClosingParenthesis(usize),

    /// Input remained after a complete selector group
    #[error("parsing {selector:?}: {left} bytes left over")]
    TrailingInput { selector: String, left: usize },
}
