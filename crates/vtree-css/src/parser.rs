//! Selector parser
//!
//! Recursive descent over the raw selector string. Each `parse_*` method
//! either advances the cursor and returns a compiled [`Selector`] or fails;
//! the cursor is meaningless after a failure.

use regex::Regex;

use crate::Selector;
use crate::error::{SelectorError, SelectorResult};
use crate::matchers;
use crate::nth::Nth;

#[inline]
fn is_name_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c > 127
}

#[inline]
fn is_name_char(c: u8) -> bool {
    is_name_start(c) || c == b'-' || c.is_ascii_digit()
}

/// Cursor over a selector string
pub(crate) struct Parser<'a> {
    pub(crate) src: &'a str,
    pub(crate) pos: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    #[inline]
    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Bytes not consumed yet
    pub(crate) fn remaining(&self) -> usize {
        self.src.len().saturating_sub(self.pos)
    }

    fn current_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    /// Consume one full character
    fn next_char(&mut self) -> Option<char> {
        let ch = self.current_char()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn unexpected(&self, expected: &'static str) -> SelectorError {
        match self.current_char() {
            Some(found) => SelectorError::Unexpected {
                expected,
                found,
                pos: self.pos,
            },
            None => SelectorError::UnexpectedEof { expected },
        }
    }

    /// Skip whitespace and `/* */` comments. Returns true if anything was
    /// skipped.
    pub(crate) fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n' | b'\x0c') => self.pos += 1,
                Some(b'/') if self.src[self.pos..].starts_with("/*") => {
                    match self.src[self.pos + 2..].find("*/") {
                        Some(end) => self.pos += end + 4,
                        None => break,
                    }
                }
                _ => break,
            }
        }
        self.pos > start
    }

    /// Backslash escape: 1-6 hex digits plus one optional whitespace, or a
    /// literal character
    fn parse_escape(&mut self) -> SelectorResult<char> {
        let bytes = self.bytes();
        let start = self.pos + 1;
        if start >= bytes.len() {
            return Err(SelectorError::UnexpectedEof {
                expected: "escape sequence",
            });
        }

        let mut end = start;
        while end < bytes.len() && end - start < 6 && bytes[end].is_ascii_hexdigit() {
            end += 1;
        }
        if end > start {
            let code = u32::from_str_radix(&self.src[start..end], 16)
                .map_err(|_| SelectorError::IntegerOverflow(start))?;
            let ch = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
            match bytes.get(end) {
                Some(b'\r') if bytes.get(end + 1) == Some(&b'\n') => end += 2,
                Some(b' ' | b'\t' | b'\n' | b'\r' | b'\x0c') => end += 1,
                _ => {}
            }
            self.pos = end;
            return Ok(ch);
        }

        self.pos = start;
        self.next_char().ok_or(SelectorError::UnexpectedEof {
            expected: "escape sequence",
        })
    }

    /// Identifier: optional leading `-`, then a name
    fn parse_identifier(&mut self) -> SelectorResult<String> {
        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
        }
        match self.peek() {
            Some(c) if is_name_start(c) || c == b'\\' => {}
            _ => return Err(self.unexpected("identifier")),
        }
        let name = self.parse_name()?;
        Ok(if negative { format!("-{name}") } else { name })
    }

    /// Run of name characters and escapes
    pub(crate) fn parse_name(&mut self) -> SelectorResult<String> {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if is_name_char(c) {
                if let Some(ch) = self.next_char() {
                    name.push(ch);
                }
            } else if c == b'\\' {
                name.push(self.parse_escape()?);
            } else {
                break;
            }
        }
        if name.is_empty() {
            return Err(self.unexpected("name"));
        }
        Ok(name)
    }

    /// Quoted string; escaped newlines are dropped
    fn parse_string(&mut self) -> SelectorResult<String> {
        let open = self.pos;
        let Some(quote) = self.peek().filter(|q| matches!(q, b'"' | b'\'')) else {
            return Err(self.unexpected("quoted string"));
        };
        self.pos += 1;

        let mut value = String::new();
        loop {
            let bytes = self.bytes();
            match self.peek() {
                None => return Err(SelectorError::UnterminatedString(open)),
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(value);
                }
                Some(b'\\') => match bytes.get(self.pos + 1) {
                    None => return Err(SelectorError::UnterminatedString(open)),
                    Some(b'\r') if bytes.get(self.pos + 2) == Some(&b'\n') => self.pos += 3,
                    Some(b'\n' | b'\r' | b'\x0c') => self.pos += 2,
                    Some(_) => value.push(self.parse_escape()?),
                },
                Some(b'\n' | b'\r' | b'\x0c') => {
                    return Err(SelectorError::NewlineInString(self.pos));
                }
                Some(_) => {
                    if let Some(ch) = self.next_char() {
                        value.push(ch);
                    }
                }
            }
        }
    }

    /// Raw regex up to the first unbalanced `)` or `]`
    fn parse_regex(&mut self) -> SelectorResult<Regex> {
        let start = self.pos;
        let mut open = 0i32;
        let mut end = start;
        let bytes = self.bytes();
        loop {
            match bytes.get(end) {
                None => {
                    return Err(SelectorError::UnexpectedEof {
                        expected: "regular expression",
                    });
                }
                Some(b'(' | b'[') => open += 1,
                Some(b')' | b']') => {
                    open -= 1;
                    if open < 0 {
                        break;
                    }
                }
                Some(_) => {}
            }
            end += 1;
        }

        let pattern = &self.src[start..end];
        let rx = Regex::new(pattern).map_err(|err| SelectorError::InvalidRegex {
            pattern: pattern.to_string(),
            message: err.to_string(),
        })?;
        self.pos = end;
        Ok(rx)
    }

    /// Unsigned decimal integer
    pub(crate) fn parse_integer(&mut self) -> SelectorResult<i32> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.unexpected("integer"));
        }
        self.src[start..self.pos]
            .parse()
            .map_err(|_| SelectorError::IntegerOverflow(start))
    }

    /// `(` followed by optional whitespace
    fn consume_parenthesis(&mut self) -> SelectorResult<()> {
        if self.peek() != Some(b'(') {
            return Err(SelectorError::ExpectedParenthesis(self.pos));
        }
        self.pos += 1;
        self.skip_whitespace();
        Ok(())
    }

    /// Optional whitespace followed by `)`
    fn consume_closing_parenthesis(&mut self) -> SelectorResult<()> {
        let start = self.pos;
        self.skip_whitespace();
        if self.peek() == Some(b')') {
            self.pos += 1;
            return Ok(());
        }
        self.pos = start;
        Err(SelectorError::ExpectedClosingParenthesis(start))
    }

    /// Comma-separated union of selectors
    pub(crate) fn parse_selector_group(&mut self) -> SelectorResult<Selector> {
        let mut result = self.parse_selector()?;
        while self.peek() == Some(b',') {
            self.pos += 1;
            result = result.or(self.parse_selector()?);
        }
        Ok(result)
    }

    /// Compound selectors joined by combinators. Stops before `,` and `)`.
    fn parse_selector(&mut self) -> SelectorResult<Selector> {
        self.skip_whitespace();
        let mut result = self.parse_simple_selector_sequence()?;
        loop {
            let mut combinator = if self.skip_whitespace() { Some(b' ') } else { None };
            match self.peek() {
                None | Some(b',' | b')') => return Ok(result),
                Some(c @ (b'+' | b'>' | b'~')) => {
                    combinator = Some(c);
                    self.pos += 1;
                    self.skip_whitespace();
                }
                Some(_) => {}
            }
            let Some(combinator) = combinator else {
                return Ok(result);
            };

            let next = self.parse_simple_selector_sequence()?;
            result = match combinator {
                b'>' => matchers::child(result, next),
                b'+' => matchers::sibling(result, next, true),
                b'~' => matchers::sibling(result, next, false),
                _ => matchers::descendant(result, next),
            };
        }
    }

    /// Optional type or `*`, then any number of `#id`, `.class`, `[attr]`
    /// and `:pseudo`
    fn parse_simple_selector_sequence(&mut self) -> SelectorResult<Selector> {
        let mut result = match self.peek() {
            None => {
                return Err(SelectorError::UnexpectedEof {
                    expected: "selector",
                });
            }
            Some(b'*') => {
                self.pos += 1;
                None
            }
            Some(b'#' | b'.' | b'[' | b':') => None,
            Some(_) => Some(matchers::tag(self.parse_identifier()?.to_ascii_lowercase())),
        };

        loop {
            let next = match self.peek() {
                Some(b'#') => self.parse_id_selector()?,
                Some(b'.') => self.parse_class_selector()?,
                Some(b'[') => self.parse_attribute_selector()?,
                Some(b':') => self.parse_pseudo_class_selector()?,
                _ => break,
            };
            result = Some(match result {
                Some(current) => current.and(next),
                None => next,
            });
        }
        Ok(result.unwrap_or_else(matchers::universal))
    }

    fn parse_id_selector(&mut self) -> SelectorResult<Selector> {
        self.pos += 1;
        Ok(matchers::id(self.parse_name()?))
    }

    fn parse_class_selector(&mut self) -> SelectorResult<Selector> {
        self.pos += 1;
        Ok(matchers::attribute_includes("class".to_string(), self.parse_identifier()?))
    }

    fn parse_attribute_selector(&mut self) -> SelectorResult<Selector> {
        const EXPECTED: &str = "attribute selector";
        self.pos += 1;
        self.skip_whitespace();
        let key = self.parse_identifier()?.to_ascii_lowercase();
        self.skip_whitespace();

        match self.peek() {
            None => return Err(SelectorError::UnexpectedEof { expected: EXPECTED }),
            Some(b']') => {
                self.pos += 1;
                return Ok(matchers::attribute_exists(key));
            }
            Some(_) => {}
        }

        let bytes = self.bytes();
        if self.pos + 2 >= bytes.len() {
            return Err(SelectorError::UnexpectedEof { expected: EXPECTED });
        }
        let op: &[u8] = if bytes[self.pos] == b'=' {
            b"="
        } else if bytes[self.pos + 1] == b'=' {
            &bytes[self.pos..self.pos + 2]
        } else {
            return Err(self.unexpected("equality operator"));
        };
        let op = String::from_utf8_lossy(op).into_owned();
        self.pos += op.len();
        self.skip_whitespace();
        if self.at_end() {
            return Err(SelectorError::UnexpectedEof { expected: EXPECTED });
        }

        let mut rx = None;
        let mut val = String::new();
        if op == "#=" {
            rx = Some(self.parse_regex()?);
        } else if matches!(self.peek(), Some(b'"' | b'\'')) {
            val = self.parse_string()?;
        } else {
            val = self.parse_identifier()?;
        }

        self.skip_whitespace();
        if self.peek() != Some(b']') {
            return Err(self.unexpected("']'"));
        }
        self.pos += 1;

        Ok(match (op.as_str(), rx) {
            ("#=", Some(rx)) => matchers::attribute_regex(key, rx),
            ("=", _) => matchers::attribute_equals(key, val),
            ("!=", _) => matchers::attribute_not_equal(key, val),
            ("~=", _) => matchers::attribute_includes(key, val),
            ("|=", _) => matchers::attribute_dash_match(key, val),
            ("^=", _) => matchers::attribute_prefix(key, val),
            ("$=", _) => matchers::attribute_suffix(key, val),
            ("*=", _) => matchers::attribute_substring(key, val),
            _ => return Err(SelectorError::UnsupportedOperator(op)),
        })
    }

    fn parse_pseudo_class_selector(&mut self) -> SelectorResult<Selector> {
        self.pos += 1;
        let name = self.parse_identifier()?.to_ascii_lowercase();
        let selector = match name.as_str() {
            "not" | "has" | "haschild" => {
                self.consume_parenthesis()?;
                let inner = self.parse_selector_group()?;
                self.consume_closing_parenthesis()?;
                match name.as_str() {
                    "not" => matchers::negation(inner),
                    "has" => matchers::has_descendant(inner),
                    _ => matchers::has_child(inner),
                }
            }
            "contains" | "containsown" => {
                self.consume_parenthesis()?;
                let val = match self.peek() {
                    None => {
                        return Err(SelectorError::UnexpectedEof {
                            expected: "pseudo-class argument",
                        });
                    }
                    Some(b'"' | b'\'') => self.parse_string()?,
                    Some(_) => self.parse_identifier()?,
                };
                self.consume_closing_parenthesis()?;
                matchers::text_contains(val.to_lowercase(), name == "containsown")
            }
            "matches" | "matchesown" => {
                self.consume_parenthesis()?;
                let rx = self.parse_regex()?;
                self.consume_closing_parenthesis()?;
                matchers::text_regex(rx, name == "matchesown")
            }
            "nth-child" | "nth-last-child" | "nth-of-type" | "nth-last-of-type" => {
                self.consume_parenthesis()?;
                let nth = self.parse_nth()?;
                self.consume_closing_parenthesis()?;
                let last = name.starts_with("nth-last");
                let of_type = name.ends_with("of-type");
                matchers::nth_child(nth, last, of_type)
            }
            "first-child" => matchers::nth_child(Nth::new(0, 1), false, false),
            "last-child" => matchers::nth_child(Nth::new(0, 1), true, false),
            "first-of-type" => matchers::nth_child(Nth::new(0, 1), false, true),
            "last-of-type" => matchers::nth_child(Nth::new(0, 1), true, true),
            "only-child" => matchers::only_child(false),
            "only-of-type" => matchers::only_child(true),
            "input" => matchers::input(),
            "empty" => matchers::empty(),
            "root" => matchers::root(),
            _ => return Err(SelectorError::UnknownPseudoClass(name)),
        };
        Ok(selector)
    }
}
