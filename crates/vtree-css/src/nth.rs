//! An+B expressions for :nth-* pseudo-classes

use crate::error::{SelectorError, SelectorResult};
use crate::parser::Parser;

/// An+B expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl Nth {
    /// `odd`, 2n+1
    pub const ODD: Nth = Nth { a: 2, b: 1 };

    /// `even`, 2n
    pub const EVEN: Nth = Nth { a: 2, b: 0 };

    pub const fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Check if a 1-based position matches
    pub fn matches(&self, position: i32) -> bool {
        let i = i64::from(position) - i64::from(self.b);
        let a = i64::from(self.a);
        if a == 0 {
            return i == 0;
        }
        i % a == 0 && i / a >= 0
    }
}

/// Parser states between tokens of an An+B expression
#[derive(Clone, Copy)]
enum State {
    Start,
    PositiveA,
    NegativeA,
    ReadA(i32),
    ReadN(i32),
}

impl Parser<'_> {
    /// Parse `an+b`, `odd` or `even`. Whitespace is only allowed around the
    /// sign of `b`.
    pub(crate) fn parse_nth(&mut self) -> SelectorResult<Nth> {
        let mut state = State::Start;
        loop {
            state = match state {
                State::Start => match self.peek().ok_or(SelectorError::NthEof)? {
                    b'-' => {
                        self.pos += 1;
                        State::NegativeA
                    }
                    b'+' => {
                        self.pos += 1;
                        State::PositiveA
                    }
                    b'0'..=b'9' => State::PositiveA,
                    b'n' | b'N' => {
                        self.pos += 1;
                        State::ReadN(1)
                    }
                    b'o' | b'O' | b'e' | b'E' => {
                        let keyword = self.parse_name()?.to_ascii_lowercase();
                        return match keyword.as_str() {
                            "odd" => Ok(Nth::ODD),
                            "even" => Ok(Nth::EVEN),
                            _ => Err(SelectorError::InvalidNthKeyword(keyword)),
                        };
                    }
                    _ => return Err(SelectorError::NthInvalid(self.pos)),
                },
                State::PositiveA | State::NegativeA => {
                    let sign = if matches!(state, State::NegativeA) { -1 } else { 1 };
                    match self.peek().ok_or(SelectorError::NthEof)? {
                        b'0'..=b'9' => State::ReadA(sign * self.parse_integer()?),
                        b'n' | b'N' => {
                            self.pos += 1;
                            State::ReadN(sign)
                        }
                        _ => return Err(SelectorError::NthInvalid(self.pos)),
                    }
                }
                State::ReadA(a) => match self.peek().ok_or(SelectorError::NthEof)? {
                    b'n' | b'N' => {
                        self.pos += 1;
                        State::ReadN(a)
                    }
                    // the number was b all along
                    _ => return Ok(Nth::new(0, a)),
                },
                State::ReadN(a) => {
                    self.skip_whitespace();
                    let sign = match self.peek().ok_or(SelectorError::NthEof)? {
                        b'+' => 1,
                        b'-' => -1,
                        _ => return Ok(Nth::new(a, 0)),
                    };
                    self.pos += 1;
                    self.skip_whitespace();
                    return Ok(Nth::new(a, sign * self.parse_integer()?));
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> SelectorResult<Nth> {
        Parser::new(src).parse_nth()
    }

    #[test]
    fn test_nth_keywords() {
        assert_eq!(parse("odd)"), Ok(Nth::ODD));
        assert_eq!(parse("EVEN)"), Ok(Nth::EVEN));
        assert_eq!(
            parse("oddish)"),
            Err(SelectorError::InvalidNthKeyword("oddish".to_string()))
        );
    }

    #[test]
    fn test_nth_forms() {
        assert_eq!(parse("3)"), Ok(Nth::new(0, 3)));
        assert_eq!(parse("+3)"), Ok(Nth::new(0, 3)));
        assert_eq!(parse("-3)"), Ok(Nth::new(0, -3)));
        assert_eq!(parse("2n)"), Ok(Nth::new(2, 0)));
        assert_eq!(parse("2n+1)"), Ok(Nth::new(2, 1)));
        assert_eq!(parse("2n - 1)"), Ok(Nth::new(2, -1)));
        assert_eq!(parse("n)"), Ok(Nth::new(1, 0)));
        assert_eq!(parse("-n+3)"), Ok(Nth::new(-1, 3)));
        assert_eq!(parse("+n+ 4)"), Ok(Nth::new(1, 4)));
    }

    #[test]
    fn test_nth_extreme_coefficients() {
        assert!(Nth::new(1, -i32::MAX).matches(1));
        assert!(!Nth::new(0, i32::MIN).matches(1));
        assert!(!Nth::new(-1, i32::MIN).matches(i32::MAX));
        assert!(Nth::new(i32::MIN, 1).matches(1));
        assert!(!Nth::new(i32::MIN, 1).matches(2));
        assert!(!Nth::new(i32::MAX, -i32::MAX).matches(1));
    }

    #[test]
    fn test_nth_errors() {
        assert_eq!(parse(""), Err(SelectorError::NthEof));
        assert_eq!(parse("3"), Err(SelectorError::NthEof));
        assert_eq!(parse("-"), Err(SelectorError::NthEof));
        assert_eq!(parse("x)"), Err(SelectorError::NthInvalid(0)));
        assert_eq!(parse("-x)"), Err(SelectorError::NthInvalid(1)));
        assert!(matches!(parse("2n+)"), Err(SelectorError::Unexpected { .. })));
    }

    #[test]
    fn test_nth_matches() {
        let odd: Vec<i32> = (1..=10).filter(|&i| Nth::ODD.matches(i)).collect();
        assert_eq!(odd, vec![1, 3, 5, 7, 9]);

        let first_three: Vec<i32> = (1..=10).filter(|&i| Nth::new(-1, 3).matches(i)).collect();
        assert_eq!(first_three, vec![1, 2, 3]);

        assert!(Nth::new(0, 4).matches(4));
        assert!(!Nth::new(0, 4).matches(5));
        assert!(Nth::new(3, -2).matches(1));
    }
}
