//! Resource path parser.
//!
//! Reads the segment part of a resource path, e.g.
//! `Customers('ALFKI')/Orders(Id=5)/$count`, into a segment chain. Key
//! predicate values are kept verbatim, quotes included, so the chain displays
//! back as the text it was parsed from.
//!
//! Segments are linked last-to-first while reading, then the finished chain is
//! reversed into path order.

use tracing::trace;

use super::error::SegmentError;
use super::reverser::{reverse_with, ReverseOptions};
use super::token::{NamedValue, PathSegment, RegularSegment, SystemSegment};

/// Parser for resource path strings.
pub struct Parser {
    input: Vec<char>,
    position: usize,
}

impl Parser {
    /// Creates a new parser for the given path string.
    pub fn new(path: &str) -> Self {
        Self {
            input: path.chars().collect(),
            position: 0,
        }
    }

    /// Parses a path string into a chain, head first.
    pub fn parse(path: &str) -> Result<PathSegment, SegmentError> {
        Self::parse_with(path, &ReverseOptions::default())
    }

    /// Parses a path string, reversing the collected segments with `options`.
    pub fn parse_with(path: &str, options: &ReverseOptions) -> Result<PathSegment, SegmentError> {
        let mut parser = Parser::new(path);
        let backwards = parser.parse_segments()?;
        reverse_with(Some(&backwards), options)
    }

    /// Reads every segment, returning the last one as the head of a
    /// backwards chain.
    fn parse_segments(&mut self) -> Result<PathSegment, SegmentError> {
        let mut built: Option<PathSegment> = None;
        loop {
            if self.is_eof() {
                return Err(SegmentError::UnexpectedEnd {
                    position: self.input.len(),
                    expected: "path segment".to_string(),
                });
            }
            let segment = self.parse_segment(built.take())?;
            trace!(identifier = segment.identifier(), "parsed segment");
            built = Some(segment);

            let pos = self.position;
            match self.next() {
                Some('/') => continue,
                Some(ch) => {
                    return Err(SegmentError::UnexpectedToken {
                        position: pos,
                        found: ch.to_string(),
                        expected: "'/'".to_string(),
                    })
                }
                None => break,
            }
        }
        built.ok_or_else(|| SegmentError::UnexpectedEnd {
            position: self.input.len(),
            expected: "path segment".to_string(),
        })
    }

    /// Parses one segment, linking it to `next`.
    fn parse_segment(&mut self, next: Option<PathSegment>) -> Result<PathSegment, SegmentError> {
        if self.peek() == Some('$') {
            self.next();
            let name = self.parse_identifier()?;
            return Ok(PathSegment::System(SystemSegment::new(
                format!("${}", name),
                next,
            )));
        }

        let identifier = self.parse_identifier()?;
        let named_values = if self.peek() == Some('(') {
            self.parse_key_predicates()?
        } else {
            Vec::new()
        };
        Ok(PathSegment::Regular(RegularSegment::new(
            identifier,
            named_values,
            next,
        )))
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Returns the next character and advances position.
    fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Expects a specific character and advances, or returns an error.
    fn expect(&mut self, expected: char) -> Result<(), SegmentError> {
        let pos = self.position;
        match self.next() {
            Some(ch) if ch == expected => Ok(()),
            Some(ch) => Err(SegmentError::UnexpectedToken {
                position: pos,
                found: ch.to_string(),
                expected: format!("'{}'", expected),
            }),
            None => Err(SegmentError::UnexpectedEnd {
                position: self.input.len(),
                expected: format!("'{}'", expected),
            }),
        }
    }

    /// Parses an identifier; dots are allowed for qualified names.
    fn parse_identifier(&mut self) -> Result<String, SegmentError> {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                name.push(ch);
                self.next();
            } else {
                break;
            }
        }
        if name.is_empty() {
            Err(SegmentError::InvalidSyntax {
                message: format!("Expected identifier at position {}", self.position),
            })
        } else {
            Ok(name)
        }
    }

    /// Parses `(value)`, `(name=value,...)` or a mix of both.
    fn parse_key_predicates(&mut self) -> Result<Vec<NamedValue>, SegmentError> {
        self.expect('(')?;
        let mut values = Vec::new();
        loop {
            let first = self.parse_key_text()?;
            let value = if self.peek() == Some('=') {
                self.next();
                if first.is_empty() || first.starts_with('\'') {
                    return Err(SegmentError::InvalidSyntax {
                        message: format!("Invalid key name '{}'", first),
                    });
                }
                let value = self.parse_key_text()?;
                NamedValue::named(first, self.non_empty(value)?)
            } else {
                NamedValue::positional(self.non_empty(first)?)
            };
            values.push(value);

            let pos = self.position;
            match self.next() {
                Some(',') => continue,
                Some(')') => break,
                Some(ch) => {
                    return Err(SegmentError::UnexpectedToken {
                        position: pos,
                        found: ch.to_string(),
                        expected: "',' or ')'".to_string(),
                    })
                }
                None => {
                    return Err(SegmentError::UnexpectedEnd {
                        position: self.input.len(),
                        expected: "')'".to_string(),
                    })
                }
            }
        }
        Ok(values)
    }

    fn non_empty(&self, value: String) -> Result<String, SegmentError> {
        if value.is_empty() {
            Err(SegmentError::InvalidSyntax {
                message: format!("Empty key value at position {}", self.position),
            })
        } else {
            Ok(value)
        }
    }

    /// Reads a quoted literal (quotes kept, `''` escapes a quote) or a bare
    /// run of literal characters such as `5`, `1.5M` or `2020-01-01T00:00:00Z`.
    fn parse_key_text(&mut self) -> Result<String, SegmentError> {
        let mut text = String::new();
        if self.peek() == Some('\'') {
            text.push('\'');
            self.next();
            loop {
                match self.next() {
                    Some('\'') if self.peek() == Some('\'') => {
                        self.next();
                        text.push_str("''");
                    }
                    Some('\'') => {
                        text.push('\'');
                        break;
                    }
                    Some(ch) => text.push(ch),
                    None => {
                        return Err(SegmentError::UnexpectedEnd {
                            position: self.input.len(),
                            expected: "closing quote".to_string(),
                        })
                    }
                }
            }
            return Ok(text);
        }

        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || matches!(ch, '.' | '-' | '+' | ':' | '_') {
                text.push(ch);
                self.next();
            } else {
                break;
            }
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifiers(head: &PathSegment) -> Vec<&str> {
        head.iter().map(|s| s.identifier()).collect()
    }

    #[test]
    fn test_parse_single_segment() {
        let head = Parser::parse("Customers").unwrap();
        assert_eq!(head.len(), 1);
        assert_eq!(head.identifier(), "Customers");
        assert!(!head.is_system());
    }

    #[test]
    fn test_parse_path_order() {
        let head = Parser::parse("Customers/Orders/Lines").unwrap();
        assert_eq!(identifiers(&head), vec!["Customers", "Orders", "Lines"]);
    }

    #[test]
    fn test_parse_system_segment() {
        let head = Parser::parse("Customers/$count").unwrap();
        let count = head.next().unwrap();
        assert!(count.is_system());
        assert_eq!(count.identifier(), "$count");
    }

    #[test]
    fn test_parse_named_key() {
        let head = Parser::parse("Orders(Id=5)").unwrap();
        assert_eq!(head.named_values(), &[NamedValue::named("Id", "5")]);
    }

    #[test]
    fn test_parse_positional_quoted_key() {
        let head = Parser::parse("Customers('ALFKI')").unwrap();
        assert_eq!(head.named_values(), &[NamedValue::positional("'ALFKI'")]);
    }

    #[test]
    fn test_parse_composite_key_keeps_order() {
        let head = Parser::parse("Lines(OrderId=1,Line='a,b')").unwrap();
        assert_eq!(
            head.named_values(),
            &[
                NamedValue::named("OrderId", "1"),
                NamedValue::named("Line", "'a,b'"),
            ]
        );
    }

    #[test]
    fn test_parse_escaped_quote() {
        let head = Parser::parse("People('O''Neil')").unwrap();
        assert_eq!(head.named_values()[0].value, "'O''Neil'");
    }

    #[test]
    fn test_parse_qualified_identifier() {
        let head = Parser::parse("Orders/NS.SpecialOrder").unwrap();
        assert!(head.next().unwrap().is_namespace_or_container_qualified());
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(matches!(
            Parser::parse(""),
            Err(SegmentError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_parse_trailing_slash_fails() {
        assert!(Parser::parse("Customers/").is_err());
    }

    #[test]
    fn test_parse_empty_segment_fails() {
        assert!(matches!(
            Parser::parse("Customers//Orders"),
            Err(SegmentError::InvalidSyntax { .. })
        ));
    }

    #[test]
    fn test_parse_unterminated_predicate_fails() {
        assert!(matches!(
            Parser::parse("Orders(Id=5"),
            Err(SegmentError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_parse_unterminated_quote_fails() {
        assert!(Parser::parse("Customers('ALFKI)").is_err());
    }

    #[test]
    fn test_parse_empty_key_value_fails() {
        assert!(Parser::parse("Orders()").is_err());
        assert!(Parser::parse("Orders(Id=)").is_err());
        assert!(Parser::parse("Orders(=5)").is_err());
    }

    #[test]
    fn test_parse_bare_dollar_fails() {
        assert!(Parser::parse("Customers/$").is_err());
    }

    #[test]
    fn test_parse_unexpected_character_position() {
        let err = Parser::parse("Customers?x").unwrap_err();
        assert_eq!(
            err,
            SegmentError::UnexpectedToken {
                position: 9,
                found: "?".to_string(),
                expected: "'/'".to_string(),
            }
        );
    }

    #[test]
    fn test_display_roundtrip() {
        let text = "Customers('ALFKI')/Orders(Id=5,Line='x')/$count";
        assert_eq!(Parser::parse(text).unwrap().to_string(), text);
    }
}
