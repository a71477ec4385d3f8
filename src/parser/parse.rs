//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, its error type, and the
//! translation-unit entry point.
//!
//! # Parser Architecture
//!
//! The Parser is a recursive descent over a [`TokenCursor`]:
//! - This module: Parser struct, span helpers, and the unit loop
//! - `declarations`: directives, declarations, declarators, parameters
//! - `statements`: blocks, control flow, and opaque statements
//!
//! Expressions are never parsed. Conditions, loop headers and initializers
//! are located with balanced-delimiter scans and recorded as opaque
//! [`NodeType::Expression`] spans; any other statement is captured whole up
//! to its semicolon.
//!
//! Errors are not recovered from. The first mismatch aborts the parse and no
//! partial tree is returned.

use crate::parser::ast::{Node, NodeType, Position, Span};
use crate::parser::cursor::TokenCursor;
use crate::parser::lexer::{Token, TokenType};
use thiserror::Error;
use tracing::debug;

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at {}: {message}", describe_location(.position, .found))]
pub struct ParseError {
    pub message: String,
    /// Position of the offending token, or of the last token once the input
    /// is exhausted. `None` only for an empty token list.
    pub position: Option<Position>,
    pub found: Option<TokenType>,
}

impl ParseError {
    /// One-based line of the error, if it has a location.
    pub fn line(&self) -> Option<usize> {
        self.position.map(|p| p.row + 1)
    }
}

fn describe_location(position: &Option<Position>, found: &Option<TokenType>) -> String {
    match (position, found) {
        (Some(pos), Some(found)) => format!("line {} ({})", pos.row + 1, found),
        (Some(pos), None) => format!("line {}", pos.row + 1),
        _ => "end of input".to_string(),
    }
}

/// Recursive descent parser for the C subset
pub struct Parser<'t> {
    pub(crate) cursor: TokenCursor<'t>,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
        }
    }

    /// Parse the whole token list into a [`NodeType::Unit`] tree.
    pub fn parse(mut self) -> Result<Node, ParseError> {
        let start = self.cursor.pos();
        let mut children = Vec::new();

        while !self.cursor.is_finished() {
            let first = self.cursor.peek()?.token_type;
            let child = match first {
                TokenType::Include => self.parse_to_end_of_line(NodeType::Include)?,
                TokenType::Define => self.parse_to_end_of_line(NodeType::Define)?,
                t if t.is_type() || t == TokenType::Struct || t == TokenType::Ident => {
                    self.parse_declaration()?
                }
                t => return Err(self.cursor.error(format!("Unknown construct at {t}"))),
            };
            children.push(child);
        }

        let unit = Node::with_children(NodeType::Unit, self.span_from(start), children);
        debug!(
            top_level = unit.children.len(),
            tokens = self.cursor.tokens().len(),
            "parsed unit"
        );
        Ok(unit)
    }

    // ===== Helper methods =====

    /// Span from `start` up to (not including) the cursor.
    pub(crate) fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.cursor.pos())
    }

    /// Require `(` at the cursor and return the index of its matching `)`.
    pub(crate) fn find_closing_paren(&self, ctx: &str) -> Result<usize, ParseError> {
        if !self.cursor.next_is(TokenType::LParen) {
            return Err(self
                .cursor
                .error(format!("{ctx} not followed by left paren")));
        }
        self.cursor
            .find_matching(TokenType::LParen, TokenType::RParen)
            .ok_or_else(|| self.cursor.error("Could not find matching right parenthesis"))
    }

    /// Record the tokens strictly inside the parentheses at the cursor as an
    /// opaque expression and move past the closing `)`.
    pub(crate) fn skip_parenthesized(&mut self, ctx: &str) -> Result<Node, ParseError> {
        let rparen = self.find_closing_paren(ctx)?;
        let condition = Node::new(
            NodeType::Expression,
            Span::new(self.cursor.pos() + 1, rparen),
        );
        self.cursor.set_pos(rparen + 1);
        Ok(condition)
    }
}

/// Parse a complete token list.
pub fn parse(tokens: &[Token]) -> Result<Node, ParseError> {
    Parser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn parse_source(source: &str) -> Result<Node, ParseError> {
        let tokens = Lexer::new(source).tokenize().unwrap();
        parse(&tokens)
    }

    #[test]
    fn test_empty_unit() {
        let unit = parse_source("  // nothing here\n").unwrap();
        assert_eq!(unit.node_type, NodeType::Unit);
        assert!(unit.children.is_empty());
        assert_eq!(unit.span, Span::new(0, 0));
    }

    #[test]
    fn test_unit_span_covers_all_tokens() {
        let source = "#include <stdio.h>\nint x;\nint main(void) { return 0; }";
        let tokens = Lexer::new(source).tokenize().unwrap();
        let unit = parse(&tokens).unwrap();

        assert_eq!(unit.span, Span::new(0, tokens.len()));
        let kinds: Vec<_> = unit.children.iter().map(|c| c.node_type).collect();
        assert_eq!(
            kinds,
            vec![NodeType::Include, NodeType::Declaration, NodeType::Declaration]
        );
    }

    #[test]
    fn test_unknown_construct() {
        let err = parse_source("int x;\n\n;").unwrap_err();
        assert!(err.message.contains("Unknown construct"));
        assert_eq!(err.line(), Some(3));
        assert_eq!(err.found, Some(TokenType::Semi));
    }

    #[test]
    fn test_error_display() {
        let err = parse_source("if").unwrap_err();
        assert_eq!(err.to_string(), "Parse error at line 1 (IF): Unknown construct at IF");

        let err = ParseError {
            message: "nothing".to_string(),
            position: None,
            found: None,
        };
        assert_eq!(err.to_string(), "Parse error at end of input: nothing");
    }
}
