//! Declaration parsing implementation
//!
//! This module handles the top-level constructs of a translation unit:
//!
//! - `#include` / `#define` directives, captured to the end of their line
//! - Declarations: a type followed by one or more declarators
//! - Declarators: plain names (optionally with an opaque initializer),
//!   prototypes, and function definitions
//! - Parameter lists
//!
//! # Grammar
//!
//! ```text
//! declaration     ::= type declarator_list [";"]
//! type            ::= type_keyword+ | "struct" identifier | identifier
//! declarator_list ::= declarator ("," declarator)*
//! declarator      ::= identifier [ "=" <opaque> ]
//!                   | identifier parameter_list (";" | block)
//! parameter_list  ::= "(" (parameter [","])* ")"
//! parameter       ::= type [identifier]
//! ```
//!
//! The trailing `;` of a declaration is only required when its last
//! declarator did not already end the declaration with a prototype `;` or a
//! function body.
//!
//! A bare identifier is accepted as a type name. There is no symbol table,
//! so any identifier is presumed to be a typedef.

use crate::parser::ast::{Node, NodeType};
use crate::parser::lexer::TokenType;
use crate::parser::parse::{ParseError, Parser};
use tracing::trace;

impl<'t> Parser<'t> {
    /// Capture a directive token and every following token on the same
    /// source row.
    pub(crate) fn parse_to_end_of_line(&mut self, node_type: NodeType) -> Result<Node, ParseError> {
        let start = self.cursor.pos();
        let row = self.cursor.consume()?.position.row;

        while !self.cursor.is_finished() && self.cursor.peek()?.position.row == row {
            self.cursor.consume()?;
        }

        Ok(Node::new(node_type, self.span_from(start)))
    }

    /// Parse a declaration: type, declarator list, and the terminating `;`
    /// when the declarators did not supply one.
    pub(crate) fn parse_declaration(&mut self) -> Result<Node, ParseError> {
        let start = self.cursor.pos();

        let decl_type = self.parse_type()?;
        let (declarators, terminated) = self.parse_declarator_list()?;

        if !terminated {
            if !self.cursor.next_is(TokenType::Semi) {
                return Err(self.missing_semicolon());
            }
            self.cursor.consume()?;
        }

        let decl = Node::with_children(
            NodeType::Declaration,
            self.span_from(start),
            vec![decl_type, declarators],
        );
        trace!(start = decl.span.start, end = decl.span.end, "declaration");
        Ok(decl)
    }

    fn missing_semicolon(&self) -> ParseError {
        match self.cursor.peek() {
            Ok(token) => self.cursor.error(format!(
                "Expected ';' after declaration, found {}",
                token.token_type
            )),
            Err(_) => self
                .cursor
                .error("Expected ';' after declaration, found end of input"),
        }
    }

    /// Parse type: a run of type keywords, `struct` name, or a typedef name
    pub(crate) fn parse_type(&mut self) -> Result<Node, ParseError> {
        let start = self.cursor.pos();
        let first = self.cursor.peek()?.token_type;

        if first.is_type() {
            // unsigned long int, long double, ...
            while self.cursor.peek().is_ok_and(|t| t.token_type.is_type()) {
                self.cursor.consume()?;
            }
        } else if first == TokenType::Struct {
            self.cursor.consume()?;
            if !self.cursor.next_is(TokenType::Ident) {
                return Err(self.cursor.error("Bad struct type"));
            }
            self.cursor.consume()?;
        } else if first == TokenType::Ident {
            self.cursor.consume()?;
        } else {
            return Err(self.cursor.error("Bad type"));
        }

        Ok(Node::new(NodeType::Type, self.span_from(start)))
    }

    /// Parse declarators separated by commas.
    ///
    /// The flag is true when the last declarator already ended the
    /// declaration (prototype or function definition).
    fn parse_declarator_list(&mut self) -> Result<(Node, bool), ParseError> {
        let start = self.cursor.pos();
        let mut declarators = Vec::new();

        let terminated = loop {
            let (declarator, terminated) = self.parse_declarator()?;
            declarators.push(declarator);

            if terminated || !self.cursor.next_is(TokenType::Comma) {
                break terminated;
            }
            self.cursor.consume()?;
        };

        let list = Node::with_children(NodeType::DeclaratorList, self.span_from(start), declarators);
        Ok((list, terminated))
    }

    fn parse_declarator(&mut self) -> Result<(Node, bool), ParseError> {
        let start = self.cursor.pos();

        if !self.cursor.next_is(TokenType::Ident) {
            return Err(self.cursor.error("Unknown declarator"));
        }
        self.cursor.consume()?;

        let mut children = Vec::new();
        let mut terminated = false;

        if self.cursor.next_is(TokenType::LParen) {
            children.push(self.parse_parameter_list()?);

            if self.cursor.next_is(TokenType::Semi) {
                // prototype
                self.cursor.consume()?;
            } else if self.cursor.next_is(TokenType::LBrace) {
                children.push(self.parse_block_statement()?);
            } else {
                return Err(self
                    .cursor
                    .error("Unexpected token following parameter list"));
            }
            terminated = true;
        } else if self.cursor.next_is(TokenType::Assign) {
            children.push(self.parse_initializer()?);
        }

        let declarator = Node::with_children(NodeType::Declarator, self.span_from(start), children);
        Ok((declarator, terminated))
    }

    /// Skip `= ...` up to the next `,` or `;` outside any nesting, recording
    /// the initializer as an opaque expression.
    fn parse_initializer(&mut self) -> Result<Node, ParseError> {
        self.cursor.expect(TokenType::Assign)?;
        let start = self.cursor.pos();

        let end = self
            .cursor
            .find_at_same_nesting_level(|t| {
                matches!(t.token_type, TokenType::Comma | TokenType::Semi)
            })
            .ok_or_else(|| self.cursor.error("Could not find end of initializer"))?;

        self.cursor.set_pos(end);
        Ok(Node::new(NodeType::Expression, self.span_from(start)))
    }

    /// Parse parameter list: `(` parameters `)`
    pub(crate) fn parse_parameter_list(&mut self) -> Result<Node, ParseError> {
        let start = self.cursor.pos();
        self.cursor.expect(TokenType::LParen)?;

        let mut params = Vec::new();
        while !self.cursor.next_is(TokenType::RParen) {
            params.push(self.parse_parameter()?);
            if self.cursor.next_is(TokenType::Comma) {
                self.cursor.consume()?;
            }
        }

        self.cursor.expect(TokenType::RParen)?;

        Ok(Node::with_children(NodeType::ParameterList, self.span_from(start), params))
    }

    /// Parse a parameter: a type and an optional name
    fn parse_parameter(&mut self) -> Result<Node, ParseError> {
        let start = self.cursor.pos();

        let param_type = self.parse_type()?;
        if self.cursor.next_is(TokenType::Ident) {
            self.cursor.consume()?;
        }

        Ok(Node::with_children(
            NodeType::Parameter,
            self.span_from(start),
            vec![param_type],
        ))
    }
}
