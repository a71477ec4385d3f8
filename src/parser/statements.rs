//! Statement parsing implementation
//!
//! Only the statements that shape control-flow nesting are given structure:
//!
//! - Compound statements: `{ ... }`
//! - `if` / `else`, `while`, `for`, `do ... while`
//!
//! Everything else (assignments, calls, returns, local declarations, ...) is
//! an opaque [`NodeType::Statement`] running through the next `;`.
//!
//! # Grammar
//!
//! ```text
//! statement ::= block | if_stmt | while_stmt | for_stmt | do_while_stmt | opaque
//! block     ::= "{" statement* "}"
//! if_stmt   ::= "if" "(" <opaque> ")" statement ["else" statement]
//! while_stmt ::= "while" "(" <opaque> ")" statement
//! for_stmt  ::= "for" "(" <opaque> ")" statement
//! do_while_stmt ::= "do" statement "while" "(" <opaque> ")" ";"
//! opaque    ::= <any tokens> ";"
//! ```

use crate::parser::ast::{Node, NodeType, Span};
use crate::parser::lexer::TokenType;
use crate::parser::parse::{ParseError, Parser};
use tracing::trace;

impl<'t> Parser<'t> {
    /// Parse block statement: `{` statements `}`
    pub(crate) fn parse_block_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.cursor.pos();
        self.cursor.expect(TokenType::LBrace)?;

        let mut statements = Vec::new();
        while !self.cursor.is_finished() && !self.cursor.next_is(TokenType::RBrace) {
            statements.push(self.parse_statement()?);
        }

        self.cursor.expect(TokenType::RBrace)?;

        Ok(Node::with_children(
            NodeType::BlockStatement,
            self.span_from(start),
            statements,
        ))
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Node, ParseError> {
        if self.cursor.is_finished() {
            return Err(self.cursor.error("Unexpected end of input looking for statement"));
        }

        match self.cursor.peek()?.token_type {
            TokenType::LBrace => self.parse_block_statement(),
            TokenType::If => self.parse_if_statement(),
            TokenType::While => self.parse_guarded_statement(NodeType::WhileStatement, "while"),
            TokenType::For => self.parse_guarded_statement(NodeType::ForStatement, "for"),
            TokenType::Do => self.parse_do_while_statement(),
            _ => self.parse_to_next_semi(),
        }
    }

    fn parse_if_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.cursor.pos();
        let mut children = self.parse_guard_and_body("if")?;

        if self.cursor.next_is(TokenType::Else) {
            self.cursor.consume()?;
            children.push(self.parse_statement()?);
        }

        Ok(Node::with_children(
            NodeType::IfStatement,
            self.span_from(start),
            children,
        ))
    }

    fn parse_guarded_statement(&mut self, node_type: NodeType, keyword: &str) -> Result<Node, ParseError> {
        let start = self.cursor.pos();
        let children = self.parse_guard_and_body(keyword)?;
        Ok(Node::with_children(node_type, self.span_from(start), children))
    }

    /// Keyword, parenthesized guard, and exactly one body statement.
    ///
    /// The guard is never parsed: its tokens are located by matching the
    /// parentheses and recorded as an expression span.
    fn parse_guard_and_body(&mut self, keyword: &str) -> Result<Vec<Node>, ParseError> {
        self.cursor.consume()?;
        let condition = self.skip_parenthesized(&format!("{keyword} keyword"))?;
        trace!(keyword, start = condition.span.start, end = condition.span.end, "guard");

        let body = self.parse_statement()?;
        Ok(vec![condition, body])
    }

    fn parse_do_while_statement(&mut self) -> Result<Node, ParseError> {
        let start = self.cursor.pos();
        self.cursor.consume()?;

        let body = self.parse_statement()?;

        if !self.cursor.next_is(TokenType::While) {
            return Err(self.cursor.error("Missing while after body of do/while"));
        }
        self.cursor.consume()?;

        let condition = self.skip_parenthesized("while of do/while")?;
        self.cursor.expect(TokenType::Semi)?;

        Ok(Node::with_children(
            NodeType::DoWhileStatement,
            self.span_from(start),
            vec![body, condition],
        ))
    }

    /// Capture everything through the next `;` as an opaque statement.
    fn parse_to_next_semi(&mut self) -> Result<Node, ParseError> {
        let semi = self
            .cursor
            .find_next(TokenType::Semi)
            .ok_or_else(|| self.cursor.error("Could not find semicolon terminating statement"))?;

        let statement = Node::new(NodeType::Statement, Span::new(self.cursor.pos(), semi + 1));
        self.cursor.set_pos(semi + 1);
        Ok(statement)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::{Node, NodeType};
    use crate::parser::lexer::{Lexer, Token};
    use crate::parser::parse::{parse, ParseError};

    fn parse_source(source: &str) -> (Vec<Token>, Result<Node, ParseError>) {
        let tokens = Lexer::new(source).tokenize().unwrap();
        let result = parse(&tokens);
        (tokens, result)
    }

    /// Body block of the first function defined in `source`.
    fn body(source: &str) -> (Vec<Token>, Node) {
        let (tokens, unit) = parse_source(source);
        let unit = unit.unwrap();
        let declarator = &unit.children[0].children[1].children[0];
        let block = declarator.children[1].clone();
        assert_eq!(block.node_type, NodeType::BlockStatement);
        (tokens, block)
    }

    #[test]
    fn test_opaque_statements() {
        let (tokens, block) = body("void f() { x = g(1); return; }");
        assert_eq!(block.children.len(), 2);
        assert_eq!(block.children[0].node_type, NodeType::Statement);
        assert_eq!(block.children[0].text(&tokens), "x = g ( 1 ) ;");
        assert_eq!(block.children[1].text(&tokens), "return ;");
    }

    #[test]
    fn test_if_else() {
        let (tokens, block) = body("void f() { if (a == b) x++; else { y--; } }");
        let if_stmt = &block.children[0];

        assert_eq!(if_stmt.node_type, NodeType::IfStatement);
        assert_eq!(if_stmt.children.len(), 3);
        assert_eq!(if_stmt.children[0].node_type, NodeType::Expression);
        assert_eq!(if_stmt.children[0].text(&tokens), "a == b");
        assert_eq!(if_stmt.children[1].text(&tokens), "x ++ ;");
        assert_eq!(if_stmt.children[2].node_type, NodeType::BlockStatement);
        assert_eq!(
            if_stmt.text(&tokens),
            "if ( a == b ) x ++ ; else { y -- ; }"
        );
    }

    #[test]
    fn test_else_if_chain_nests() {
        let (_, block) = body("void f() { if (a) x; else if (b) y; else z; }");
        let outer = &block.children[0];
        assert_eq!(outer.children[2].node_type, NodeType::IfStatement);
        assert_eq!(outer.children[2].children.len(), 3);
    }

    #[test]
    fn test_for_header_with_semicolons() {
        let (tokens, block) = body("int main() { for (i = 0; i < n; i++) { sum += i; } }");
        let for_stmt = &block.children[0];

        assert_eq!(for_stmt.node_type, NodeType::ForStatement);
        assert_eq!(for_stmt.children[0].text(&tokens), "i = 0 ; i < n ; i ++");
        assert_eq!(for_stmt.children[1].children[0].text(&tokens), "sum += i ;");
    }

    #[test]
    fn test_while_with_nested_parens() {
        let (tokens, block) = body("void f() { while ((c = getchar()) != EOF) putchar(c); }");
        let while_stmt = &block.children[0];

        assert_eq!(while_stmt.node_type, NodeType::WhileStatement);
        assert_eq!(
            while_stmt.children[0].text(&tokens),
            "( c = getchar ( ) ) != EOF"
        );
        assert_eq!(while_stmt.children[1].node_type, NodeType::Statement);
    }

    #[test]
    fn test_do_while() {
        let (tokens, block) = body("void f() { do { n--; } while (n > 0); done(); }");
        assert_eq!(block.children.len(), 2);

        let do_while = &block.children[0];
        assert_eq!(do_while.node_type, NodeType::DoWhileStatement);
        assert_eq!(do_while.children[0].node_type, NodeType::BlockStatement);
        assert_eq!(do_while.children[1].node_type, NodeType::Expression);
        assert_eq!(do_while.children[1].text(&tokens), "n > 0");
        assert_eq!(
            do_while.text(&tokens),
            "do { n -- ; } while ( n > 0 ) ;"
        );
    }

    #[test]
    fn test_if_without_paren() {
        let (_, result) = parse_source("void f() {\n  if x > 0) y;\n}");
        let err = result.unwrap_err();
        assert_eq!(err.message, "if keyword not followed by left paren");
        assert_eq!(err.position.map(|p| p.row), Some(1));
    }

    #[test]
    fn test_unmatched_paren() {
        let (_, result) = parse_source("void f() { while (a && (b) x; }");
        let err = result.unwrap_err();
        assert_eq!(err.message, "Could not find matching right parenthesis");
    }

    #[test]
    fn test_do_without_while() {
        let (_, result) = parse_source("void f() { do x; y; }");
        let err = result.unwrap_err();
        assert_eq!(err.message, "Missing while after body of do/while");
    }

    #[test]
    fn test_unterminated_statement() {
        let (_, result) = parse_source("void f() { return x }");
        let err = result.unwrap_err();
        assert_eq!(err.message, "Could not find semicolon terminating statement");
    }

    #[test]
    fn test_unclosed_block() {
        let (_, result) = parse_source("void f() { x;");
        let err = result.unwrap_err();
        assert_eq!(err.message, "Unexpected end of input");
    }

    #[test]
    fn test_missing_body_statement() {
        let (_, result) = parse_source("void f() { while (1)");
        let err = result.unwrap_err();
        assert!(err.message.contains("looking for statement"));
    }
}
