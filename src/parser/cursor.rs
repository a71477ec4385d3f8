//! Random-access cursor over a materialized token list
//!
//! All parsing primitives live here: lookahead, consumption, expectation,
//! and the forward scans the parser uses to skip over content it does not
//! parse (conditions, initializers, opaque statements).

use crate::parser::lexer::{Token, TokenType};
use crate::parser::parse::ParseError;

/// A token list plus a single mutable position.
#[derive(Debug, Clone)]
pub struct TokenCursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> TokenCursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn tokens(&self) -> &'t [Token] {
        self.tokens
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Reposition the cursor, e.g. just past a skipped span.
    pub fn set_pos(&mut self, pos: usize) {
        debug_assert!(pos <= self.tokens.len(), "cursor moved past end");
        self.pos = pos.min(self.tokens.len());
    }

    pub fn is_finished(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn peek(&self) -> Result<&'t Token, ParseError> {
        self.tokens
            .get(self.pos)
            .ok_or_else(|| self.error("Unexpected end of input"))
    }

    pub fn consume(&mut self) -> Result<&'t Token, ParseError> {
        let token = self.peek()?;
        self.pos += 1;
        Ok(token)
    }

    pub fn next_is(&self, token_type: TokenType) -> bool {
        self.nth_is(0, token_type)
    }

    /// True if the upcoming tokens have exactly the given types, in order.
    pub fn next_are(&self, token_types: &[TokenType]) -> bool {
        token_types
            .iter()
            .enumerate()
            .all(|(i, &t)| self.nth_is(i, t))
    }

    fn nth_is(&self, n: usize, token_type: TokenType) -> bool {
        self.tokens
            .get(self.pos + n)
            .is_some_and(|t| t.token_type == token_type)
    }

    /// Consume the next token if it has the given type, otherwise fail.
    pub fn expect(&mut self, token_type: TokenType) -> Result<&'t Token, ParseError> {
        let token = self.peek()?;
        if token.token_type != token_type {
            return Err(self.error(format!(
                "Expected {}, saw {}",
                token_type, token.token_type
            )));
        }
        self.pos += 1;
        Ok(token)
    }

    /// Index of the first token of `token_type` at or after the cursor.
    pub fn find_next(&self, token_type: TokenType) -> Option<usize> {
        self.tokens[self.pos..]
            .iter()
            .position(|t| t.token_type == token_type)
            .map(|i| self.pos + i)
    }

    /// Index of the `rdelim` balancing the `ldelim` under the cursor.
    ///
    /// Returns `None` if the cursor is not on an `ldelim` or the input ends
    /// before the depth returns to zero.
    pub fn find_matching(&self, ldelim: TokenType, rdelim: TokenType) -> Option<usize> {
        if !self.next_is(ldelim) {
            return None;
        }

        let mut depth = 1usize;
        for (i, token) in self.tokens.iter().enumerate().skip(self.pos + 1) {
            if token.token_type == ldelim {
                depth += 1;
            } else if token.token_type == rdelim {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }

    /// Index of the first token satisfying `pred` that is not nested inside
    /// an unmatched `(`, `[` or `{` opened at or after the cursor.
    pub fn find_at_same_nesting_level(&self, pred: impl Fn(&Token) -> bool) -> Option<usize> {
        let (mut parens, mut brackets, mut braces) = (0i32, 0i32, 0i32);

        for (i, token) in self.tokens.iter().enumerate().skip(self.pos) {
            if parens <= 0 && brackets <= 0 && braces <= 0 && pred(token) {
                return Some(i);
            }
            match token.token_type {
                TokenType::LParen => parens += 1,
                TokenType::RParen => parens -= 1,
                TokenType::LBracket => brackets += 1,
                TokenType::RBracket => brackets -= 1,
                TokenType::LBrace => braces += 1,
                TokenType::RBrace => braces -= 1,
                _ => {}
            }
        }
        None
    }

    /// The token errors are reported against: the current one, or the last
    /// one once the cursor is exhausted.
    pub fn where_token(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos).or_else(|| self.tokens.last())
    }

    /// Build a parse error located at [`where_token`](Self::where_token).
    pub fn error(&self, message: impl Into<String>) -> ParseError {
        let token = self.where_token();
        ParseError {
            message: message.into(),
            position: token.map(|t| t.position),
            found: token.map(|t| t.token_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;

    fn lex(source: &str) -> Vec<Token> {
        Lexer::new(source).tokenize().unwrap()
    }

    #[test]
    fn test_peek_and_consume() {
        let tokens = lex("a b");
        let mut cursor = TokenCursor::new(&tokens);

        assert_eq!(cursor.peek().unwrap().lexeme, "a");
        assert_eq!(cursor.consume().unwrap().lexeme, "a");
        assert_eq!(cursor.consume().unwrap().lexeme, "b");
        assert!(cursor.is_finished());
        assert!(cursor.peek().is_err());
        assert!(cursor.consume().is_err());
        assert!(!cursor.next_is(TokenType::Ident));
    }

    #[test]
    fn test_next_are() {
        let tokens = lex("struct point p");
        let cursor = TokenCursor::new(&tokens);

        assert!(cursor.next_are(&[TokenType::Struct, TokenType::Ident]));
        assert!(!cursor.next_are(&[TokenType::Struct, TokenType::Semi]));
        assert!(!cursor.next_are(&[
            TokenType::Struct,
            TokenType::Ident,
            TokenType::Ident,
            TokenType::Ident,
        ]));
    }

    #[test]
    fn test_expect_reports_types_and_row() {
        let tokens = lex("int\nx");
        let mut cursor = TokenCursor::new(&tokens);

        assert!(cursor.expect(TokenType::Int).is_ok());
        let err = cursor.expect(TokenType::Semi).unwrap_err();
        assert_eq!(err.message, "Expected SEMI, saw IDENT");
        assert_eq!(err.position.map(|p| p.row), Some(1));
        assert_eq!(err.found, Some(TokenType::Ident));
        assert_eq!(cursor.pos(), 1);
    }

    #[test]
    fn test_error_past_end_uses_last_token() {
        let tokens = lex("x\n;");
        let mut cursor = TokenCursor::new(&tokens);
        cursor.set_pos(2);

        let err = cursor.expect(TokenType::Semi).unwrap_err();
        assert_eq!(err.position.map(|p| p.row), Some(1));
        assert_eq!(err.found, Some(TokenType::Semi));
    }

    #[test]
    fn test_find_next() {
        let tokens = lex("a = b ; c ;");
        let mut cursor = TokenCursor::new(&tokens);

        assert_eq!(cursor.find_next(TokenType::Semi), Some(3));
        cursor.set_pos(4);
        assert_eq!(cursor.find_next(TokenType::Semi), Some(5));
        assert_eq!(cursor.find_next(TokenType::Comma), None);
    }

    #[test]
    fn test_find_matching_nested() {
        let tokens = lex("((a)(b))");
        let cursor = TokenCursor::new(&tokens);

        assert_eq!(cursor.find_matching(TokenType::LParen, TokenType::RParen), Some(7));
    }

    #[test]
    fn test_find_matching_unbalanced() {
        let tokens = lex("((a)");
        let cursor = TokenCursor::new(&tokens);
        assert_eq!(cursor.find_matching(TokenType::LParen, TokenType::RParen), None);

        let tokens = lex("a)");
        let cursor = TokenCursor::new(&tokens);
        assert_eq!(cursor.find_matching(TokenType::LParen, TokenType::RParen), None);
    }

    #[test]
    fn test_find_at_same_nesting_level() {
        let tokens = lex("f(a, b), g[1, 2], {3, 4}; x");
        let cursor = TokenCursor::new(&tokens);

        let comma = cursor.find_at_same_nesting_level(|t| t.token_type == TokenType::Comma);
        assert_eq!(comma, Some(6));

        let semi = cursor.find_at_same_nesting_level(|t| t.token_type == TokenType::Semi);
        assert_eq!(tokens[semi.unwrap()].lexeme, ";");
        assert_eq!(semi, Some(19));
    }

    #[test]
    fn test_find_at_same_nesting_level_unclosed() {
        let tokens = lex("(a; b;");
        let cursor = TokenCursor::new(&tokens);

        assert_eq!(
            cursor.find_at_same_nesting_level(|t| t.token_type == TokenType::Semi),
            None
        );
    }
}
