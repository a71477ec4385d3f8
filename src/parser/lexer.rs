//! Lexer (tokenizer) for C source code
//!
//! Converts a character stream into [`Token`]s one [`Lexer::read_next`] call at
//! a time. Whitespace and comments are skipped transparently. Preprocessor
//! directives produce a single directive token; the rest of the directive's
//! line is lexed as ordinary tokens so the parser can capture it.
//!
//! Only one character of lookahead is ever needed. Operators, numeric
//! literals and comment openers all decide on the next character by peeking
//! at it, so nothing is pushed back into the stream.

use super::ast::Position;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;
use tracing::{debug, trace};

/// Token classifications produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Preprocessor directives
    Define,
    Include,
    UnknownPreproc,

    // Control keywords
    If,
    Else,
    For,
    While,
    Do,
    Struct,

    // Type keywords
    Void,
    Int,
    Short,
    Long,
    Signed,
    Unsigned,
    Char,
    Float,
    Double,
    Bool,

    // Comparison
    Eq,  // ==
    Ne,  // !=
    Lt,  // <
    Gt,  // >
    Lte, // <=
    Gte, // >=

    // Arithmetic
    Plus,
    Minus,
    Times,
    Divide,
    Mod,

    // Logical and bitwise
    Not,    // !
    And,    // &&
    Or,     // ||
    BitAnd, // &
    BitOr,  // |

    // Assignment
    Assign,
    AssignPlus,
    AssignMinus,
    AssignTimes,
    AssignDivide,
    AssignMod,
    AssignBitAnd,
    AssignBitOr,

    // Increment/Decrement
    Increment,
    Decrement,

    // Punctuation
    Semi,
    Colon,
    Comma,
    Dot,

    // Grouping
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // Literals
    LiteralInt,
    LiteralFloat,
    LiteralDouble,
    LiteralChar,
    LiteralString,

    Ident,
}

/// Coarse grouping of token types, used for highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenCategory {
    Preprocessor,
    Keyword,
    TypeKeyword,
    Operator,
    Punctuation,
    Grouping,
    Literal,
    Identifier,
}

impl TokenType {
    /// True for the built-in type keywords that can start a declaration.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            TokenType::Void
                | TokenType::Int
                | TokenType::Short
                | TokenType::Long
                | TokenType::Signed
                | TokenType::Unsigned
                | TokenType::Char
                | TokenType::Float
                | TokenType::Double
                | TokenType::Bool
        )
    }

    pub fn category(self) -> TokenCategory {
        use TokenType::*;
        match self {
            Define | Include | UnknownPreproc => TokenCategory::Preprocessor,
            If | Else | For | While | Do | Struct => TokenCategory::Keyword,
            t if t.is_type() => TokenCategory::TypeKeyword,
            Semi | Colon | Comma | Dot => TokenCategory::Punctuation,
            LParen | RParen | LBracket | RBracket | LBrace | RBrace => TokenCategory::Grouping,
            LiteralInt | LiteralFloat | LiteralDouble | LiteralChar | LiteralString => {
                TokenCategory::Literal
            }
            Ident => TokenCategory::Identifier,
            _ => TokenCategory::Operator,
        }
    }

    pub fn name(self) -> &'static str {
        use TokenType::*;
        match self {
            Define => "DEFINE",
            Include => "INCLUDE",
            UnknownPreproc => "UNKNOWN_PREPROC",
            If => "IF",
            Else => "ELSE",
            For => "FOR",
            While => "WHILE",
            Do => "DO",
            Struct => "STRUCT",
            Void => "VOID",
            Int => "INT",
            Short => "SHORT",
            Long => "LONG",
            Signed => "SIGNED",
            Unsigned => "UNSIGNED",
            Char => "CHAR",
            Float => "FLOAT",
            Double => "DOUBLE",
            Bool => "BOOL",
            Eq => "EQ",
            Ne => "NE",
            Lt => "LT",
            Gt => "GT",
            Lte => "LTE",
            Gte => "GTE",
            Plus => "PLUS",
            Minus => "MINUS",
            Times => "TIMES",
            Divide => "DIVIDE",
            Mod => "MOD",
            Not => "NOT",
            And => "AND",
            Or => "OR",
            BitAnd => "BITAND",
            BitOr => "BITOR",
            Assign => "ASSIGN",
            AssignPlus => "ASSIGN_PLUS",
            AssignMinus => "ASSIGN_MINUS",
            AssignTimes => "ASSIGN_TIMES",
            AssignDivide => "ASSIGN_DIVIDE",
            AssignMod => "ASSIGN_MOD",
            AssignBitAnd => "ASSIGN_BITAND",
            AssignBitOr => "ASSIGN_BITOR",
            Increment => "INCREMENT",
            Decrement => "DECREMENT",
            Semi => "SEMI",
            Colon => "COLON",
            Comma => "COMMA",
            Dot => "DOT",
            LParen => "LPAREN",
            RParen => "RPAREN",
            LBracket => "LBRACKET",
            RBracket => "RBRACKET",
            LBrace => "LBRACE",
            RBrace => "RBRACE",
            LiteralInt => "LITERAL_INT",
            LiteralFloat => "LITERAL_FLOAT",
            LiteralDouble => "LITERAL_DOUBLE",
            LiteralChar => "LITERAL_CHAR",
            LiteralString => "LITERAL_STRING",
            Ident => "IDENT",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified lexeme.
///
/// `lexeme` is the exact source text, quotes and `#` included, and
/// `position` is where its first character appeared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: impl Into<String>, position: Position) -> Self {
        Self {
            token_type,
            lexeme: lexeme.into(),
            position,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.token_type, self.lexeme, self.position)
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at line {}, column {}: {message}", .position.row + 1, .position.column + 1)]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

impl LexError {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    Scan,
    Star,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberState {
    Dig,
    Hex,
    Point,
}

/// Pull-based lexer over a character stream.
///
/// Once [`read_next`](Lexer::read_next) has signalled the end of input (or
/// failed), every later call returns `Ok(None)`.
pub struct Lexer<I: Iterator<Item = char>> {
    chars: Peekable<I>,
    position: Position,
    finished: bool,
}

impl<'a> Lexer<Chars<'a>> {
    /// Create a new lexer for the given source string.
    pub fn new(input: &'a str) -> Self {
        Self::from_chars(input.chars())
    }
}

impl<I: Iterator<Item = char>> Lexer<I> {
    pub fn from_chars(chars: I) -> Self {
        Self {
            chars: chars.peekable(),
            position: Position::default(),
            finished: false,
        }
    }

    /// Read the complete token stream.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.read_next()? {
            tokens.push(token);
        }
        debug!(count = tokens.len(), "tokenized input");
        Ok(tokens)
    }

    /// Read the next token, or `None` at end of input.
    pub fn read_next(&mut self) -> Result<Option<Token>, LexError> {
        if self.finished {
            return Ok(None);
        }

        let Some((first, pos)) = self.skip_whitespace_and_comments() else {
            self.finished = true;
            return Ok(None);
        };

        match self.next_token(first, pos) {
            Ok(token) => {
                trace!(%token, "read token");
                Ok(Some(token))
            }
            Err(err) => {
                self.finished = true;
                Err(err)
            }
        }
    }

    /// Classify a token whose first character has already been consumed.
    fn next_token(&mut self, first: char, pos: Position) -> Result<Token, LexError> {
        let token = match first {
            '#' => self.preprocessor_directive(pos),

            ';' => Token::new(TokenType::Semi, ";", pos),
            ':' => Token::new(TokenType::Colon, ":", pos),
            ',' => Token::new(TokenType::Comma, ",", pos),
            '.' => Token::new(TokenType::Dot, ".", pos),
            '(' => Token::new(TokenType::LParen, "(", pos),
            ')' => Token::new(TokenType::RParen, ")", pos),
            '[' => Token::new(TokenType::LBracket, "[", pos),
            ']' => Token::new(TokenType::RBracket, "]", pos),
            '{' => Token::new(TokenType::LBrace, "{", pos),
            '}' => Token::new(TokenType::RBrace, "}", pos),

            '+' => self.operator(
                first,
                pos,
                TokenType::Plus,
                TokenType::AssignPlus,
                Some(TokenType::Increment),
            ),
            '-' => self.operator(
                first,
                pos,
                TokenType::Minus,
                TokenType::AssignMinus,
                Some(TokenType::Decrement),
            ),
            '&' => self.operator(
                first,
                pos,
                TokenType::BitAnd,
                TokenType::AssignBitAnd,
                Some(TokenType::And),
            ),
            '|' => self.operator(
                first,
                pos,
                TokenType::BitOr,
                TokenType::AssignBitOr,
                Some(TokenType::Or),
            ),
            '*' => self.operator(first, pos, TokenType::Times, TokenType::AssignTimes, None),
            '/' => self.operator(first, pos, TokenType::Divide, TokenType::AssignDivide, None),
            '%' => self.operator(first, pos, TokenType::Mod, TokenType::AssignMod, None),

            '=' => self.comparison(first, pos, TokenType::Assign, TokenType::Eq),
            '!' => self.comparison(first, pos, TokenType::Not, TokenType::Ne),
            '<' => self.comparison(first, pos, TokenType::Lt, TokenType::Lte),
            '>' => self.comparison(first, pos, TokenType::Gt, TokenType::Gte),

            '0'..='9' => self.number_literal(first, pos),
            '\'' => self.char_literal(pos)?,
            '"' => self.string_literal(pos)?,

            c if c.is_alphabetic() || c == '_' => self.identifier_or_keyword(c, pos),

            c => {
                return Err(LexError::new(
                    format!("Unrecognized character '{}'", c.escape_default()),
                    pos,
                ))
            }
        };

        Ok(token)
    }

    /// Skip whitespace and comments, returning the first significant
    /// character (already consumed) and its position.
    fn skip_whitespace_and_comments(&mut self) -> Option<(char, Position)> {
        loop {
            let pos = self.position;
            let ch = self.advance()?;

            if ch.is_whitespace() {
                continue;
            }

            if ch == '/' {
                match self.peek() {
                    Some('/') => {
                        self.skip_line_comment();
                        continue;
                    }
                    Some('*') => {
                        self.advance();
                        self.skip_block_comment();
                        continue;
                    }
                    _ => {}
                }
            }

            return Some((ch, pos));
        }
    }

    /// Skip through the end of the current line.
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip the body of a `/* ... */` comment whose opener was consumed.
    ///
    /// Running out of input inside the comment simply ends it.
    fn skip_block_comment(&mut self) {
        let mut state = BlockState::Scan;
        while state != BlockState::Done {
            let Some(ch) = self.advance() else {
                break;
            };
            state = match (state, ch) {
                (BlockState::Scan, '*') => BlockState::Star,
                (BlockState::Star, '/') => BlockState::Done,
                (BlockState::Star, '*') => BlockState::Star,
                _ => BlockState::Scan,
            };
        }
    }

    fn preprocessor_directive(&mut self, pos: Position) -> Token {
        let mut lexeme = String::from('#');
        self.munch(&mut lexeme, |c| c == '#' || c.is_alphabetic());

        let token_type = match lexeme.as_str() {
            "#define" => TokenType::Define,
            "#include" => TokenType::Include,
            _ => TokenType::UnknownPreproc,
        };

        Token::new(token_type, lexeme, pos)
    }

    /// Operators with a bare form, an `=` compound-assignment form and
    /// optionally a doubled form (`++`, `&&`, ...).
    fn operator(
        &mut self,
        op: char,
        pos: Position,
        bare: TokenType,
        compound: TokenType,
        doubled: Option<TokenType>,
    ) -> Token {
        match (self.peek(), doubled) {
            (Some('='), _) => {
                self.advance();
                Token::new(compound, format!("{op}="), pos)
            }
            (Some(next), Some(doubled)) if next == op => {
                self.advance();
                Token::new(doubled, format!("{op}{op}"), pos)
            }
            _ => Token::new(bare, op.to_string(), pos),
        }
    }

    /// `=`, `!`, `<` and `>`, each optionally followed by `=`.
    fn comparison(
        &mut self,
        op: char,
        pos: Position,
        bare: TokenType,
        followed_by_eq: TokenType,
    ) -> Token {
        if self.advance_if('=') {
            Token::new(followed_by_eq, format!("{op}="), pos)
        } else {
            Token::new(bare, op.to_string(), pos)
        }
    }

    /// Parse numeric literal
    ///
    /// Decimal digits, optionally a `0x` prefix with hex digits, optionally
    /// a fractional part, and an optional `f`/`F` suffix which ends the
    /// literal and makes it a float.
    fn number_literal(&mut self, first_digit: char, pos: Position) -> Token {
        let mut lexeme = String::from(first_digit);
        let mut token_type = TokenType::LiteralInt;
        let mut state = NumberState::Dig;

        while let Some(ch) = self.peek() {
            let float_suffix = ch == 'f' || ch == 'F';
            match state {
                NumberState::Dig if ch.is_ascii_digit() => {}
                NumberState::Dig if lexeme == "0" && (ch == 'x' || ch == 'X') => {
                    state = NumberState::Hex;
                }
                NumberState::Dig if ch == '.' => {
                    token_type = TokenType::LiteralDouble;
                    state = NumberState::Point;
                }
                NumberState::Hex if ch.is_ascii_hexdigit() => {}
                NumberState::Point if ch.is_ascii_digit() => {}
                NumberState::Dig | NumberState::Point if float_suffix => {
                    token_type = TokenType::LiteralFloat;
                    lexeme.push(ch);
                    self.advance();
                    break;
                }
                _ => break,
            }
            lexeme.push(ch);
            self.advance();
        }

        Token::new(token_type, lexeme, pos)
    }

    /// Parse character literal: one character, or a backslash and the
    /// character it escapes, between single quotes.
    fn char_literal(&mut self, pos: Position) -> Result<Token, LexError> {
        let mut lexeme = String::from('\'');

        let body = self.expect_more("character literal")?;
        lexeme.push(body);
        if body == '\\' {
            lexeme.push(self.expect_more("character literal")?);
        }

        let at = self.position;
        match self.advance() {
            Some('\'') => lexeme.push('\''),
            Some(ch) => {
                return Err(LexError::new(
                    format!(
                        "Unexpected character '{}' in character literal",
                        ch.escape_default()
                    ),
                    at,
                ))
            }
            None => {
                return Err(LexError::new(
                    "Unexpected end of input in character literal",
                    at,
                ))
            }
        }

        Ok(Token::new(TokenType::LiteralChar, lexeme, pos))
    }

    /// Parse string literal. A backslash always escapes the next character;
    /// escapes are kept verbatim in the lexeme and not validated.
    fn string_literal(&mut self, pos: Position) -> Result<Token, LexError> {
        let mut lexeme = String::from('"');

        loop {
            let ch = self.expect_more("string literal")?;
            lexeme.push(ch);
            match ch {
                '"' => break,
                '\\' => lexeme.push(self.expect_more("string literal")?),
                _ => {}
            }
        }

        Ok(Token::new(TokenType::LiteralString, lexeme, pos))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, pos: Position) -> Token {
        let mut ident = String::from(first_char);
        self.munch(&mut ident, |c| c.is_alphanumeric() || c == '_');

        let token_type = match ident.as_str() {
            "if" => TokenType::If,
            "else" => TokenType::Else,
            "for" => TokenType::For,
            "while" => TokenType::While,
            "do" => TokenType::Do,
            "struct" => TokenType::Struct,
            "void" => TokenType::Void,
            "short" => TokenType::Short,
            "long" => TokenType::Long,
            "signed" => TokenType::Signed,
            "unsigned" => TokenType::Unsigned,
            "int" => TokenType::Int,
            "char" => TokenType::Char,
            "float" => TokenType::Float,
            "double" => TokenType::Double,
            "bool" => TokenType::Bool,
            _ => TokenType::Ident,
        };

        Token::new(token_type, ident, pos)
    }

    /// Append characters to `buf` while they satisfy `pred`.
    fn munch(&mut self, buf: &mut String, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            buf.push(ch);
            self.advance();
        }
    }

    /// Consume a character that a literal requires.
    fn expect_more(&mut self, what: &str) -> Result<char, LexError> {
        let at = self.position;
        self.advance()
            .ok_or_else(|| LexError::new(format!("Unexpected end of input in {what}"), at))
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position = self.position.advance(ch);
        Some(ch)
    }

    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }
}

impl<I: Iterator<Item = char>> Iterator for Lexer<I> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}
