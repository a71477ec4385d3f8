//! Loose C front end
//!
//! This module turns C source text into a syntax skeleton:
//! - [`lexer`]: Tokenization (characters → tokens)
//! - [`cursor`]: Token cursor with lookahead and balanced-delimiter scans
//! - [`parse`]: Parsing (tokens → [`ast::Node`] tree)
//! - [`ast`]: Positions, spans and tree node definitions
//!
//! # Supported C Subset
//!
//! The parser recognizes the structure an introductory course produces:
//! - `#include` / `#define` lines, kept as raw token runs
//! - Declarations of variables, prototypes and function definitions
//! - Blocks and `if`/`else`, `while`, `for`, `do-while` nesting
//!
//! Expressions are not parsed. Conditions, loop headers and initializers are
//! recorded as opaque token spans, and every other statement is captured
//! whole up to its semicolon.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent. Parser methods are split across
//! `declarations` and `statements` using `impl Parser` blocks.

pub mod ast;
pub mod cursor;
mod declarations;
pub mod lexer;
pub mod parse;
mod statements;

pub use ast::{Node, NodeType, Position, Span};
pub use cursor::TokenCursor;
pub use lexer::{LexError, Lexer, Token, TokenType};
pub use parse::{parse, ParseError, Parser};
