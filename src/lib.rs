//! # Introduction
//!
//! snapcc tokenizes and loosely parses the subset of C found in
//! introductory programming submissions. It extracts a syntax skeleton
//! (directives, declarations, function bodies, control-flow nesting) from
//! each program snapshot without parsing expressions.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → Node tree → Snapshot / renderer
//! ```
//!
//! 1. [`parser`]: lexer, token cursor and the loose recursive-descent parser.
//!    Tree nodes hold token-index spans into the token list rather than
//!    copies of the tokens.
//! 2. [`snapshot`]: [`snapshot::Snapshot`] owns the tokens and tree of one
//!    analysed program and answers structural queries; independent snapshots
//!    can be analysed in parallel.
//! 3. [`ui`]: renders trees and token streams for inspection.
//!
//! ## Example
//!
//! ```
//! use snapcc::parser::{parse, Lexer, NodeType};
//!
//! let tokens = Lexer::new("int main() { if (x) y(); }").tokenize().unwrap();
//! let unit = parse(&tokens).unwrap();
//! assert_eq!(unit.children[0].node_type, NodeType::Declaration);
//! ```

pub mod parser;
pub mod snapshot;
pub mod ui;
