//! Terminal rendering of analysis results, styled with
//! [crossterm](https://github.com/crossterm-rs/crossterm).
//!
//! - **[`tree`]**: indented `NODE_TYPE[lexeme]` dump of a syntax tree, and a
//!   token listing
//! - **[`theme`]**: centralized color palette

pub mod theme;
pub mod tree;

pub use tree::{render_tokens, render_tree, RenderOptions};
