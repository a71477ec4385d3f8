//! Text rendering of syntax trees and token lists
//!
//! One line per node, indented by depth:
//!
//! ```text
//! UNIT[#include]
//!   INCLUDE[#include]
//!   DECLARATION[int]
//!     TYPE[int]
//! ```
//!
//! The bracketed text is the lexeme of the node's first token, empty for
//! nodes with an empty span.

use crate::parser::ast::Node;
use crate::parser::lexer::Token;
use crate::ui::theme::DEFAULT_THEME;
use crossterm::style::Stylize;
use std::fmt::Write;

/// Settings for [`render_tree`] and [`render_tokens`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Append the 1-based `@line:column` of each node's first token.
    pub show_positions: bool,
    /// Emit ANSI colours.
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            show_positions: false,
            color: false,
        }
    }
}

/// Render `tree`, whose spans index into `tokens`.
pub fn render_tree(tree: &Node, tokens: &[Token], options: &RenderOptions) -> String {
    let mut out = String::new();

    for (node, depth) in tree.walk() {
        let first = node.first_token(tokens);
        let lexeme = first.map(|t| t.lexeme.as_str()).unwrap_or("");
        let indent = " ".repeat(depth * options.indent);
        let label = node.node_type.name();

        // Writing into a String cannot fail
        if options.color {
            let lexeme_color = first
                .map(|t| DEFAULT_THEME.token(t.token_type.category()))
                .unwrap_or(DEFAULT_THEME.fg);
            let _ = write!(
                out,
                "{indent}{}[{}]",
                label.with(DEFAULT_THEME.node(node.node_type)).bold(),
                lexeme.with(lexeme_color)
            );
        } else {
            let _ = write!(out, "{indent}{label}[{lexeme}]");
        }

        if options.show_positions {
            if let Some(token) = first {
                let at = format!(
                    " @{}:{}",
                    token.position.row + 1,
                    token.position.column + 1
                );
                if options.color {
                    let _ = write!(out, "{}", at.with(DEFAULT_THEME.position));
                } else {
                    out.push_str(&at);
                }
            }
        }

        out.push('\n');
    }

    out
}

/// Render one `TYPE:lexeme:row:column` line per token.
pub fn render_tokens(tokens: &[Token], options: &RenderOptions) -> String {
    let mut out = String::new();

    for token in tokens {
        if options.color {
            let color = DEFAULT_THEME.token(token.token_type.category());
            let _ = writeln!(
                out,
                "{}:{}:{}",
                token.token_type.name().with(DEFAULT_THEME.comment),
                token.lexeme.as_str().with(color),
                token.position.to_string().with(DEFAULT_THEME.position)
            );
        } else {
            let _ = writeln!(out, "{token}");
        }
    }

    out
}
