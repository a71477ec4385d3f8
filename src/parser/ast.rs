// Syntax skeleton definitions for the loose C parser

use crate::parser::lexer::Token;
use std::fmt;

/// Zero-based source position of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Position after consuming `ch` from this position.
    pub fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Position::new(self.row + 1, 0)
        } else {
            Position::new(self.row, self.column + 1)
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

/// Half-open range of token indices into the token list a tree was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} past end {end}");
        Self { start, end }
    }
}

/// Kinds of nodes in the syntax skeleton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Unit,
    Include,
    Define,
    Declaration,
    Type,
    DeclaratorList,
    Declarator,
    ParameterList,
    Parameter,
    BlockStatement,
    Statement,
    IfStatement,
    WhileStatement,
    ForStatement,
    DoWhileStatement,
    /// Unparsed expression: a condition, loop header, or initializer.
    Expression,
}

impl NodeType {
    pub fn name(self) -> &'static str {
        match self {
            NodeType::Unit => "UNIT",
            NodeType::Include => "INCLUDE",
            NodeType::Define => "DEFINE",
            NodeType::Declaration => "DECLARATION",
            NodeType::Type => "TYPE",
            NodeType::DeclaratorList => "DECLARATOR_LIST",
            NodeType::Declarator => "DECLARATOR",
            NodeType::ParameterList => "PARAMETER_LIST",
            NodeType::Parameter => "PARAMETER",
            NodeType::BlockStatement => "BLOCK_STATEMENT",
            NodeType::Statement => "STATEMENT",
            NodeType::IfStatement => "IF_STATEMENT",
            NodeType::WhileStatement => "WHILE_STATEMENT",
            NodeType::ForStatement => "FOR_STATEMENT",
            NodeType::DoWhileStatement => "DO_WHILE_STATEMENT",
            NodeType::Expression => "EXPRESSION",
        }
    }

    /// Control-flow constructs that nest a body statement.
    pub fn is_control_flow(self) -> bool {
        matches!(
            self,
            NodeType::IfStatement
                | NodeType::WhileStatement
                | NodeType::ForStatement
                | NodeType::DoWhileStatement
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A node of the loose syntax tree.
///
/// Nodes never own token data. The span indexes into the token list the
/// tree was parsed from, so resolving the text of a node goes back through
/// that list (see [`Node::tokens`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub node_type: NodeType,
    pub children: Vec<Node>,
    pub span: Span,
}

impl Node {
    pub fn new(node_type: NodeType, span: Span) -> Self {
        Self {
            node_type,
            children: Vec::new(),
            span,
        }
    }

    pub fn with_children(node_type: NodeType, span: Span, children: Vec<Node>) -> Self {
        Self {
            node_type,
            children,
            span,
        }
    }

    pub fn start_pos(&self) -> usize {
        self.span.start
    }

    pub fn end_pos(&self) -> usize {
        self.span.end
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The tokens covered by this node's span.
    ///
    /// Returns an empty slice if the span does not fit `tokens`, which only
    /// happens when the node is paired with a different token list.
    pub fn tokens<'t>(&self, tokens: &'t [Token]) -> &'t [Token] {
        tokens.get(self.span.start..self.span.end).unwrap_or(&[])
    }

    /// First token of the span, if the span is non-empty.
    pub fn first_token<'t>(&self, tokens: &'t [Token]) -> Option<&'t Token> {
        self.tokens(tokens).first()
    }

    /// Lexemes of the span joined with single spaces.
    pub fn text(&self, tokens: &[Token]) -> String {
        self.tokens(tokens)
            .iter()
            .map(|t| t.lexeme.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Pre-order traversal yielding each node with its depth below `self`.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(self, 0)],
        }
    }

    /// Children of the given type, in order.
    pub fn children_of(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.children
            .iter()
            .filter(move |c| c.node_type == node_type)
    }
}

/// Iterator returned by [`Node::walk`]
pub struct Walk<'a> {
    stack: Vec<(&'a Node, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a Node, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((node, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_advance() {
        let pos = Position::default();
        let pos = pos.advance('a');
        assert_eq!(pos, Position::new(0, 1));
        let pos = pos.advance('\n');
        assert_eq!(pos, Position::new(1, 0));
    }

    #[test]
    fn test_walk_is_preorder() {
        let tree = Node::with_children(
            NodeType::Unit,
            Span::new(0, 4),
            vec![
                Node::with_children(
                    NodeType::Declaration,
                    Span::new(0, 3),
                    vec![Node::new(NodeType::Type, Span::new(0, 1))],
                ),
                Node::new(NodeType::Include, Span::new(3, 4)),
            ],
        );

        let order: Vec<_> = tree.walk().map(|(n, d)| (n.node_type, d)).collect();
        assert_eq!(
            order,
            vec![
                (NodeType::Unit, 0),
                (NodeType::Declaration, 1),
                (NodeType::Type, 2),
                (NodeType::Include, 1),
            ]
        );
    }

    #[test]
    fn test_tokens_out_of_range_is_empty() {
        let node = Node::new(NodeType::Statement, Span::new(2, 5));
        assert!(node.tokens(&[]).is_empty());
        assert_eq!(node.text(&[]), "");
    }
}
