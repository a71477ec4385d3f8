use crate::parser::ast::NodeType;
use crate::parser::lexer::TokenCategory;
use crossterm::style::Color;

pub struct Theme {
    pub fg: Color,
    pub comment: Color, // Grey
    pub error: Color,   // Red
    pub keyword: Color,
    pub string: Color,
    pub operator: Color,
    pub function: Color,
    pub type_name: Color, // Cyan for type names
    pub preprocessor: Color,
    pub position: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb { r: 205, g: 214, b: 244 },
    comment: Color::Rgb { r: 108, g: 112, b: 134 },
    error: Color::Rgb { r: 243, g: 139, b: 168 },
    keyword: Color::Rgb { r: 137, g: 180, b: 250 },      // Blue for keywords
    string: Color::Rgb { r: 250, g: 179, b: 135 },       // Orange for literals
    operator: Color::Rgb { r: 205, g: 214, b: 244 },
    function: Color::Rgb { r: 249, g: 226, b: 175 },     // Yellow for declarations
    type_name: Color::Rgb { r: 148, g: 226, b: 213 },    // Cyan/teal for type names
    preprocessor: Color::Rgb { r: 245, g: 194, b: 231 }, // Pink for directives
    position: Color::Rgb { r: 108, g: 112, b: 134 },
};

impl Theme {
    /// Colour for the node type label of a tree line.
    pub fn node(&self, node_type: NodeType) -> Color {
        match node_type {
            NodeType::Include | NodeType::Define => self.preprocessor,
            NodeType::Declaration | NodeType::DeclaratorList | NodeType::Declarator => {
                self.function
            }
            NodeType::Type | NodeType::ParameterList | NodeType::Parameter => self.type_name,
            t if t.is_control_flow() => self.keyword,
            NodeType::Expression => self.comment,
            _ => self.fg,
        }
    }

    /// Colour for a lexeme of the given category.
    pub fn token(&self, category: TokenCategory) -> Color {
        match category {
            TokenCategory::Preprocessor => self.preprocessor,
            TokenCategory::Keyword => self.keyword,
            TokenCategory::TypeKeyword => self.type_name,
            TokenCategory::Literal => self.string,
            TokenCategory::Operator | TokenCategory::Punctuation | TokenCategory::Grouping => {
                self.operator
            }
            TokenCategory::Identifier => self.fg,
        }
    }
}
