#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    SyntaxKeyword,
    TypeKeyword,
    BuiltinFunction,
    BuiltinValue,
    Attribute,
    Identifier,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    Operator,
    Punct,
    Bracket,
    LineComment,
    BlockComment,
    Eof,
}

impl TokenKind {
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: u32,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn is(&self, kind: TokenKind, text: &str) -> bool {
        self.kind == kind && self.text == text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub position: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}
