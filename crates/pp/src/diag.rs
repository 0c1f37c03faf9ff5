use std::fmt;

use lex::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub start: usize,
    pub end: usize,
}

impl Position {
    pub fn of(tok: &Token) -> Self {
        Self {
            line: tok.line,
            column: tok.column,
            start: tok.start,
            end: tok.end,
        }
    }
}

/// A collected problem report. Components accumulate these and keep going;
/// nothing in this crate aborts on malformed input.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub position: Option<Position>,
    pub expected: Option<Vec<TokenKind>>,
}

impl Diagnostic {
    pub fn msg(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
            expected: None,
        }
    }

    pub fn at(message: impl Into<String>, tok: &Token) -> Self {
        Self {
            message: message.into(),
            position: Some(Position::of(tok)),
            expected: None,
        }
    }

    pub fn expecting(message: impl Into<String>, tok: &Token, expected: Vec<TokenKind>) -> Self {
        Self {
            message: message.into(),
            position: Some(Position::of(tok)),
            expected: Some(expected),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(p) => write!(f, "{}:{}: {}", p.line, p.column, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
