use crate::keywords::{
    ATTRIBUTES, BRACKET_CHARS, BUILTIN_FUNCTIONS, BUILTIN_VALUES, OPERATOR_CHARS,
    PUNCTUATION_CHARS, SYNTAX_KEYWORDS, THREE_CHAR_OPERATORS, TWO_CHAR_OPERATORS, TYPE_KEYWORDS,
};
use crate::token::{LexError, LexOutput, Token, TokenKind as K};

pub struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    len: usize,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            len: src.len(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input. Lexical errors are collected, never thrown;
    /// the token stream always ends with an `Eof` token.
    pub fn tokenize(src: &'a str) -> LexOutput {
        let mut lx = Lexer::new(src);
        let mut out = LexOutput::default();
        loop {
            match lx.next_token(&mut out.errors) {
                Some(tok) => out.tokens.push(tok),
                None => break,
            }
        }
        out.tokens.push(Token {
            kind: K::Eof,
            text: String::new(),
            line: lx.line,
            column: lx.column,
            start: lx.pos,
            end: lx.pos,
        });
        out
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }
    fn peek_at(&self, n: usize) -> Option<u8> {
        self.bytes.get(self.pos + n).copied()
    }
    fn starts_with(&self, s: &str) -> bool {
        self.bytes
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(s.as_bytes()))
    }

    // All advancing goes through here so line/column stay consistent.
    fn advance(&mut self, n: usize) {
        for _ in 0..n {
            if self.pos >= self.len {
                break;
            }
            if self.bytes[self.pos] == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            self.pos += 1;
        }
    }

    fn is_ident_start(c: u8) -> bool {
        c == b'_' || (c as char).is_ascii_alphabetic()
    }
    fn is_ident_continue(c: u8) -> bool {
        c == b'_' || (c as char).is_ascii_alphanumeric()
    }

    fn make(&self, kind: K, start: usize, line: u32, column: u32) -> Token {
        Token {
            kind,
            text: self.src[start..self.pos].to_string(),
            line,
            column,
            start,
            end: self.pos,
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.advance(1);
        }
    }

    // Error recovery continues the scan loop rather than recursing, so a
    // long run of bad characters cannot grow the stack.
    fn next_token(&mut self, errors: &mut Vec<LexError>) -> Option<Token> {
        loop {
            self.skip_ws();
            let c = self.peek()?;
            let (start, line, column) = (self.pos, self.line, self.column);

            // comments
            if self.starts_with("//") {
                self.advance(2);
                while let Some(c2) = self.peek() {
                    if c2 == b'\n' {
                        break;
                    }
                    self.advance(1);
                }
                return Some(self.make(K::LineComment, start, line, column));
            }
            if self.starts_with("/*") {
                self.advance(2);
                while self.pos < self.len && !self.starts_with("*/") {
                    self.advance(1);
                }
                if self.starts_with("*/") {
                    self.advance(2);
                    return Some(self.make(K::BlockComment, start, line, column));
                }
                errors.push(LexError {
                    message: "Unterminated block comment".to_string(),
                    line,
                    column,
                    position: start,
                });
                return None;
            }

            // attribute: '@' followed by a known attribute name
            if c == b'@' {
                self.advance(1);
                let name_start = self.pos;
                while let Some(c2) = self.peek() {
                    if Self::is_ident_continue(c2) {
                        self.advance(1);
                    } else {
                        break;
                    }
                }
                let name = &self.src[name_start..self.pos];
                if ATTRIBUTES.contains(&name) {
                    return Some(self.make(K::Attribute, start, line, column));
                }
                errors.push(LexError {
                    message: format!("Unknown attribute '{}'", name),
                    line,
                    column,
                    position: start,
                });
                continue;
            }

            // identifier / keyword / builtin
            if Self::is_ident_start(c) {
                self.advance(1);
                while let Some(c2) = self.peek() {
                    if Self::is_ident_continue(c2) {
                        self.advance(1);
                    } else {
                        break;
                    }
                }
                let text = &self.src[start..self.pos];
                let kind = if SYNTAX_KEYWORDS.contains(&text) {
                    K::SyntaxKeyword
                } else if TYPE_KEYWORDS.contains(&text) {
                    K::TypeKeyword
                } else if BUILTIN_FUNCTIONS.contains(&text) {
                    K::BuiltinFunction
                } else if BUILTIN_VALUES.contains(&text) {
                    K::BuiltinValue
                } else {
                    K::Identifier
                };
                return Some(self.make(kind, start, line, column));
            }

            // number literal: int or float, hex, exponent, f/h/u/i suffix
            if (c as char).is_ascii_digit()
                || (c == b'.' && self.peek_at(1).is_some_and(|c2| (c2 as char).is_ascii_digit()))
            {
                return Some(self.lex_number(start, line, column));
            }

            if c == b'"' {
                return Some(self.lex_string(start, line, column));
            }

            // operators: longest match first, then single-char classes
            for op in THREE_CHAR_OPERATORS {
                if self.starts_with(op) {
                    self.advance(3);
                    return Some(self.make(K::Operator, start, line, column));
                }
            }
            for op in TWO_CHAR_OPERATORS {
                if self.starts_with(op) {
                    self.advance(2);
                    return Some(self.make(K::Operator, start, line, column));
                }
            }
            let ch = c as char;
            self.advance(1);
            if PUNCTUATION_CHARS.contains(&ch) {
                return Some(self.make(K::Punct, start, line, column));
            }
            if BRACKET_CHARS.contains(&ch) {
                return Some(self.make(K::Bracket, start, line, column));
            }
            if OPERATOR_CHARS.contains(&ch) {
                return Some(self.make(K::Operator, start, line, column));
            }

            errors.push(LexError {
                message: format!("Unexpected character '{}'", ch),
                line,
                column,
                position: start,
            });
        }
    }

    fn lex_number(&mut self, start: usize, line: u32, column: u32) -> Token {
        let mut is_float = false;
        if self.starts_with("0x") || self.starts_with("0X") {
            self.advance(2);
            while self.peek().is_some_and(|c| (c as char).is_ascii_hexdigit()) {
                self.advance(1);
            }
        } else {
            while self.peek().is_some_and(|c| (c as char).is_ascii_digit()) {
                self.advance(1);
            }
            if self.peek() == Some(b'.') {
                is_float = true;
                self.advance(1);
                while self.peek().is_some_and(|c| (c as char).is_ascii_digit()) {
                    self.advance(1);
                }
            }
            if matches!(self.peek(), Some(b'e' | b'E')) {
                self.advance(1);
                if matches!(self.peek(), Some(b'+' | b'-')) {
                    self.advance(1);
                }
                while self.peek().is_some_and(|c| (c as char).is_ascii_digit()) {
                    self.advance(1);
                }
            }
            match self.peek() {
                Some(b'f' | b'h') => {
                    is_float = true;
                    self.advance(1);
                }
                Some(b'u' | b'i') => {
                    self.advance(1);
                }
                _ => {}
            }
        }
        let kind = if is_float { K::FloatLiteral } else { K::IntLiteral };
        self.make(kind, start, line, column)
    }

    fn lex_string(&mut self, start: usize, line: u32, column: u32) -> Token {
        self.advance(1);
        while let Some(c) = self.peek() {
            if c == b'"' {
                self.advance(1);
                break;
            }
            if c == b'\\' && self.peek_at(1).is_some() {
                self.advance(2);
            } else {
                self.advance(1);
            }
        }
        // text keeps the surrounding quotes; consumers strip as needed
        self.make(K::StringLiteral, start, line, column)
    }
}
