use lex::{Token, TokenKind as K};

use crate::diag::{Diagnostic, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    LogicalNot,
    BitNot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    Shl,
    Shr,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    BitAnd,
    BitXor,
    BitOr,
    LAnd,
    LOr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    Number {
        value: f64,
        position: Position,
    },
    Str {
        value: String,
        position: Position,
    },
    Identifier {
        name: String,
        position: Position,
    },
    Unary {
        op: UnaryOp,
        operand: Box<ExprNode>,
        position: Position,
    },
    Binary {
        op: BinaryOp,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
        position: Position,
    },
    Conditional {
        condition: Box<ExprNode>,
        when_true: Box<ExprNode>,
        when_false: Box<ExprNode>,
        position: Position,
    },
    // placeholder emitted on local recovery so parsing can continue
    Error {
        position: Position,
    },
}

impl ExprNode {
    pub fn position(&self) -> Position {
        match self {
            ExprNode::Number { position, .. }
            | ExprNode::Str { position, .. }
            | ExprNode::Identifier { position, .. }
            | ExprNode::Unary { position, .. }
            | ExprNode::Binary { position, .. }
            | ExprNode::Conditional { position, .. }
            | ExprNode::Error { position } => *position,
        }
    }
}

// Binary levels only; '?' and ':' belong to the conditional production and
// terminate the climbing loop.
fn binary_op(text: &str) -> Option<(BinaryOp, u8)> {
    use BinaryOp::*;
    Some(match text {
        "*" => (Mul, 13),
        "/" => (Div, 13),
        "%" => (Mod, 13),
        "+" => (Add, 12),
        "-" => (Sub, 12),
        "<<" => (Shl, 11),
        ">>" => (Shr, 11),
        "<" => (Lt, 10),
        "<=" => (Le, 10),
        ">" => (Gt, 10),
        ">=" => (Ge, 10),
        "==" => (Eq, 9),
        "!=" => (Ne, 9),
        "&" => (BitAnd, 8),
        "^" => (BitXor, 7),
        "|" => (BitOr, 6),
        "&&" => (LAnd, 5),
        "||" => (LOr, 4),
        _ => return None,
    })
}

#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub body: Vec<ExprNode>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Precedence-climbing parser for the constant-expression grammar used by
/// `#if`/`#elif`. Expects an already macro-expanded, comment-free token
/// stream. Parse failures are recovered token-locally: the offending token
/// is reported, consumed, and replaced by an `Error` node.
pub struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn parse(mut self) -> ParseOutput {
        let mut body = Vec::new();
        while !self.is_end() {
            if self.current().is(K::Punct, ";") {
                self.advance();
                continue;
            }
            body.push(self.parse_expression());
        }
        ParseOutput {
            body,
            diagnostics: self.diagnostics,
        }
    }

    fn is_end(&self) -> bool {
        self.pos >= self.tokens.len() || self.tokens[self.pos].kind == K::Eof
    }

    fn current(&self) -> &Token {
        // callers check is_end(); the last token is a safe anchor otherwise
        if self.pos < self.tokens.len() {
            &self.tokens[self.pos]
        } else {
            &self.tokens[self.tokens.len() - 1]
        }
    }

    fn previous(&self) -> &Token {
        if self.pos == 0 {
            &self.tokens[0]
        } else {
            &self.tokens[self.pos - 1]
        }
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn span_from(&self, start: Position) -> Position {
        let end = self.previous();
        Position {
            line: start.line,
            column: start.column,
            start: start.start,
            end: end.end,
        }
    }

    fn parse_expression(&mut self) -> ExprNode {
        let node = self.parse_binary(0);
        if !self.is_end() && self.current().is(K::Operator, "?") {
            self.advance();
            let when_true = self.parse_expression();
            if !self.is_end() && self.current().is(K::Punct, ":") {
                self.advance();
            } else {
                let tok = if self.is_end() {
                    self.previous().clone()
                } else {
                    self.current().clone()
                };
                self.diagnostics.push(Diagnostic::expecting(
                    "Expected ':' on conditional expression",
                    &tok,
                    vec![K::Punct],
                ));
            }
            let when_false = self.parse_expression();
            let position = self.span_from(node.position());
            return ExprNode::Conditional {
                condition: Box::new(node),
                when_true: Box::new(when_true),
                when_false: Box::new(when_false),
                position,
            };
        }
        node
    }

    fn parse_binary(&mut self, min_precedence: u8) -> ExprNode {
        let mut left = self.parse_primary();
        while !self.is_end() {
            let Some((op, precedence)) = binary_op(&self.current().text) else {
                break;
            };
            if precedence < min_precedence {
                break;
            }
            self.advance();
            let right = self.parse_binary(precedence + 1);
            let position = self.span_from(left.position());
            left = ExprNode::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                position,
            };
        }
        left
    }

    fn parse_primary(&mut self) -> ExprNode {
        if self.is_end() {
            let tok = self.previous().clone();
            self.diagnostics.push(Diagnostic::at(
                "Unexpected end of expression",
                &tok,
            ));
            return ExprNode::Error {
                position: Position::of(&tok),
            };
        }
        let tok = self.current().clone();
        let position = Position::of(&tok);

        match tok.kind {
            K::IntLiteral | K::FloatLiteral => {
                self.advance();
                let value = match parse_number(&tok.text) {
                    Some(v) => v,
                    None => {
                        self.diagnostics.push(Diagnostic::at(
                            format!("Invalid number literal '{}'", tok.text),
                            &tok,
                        ));
                        0.0
                    }
                };
                ExprNode::Number { value, position }
            }
            K::StringLiteral => {
                self.advance();
                ExprNode::Str {
                    value: tok.text.trim_matches('"').to_string(),
                    position,
                }
            }
            K::SyntaxKeyword if tok.text == "true" => {
                self.advance();
                ExprNode::Number { value: 1.0, position }
            }
            K::SyntaxKeyword if tok.text == "false" => {
                self.advance();
                ExprNode::Number { value: 0.0, position }
            }
            K::Bracket if tok.text == "(" => {
                self.advance();
                let node = self.parse_expression();
                if !self.is_end() && self.current().is(K::Bracket, ")") {
                    self.advance();
                } else {
                    let at = if self.is_end() {
                        self.previous().clone()
                    } else {
                        self.current().clone()
                    };
                    self.diagnostics.push(Diagnostic::expecting(
                        "Expected ')' after expression start with '('",
                        &at,
                        vec![K::Bracket],
                    ));
                }
                node
            }
            K::Operator if matches!(tok.text.as_str(), "+" | "-" | "!" | "~") => {
                self.advance();
                let op = match tok.text.as_str() {
                    "+" => UnaryOp::Plus,
                    "-" => UnaryOp::Minus,
                    "!" => UnaryOp::LogicalNot,
                    _ => UnaryOp::BitNot,
                };
                let operand = self.parse_primary();
                let position = self.span_from(position);
                ExprNode::Unary {
                    op,
                    operand: Box::new(operand),
                    position,
                }
            }
            // accepted syntactically; the evaluator rejects them (no
            // variable environment at this layer)
            K::Identifier => {
                self.advance();
                ExprNode::Identifier {
                    name: tok.text.clone(),
                    position,
                }
            }
            _ => {
                self.diagnostics.push(Diagnostic::at(
                    format!("Unexpected token in primary expression '{}'", tok.text),
                    &tok,
                ));
                self.advance();
                ExprNode::Error { position }
            }
        }
    }
}

// WGSL-ish numeric literal to f64: optional u/i/f/h suffix, hex form, or
// decimal with fraction/exponent.
fn parse_number(text: &str) -> Option<f64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    let trimmed = text
        .strip_suffix(['u', 'i', 'f', 'h'])
        .unwrap_or(text);
    trimmed.parse::<f64>().ok()
}
