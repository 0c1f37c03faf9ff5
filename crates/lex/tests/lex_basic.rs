use lex::{Lexer, TokenKind as K};

fn toks(src: &str) -> Vec<lex::Token> {
    Lexer::tokenize(src).tokens
}

#[test]
fn basic_wgsl_token_sequence() {
    let src = "fn main(input: VertexInput) -> VertexOutput {";
    let t = toks(src);
    assert!(t[0].is(K::SyntaxKeyword, "fn"));
    assert!(t[1].is(K::Identifier, "main"));
    assert!(t[2].is(K::Bracket, "("));
    assert!(t[3].is(K::Identifier, "input"));
    assert!(t[4].is(K::Punct, ":"));
    assert!(t[5].is(K::Identifier, "VertexInput"));
    assert!(t[6].is(K::Bracket, ")"));
    assert!(t[7].is(K::Operator, "->"));
    assert!(t[8].is(K::Identifier, "VertexOutput"));
    assert!(t[9].is(K::Bracket, "{"));
}

#[test]
fn spans_line_and_column() {
    let src = "var x;\nlet y;";
    let t = toks(src);
    let let_tok = t.iter().find(|t| t.text == "let").unwrap();
    assert_eq!(let_tok.line, 2);
    assert_eq!(let_tok.column, 1);
    assert_eq!(&src[let_tok.start..let_tok.end], "let");
    let y = t.iter().find(|t| t.text == "y").unwrap();
    assert_eq!(y.line, 2);
    assert_eq!(y.column, 5);
}

#[test]
fn comments_are_tokens() {
    let src = "let a; // trailing\n/* block\ncomment */ let b;";
    let t = toks(src);
    assert!(t.iter().any(|t| t.kind == K::LineComment));
    assert!(t.iter().any(|t| t.kind == K::BlockComment));
    assert!(t.iter().any(|t| t.is(K::Identifier, "b")));
}

#[test]
fn builtin_classification() {
    let t = toks("textureSample(t, s, uv) + dot(a, b)");
    assert!(t[0].is(K::BuiltinFunction, "textureSample"));
    assert!(t.iter().any(|t| t.is(K::BuiltinFunction, "dot")));
}

#[test]
fn unknown_attribute_is_error_not_token() {
    let out = Lexer::tokenize("@nonsense fn f() {}");
    assert_eq!(out.errors.len(), 1);
    assert!(out.errors[0].message.contains("Unknown attribute"));
    assert!(out.tokens[0].is(K::SyntaxKeyword, "fn"));
}

#[test]
fn long_run_of_bad_characters_lexes_flat() {
    // recovery must iterate, not recurse, or inputs like this blow the stack
    let src = "$".repeat(200_000);
    let out = Lexer::tokenize(&src);
    assert_eq!(out.errors.len(), 200_000);
    assert_eq!(out.tokens.len(), 1);
    assert_eq!(out.tokens[0].kind, K::Eof);
}

#[test]
fn unexpected_character_reported_with_position() {
    let out = Lexer::tokenize("let $ = 1;");
    assert_eq!(out.errors.len(), 1);
    assert!(out.errors[0].message.contains('$'));
    assert_eq!(out.errors[0].line, 1);
    assert_eq!(out.errors[0].column, 5);
    // lexing continues past the bad character
    assert!(out.tokens.iter().any(|t| t.is(K::IntLiteral, "1")));
}
