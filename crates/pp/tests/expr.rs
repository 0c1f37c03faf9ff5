use lex::{Lexer, Token};
use pp::{evaluate, EvalOutput, ExprNode, Parser};

fn tokens_of(src: &str) -> Vec<Token> {
    let out = Lexer::tokenize(src);
    assert!(out.errors.is_empty(), "lex errors in '{src}': {:?}", out.errors);
    out.tokens
        .into_iter()
        .filter(|t| !t.kind.is_comment() && t.kind != lex::TokenKind::Eof)
        .collect()
}

fn parse_one(src: &str) -> ExprNode {
    let tokens = tokens_of(src);
    let parsed = Parser::new(&tokens).parse();
    assert!(
        parsed.diagnostics.is_empty(),
        "parse errors in '{src}': {:?}",
        parsed.diagnostics
    );
    assert_eq!(parsed.body.len(), 1, "expected one expression in '{src}'");
    parsed.body.into_iter().next().unwrap()
}

fn eval_str(src: &str) -> EvalOutput {
    evaluate(&parse_one(src))
}

fn value_of(src: &str) -> f64 {
    let out = eval_str(src);
    assert!(out.diagnostics.is_empty(), "eval errors in '{src}': {:?}", out.diagnostics);
    out.value
}

#[test]
fn arithmetic_precedence() {
    assert_eq!(value_of("2 + 3 * 4"), 14.0);
    assert_eq!(value_of("(2 + 3) * 4"), 20.0);
    assert_eq!(value_of("10 - 4 - 3"), 3.0);
    assert_eq!(value_of("7 / 2"), 3.5);
    assert_eq!(value_of("7 % 4"), 3.0);
}

#[test]
fn shift_binds_looser_than_additive() {
    assert_eq!(value_of("1 << 2 + 3"), 32.0);
    assert_eq!(value_of("16 >> 1 + 1"), 4.0);
}

#[test]
fn bitwise_and_logical_layers() {
    assert_eq!(value_of("5 & 3 | 1"), 1.0);
    assert_eq!(value_of("5 ^ 3"), 6.0);
    assert_eq!(value_of("2 * 3 + 4 < 10 && 5 > 2"), 0.0);
    assert_eq!(value_of("1 == 1 && 2 != 3"), 1.0);
    assert_eq!(value_of("0 || 2"), 1.0);
}

#[test]
fn unary_operators() {
    assert_eq!(value_of("-8 >> 1"), -4.0);
    assert_eq!(value_of("~0"), -1.0);
    assert_eq!(value_of("!0"), 1.0);
    assert_eq!(value_of("!42"), 0.0);
    assert_eq!(value_of("+5"), 5.0);
    assert_eq!(value_of("--3"), 3.0);
}

#[test]
fn int32_truncation_for_bitwise() {
    assert_eq!(value_of("1 << 2"), 4.0);
    assert_eq!(value_of("3.9 & 3"), 3.0);
    // shift counts wrap mod 32
    assert_eq!(value_of("1 << 33"), 2.0);
}

#[test]
fn literal_forms() {
    assert_eq!(value_of("0x1F"), 31.0);
    assert_eq!(value_of("0x1f"), 31.0);
    assert_eq!(value_of("42u"), 42.0);
    assert_eq!(value_of("1.5f"), 1.5);
    assert_eq!(value_of("2e10"), 2e10);
    assert_eq!(value_of("true"), 1.0);
    assert_eq!(value_of("false"), 0.0);
}

#[test]
fn ternary_is_right_associative() {
    assert_eq!(value_of("1 ? 2 ? 3 : 4 : 5"), 3.0);
    assert_eq!(value_of("0 ? 2 : 1 ? 3 : 4"), 3.0);
    assert_eq!(value_of("1 > 2 ? 10 : 20"), 20.0);
}

#[test]
fn ternary_skips_the_untaken_branch() {
    let out = eval_str("0 ? (1 / 0) : 3");
    assert!(out.diagnostics.is_empty());
    assert_eq!(out.value, 3.0);
}

#[test]
fn logical_operators_evaluate_both_sides() {
    let out = eval_str("0 && (1 / 0)");
    assert_eq!(out.value, 0.0);
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].message, "Division by zero");

    let out = eval_str("1 || (1 / 0)");
    assert_eq!(out.value, 1.0);
    assert_eq!(out.diagnostics.len(), 1);
}

#[test]
fn division_and_modulo_by_zero_yield_zero() {
    let out = eval_str("10 / 0");
    assert_eq!(out.value, 0.0);
    assert_eq!(out.diagnostics.len(), 1);
    assert_eq!(out.diagnostics[0].message, "Division by zero");

    let out = eval_str("10 % 0");
    assert_eq!(out.value, 0.0);
    assert_eq!(out.diagnostics[0].message, "Modulo by zero");
}

#[test]
fn identifiers_parse_but_do_not_evaluate() {
    let out = eval_str("FOO");
    assert_eq!(out.value, 0.0);
    assert_eq!(out.diagnostics.len(), 1);
    assert!(out.diagnostics[0]
        .message
        .contains("Unsupported evaluate node: identifier 'FOO'"));
}

#[test]
fn string_literals_parse_but_do_not_evaluate() {
    let out = eval_str("\"abc\"");
    assert_eq!(out.value, 0.0);
    assert!(out.diagnostics[0]
        .message
        .contains("Unsupported evaluate node: string literal"));
}

#[test]
fn semicolons_separate_expressions() {
    let tokens = tokens_of("1 + 1; 2 * 2");
    let parsed = Parser::new(&tokens).parse();
    assert!(parsed.diagnostics.is_empty());
    assert_eq!(parsed.body.len(), 2);
    assert_eq!(evaluate(&parsed.body[0]).value, 2.0);
    assert_eq!(evaluate(&parsed.body[1]).value, 4.0);
}

#[test]
fn bad_token_is_reported_and_parsing_continues() {
    let tokens = tokens_of("1 + , 2");
    let parsed = Parser::new(&tokens).parse();
    assert!(!parsed.diagnostics.is_empty());
    assert!(parsed.diagnostics[0]
        .message
        .contains("Unexpected token in primary expression ','"));
    // recovery produced a tree; nothing hung or panicked
    assert!(!parsed.body.is_empty());
}

#[test]
fn missing_close_paren_is_reported() {
    let tokens = tokens_of("(1 + 2");
    let parsed = Parser::new(&tokens).parse();
    assert_eq!(parsed.diagnostics.len(), 1);
    assert!(parsed.diagnostics[0]
        .message
        .contains("Expected ')' after expression start with '('"));
    assert_eq!(evaluate(&parsed.body[0]).value, 3.0);
}

#[test]
fn missing_ternary_colon_is_reported() {
    let tokens = tokens_of("1 ? 2 3");
    let parsed = Parser::new(&tokens).parse();
    assert!(parsed
        .diagnostics
        .iter()
        .any(|d| d.message.contains("Expected ':' on conditional expression")));
}

#[test]
fn diagnostic_positions_point_at_the_source() {
    let tokens = tokens_of("1 / 0");
    let parsed = Parser::new(&tokens).parse();
    let out = evaluate(&parsed.body[0]);
    let pos = out.diagnostics[0].position.expect("position");
    assert_eq!(pos.line, 1);
    assert_eq!(pos.column, 1);
}
