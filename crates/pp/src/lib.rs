pub mod diag;
pub mod directive;
pub mod eval;
pub mod expr;
pub mod macros;

pub use diag::{Diagnostic, Position};
pub use directive::{AliasTable, PreprocessOutput, Preprocessor};
pub use eval::{evaluate, EvalOutput};
pub use expr::{ExprNode, ParseOutput, Parser};
pub use macros::{tokens_text, Macro, MacroParam, MacroTable};

#[cfg(test)]
mod tests {
    use super::*;

    fn squash(s: &str) -> String {
        s.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn expand_value_chain() {
        let mut table = MacroTable::from_defines(&["A B", "B 7"]);
        let (tokens, diags) = table.expand_text("x = A;");
        assert!(diags.is_empty());
        assert_eq!(squash(&tokens_text(&tokens)), "x=7;");
    }

    #[test]
    fn process_ifdef_guard() {
        let pp = Preprocessor::new();
        let out = pp.process("///#ifdef FOO\nhidden\n///#endif\nkept");
        assert!(out.errors.is_empty());
        assert_eq!(out.code.trim(), "kept");
    }
}
