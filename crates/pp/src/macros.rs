use std::collections::{HashMap, HashSet};

use lex::{Lexer, Token, TokenKind as K};

use crate::diag::Diagnostic;

/// One actual or formal parameter of a function macro: the raw text plus
/// the token group it was scanned from.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroParam {
    pub body: String,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MacroDef {
    Value,
    Function { params: Vec<MacroParam> },
}

/// A `#define` entry. `tokens` starts out as the unexpanded definition body;
/// flattening replaces it with a fully substituted sequence exactly once and
/// sets `flattened`, so later lookups splice the cached tokens directly.
#[derive(Debug, Clone, PartialEq)]
pub struct Macro {
    pub name: String,
    pub def: MacroDef,
    pub body: String,
    pub tokens: Vec<Token>,
    pub flattened: bool,
}

impl Macro {
    pub fn is_function(&self) -> bool {
        matches!(self.def, MacroDef::Function { .. })
    }

    fn formal_names(&self) -> HashSet<String> {
        match &self.def {
            MacroDef::Function { params } => params.iter().map(|p| p.body.clone()).collect(),
            MacroDef::Value => HashSet::new(),
        }
    }
}

/// Concatenated token text, the way macro bodies are rendered.
pub fn tokens_text(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

/// Macro registry and expansion engine. Built once per preprocessing run
/// from every `#define` line, then queried while conditions are resolved.
/// All failures become diagnostics; expansion always yields a best-effort
/// token sequence.
pub struct MacroTable {
    macros: HashMap<String, Macro>,
    // definition order, so up-front flattening (and any cycle reports it
    // produces) is deterministic across runs
    order: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl Default for MacroTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroTable {
    pub fn new() -> Self {
        Self {
            macros: HashMap::new(),
            order: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Build a registry from raw `#define` bodies (text after the define
    /// alias) and flatten every entry up front.
    pub fn from_defines<S: AsRef<str>>(defines: &[S]) -> Self {
        let mut table = Self::new();
        for d in defines {
            table.define(d.as_ref());
        }
        for name in table.order.clone() {
            let mut visited = Vec::new();
            table.flatten(&name, &mut visited);
        }
        table
    }

    pub fn has(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Macro> {
        self.macros.get(name)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Parse one `#define` body line and register the macro. A later define
    /// of the same name replaces the earlier one.
    pub fn define(&mut self, line: &str) {
        let out = Lexer::tokenize(line);
        for e in &out.errors {
            self.diagnostics
                .push(Diagnostic::msg(format!("Macro definition error: {}", e.message)));
        }
        let tokens: Vec<Token> = out
            .tokens
            .into_iter()
            .filter(|t| !t.kind.is_comment() && t.kind != K::Eof)
            .collect();
        if tokens.is_empty() {
            self.diagnostics
                .push(Diagnostic::msg("Macro definition error: no defined macro name."));
            return;
        }
        if tokens[0].kind != K::Identifier {
            self.diagnostics.push(Diagnostic::at(
                format!(
                    "Macro definition error: macro name must be an identifier, got '{}'",
                    tokens[0].text
                ),
                &tokens[0],
            ));
            return;
        }
        let name = tokens[0].text.clone();

        // function macro iff '(' follows the name with no gap
        let is_function = tokens.len() > 1
            && tokens[1].is(K::Bracket, "(")
            && tokens[1].start == tokens[0].end;

        let macro_ = if is_function {
            let Some((params, end)) = scan_parameter_groups(&tokens, 1) else {
                self.diagnostics.push(Diagnostic::at(
                    format!("Macro definition error: invalid function macro definition '{}'", line),
                    &tokens[0],
                ));
                return;
            };
            for p in &params {
                if p.tokens.len() != 1 || p.tokens[0].kind != K::Identifier {
                    self.diagnostics.push(Diagnostic::at(
                        format!(
                            "Macro definition error: malformed parameter '{}' in macro '{}'",
                            p.body, name
                        ),
                        &p.tokens[0],
                    ));
                }
            }
            let body_tokens: Vec<Token> = tokens[end..].to_vec();
            Macro {
                name: name.clone(),
                def: MacroDef::Function { params },
                body: tokens_text(&body_tokens),
                tokens: body_tokens,
                flattened: false,
            }
        } else {
            let body_tokens: Vec<Token> = tokens[1..].to_vec();
            Macro {
                name: name.clone(),
                def: MacroDef::Value,
                body: tokens_text(&body_tokens),
                tokens: body_tokens,
                flattened: false,
            }
        };

        if self.macros.insert(name.clone(), macro_).is_none() {
            self.order.push(name);
        }
    }

    /// Tokenize and expand arbitrary text (an `#if` condition or any
    /// macro-using line). Returns the expanded tokens and the diagnostics
    /// produced by this call only.
    pub fn expand_text(&mut self, text: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let out = Lexer::tokenize(text);
        let mark = self.diagnostics.len();
        for e in &out.errors {
            self.diagnostics
                .push(Diagnostic::msg(format!("Macro expansion error: {}", e.message)));
        }
        let tokens: Vec<Token> = out
            .tokens
            .into_iter()
            .filter(|t| !t.kind.is_comment() && t.kind != K::Eof)
            .collect();
        let expanded = self.expand_tokens(&tokens, &HashSet::new(), &mut Vec::new());
        (expanded, self.diagnostics.split_off(mark))
    }

    /// Expand an already tokenized stream.
    pub fn expand(&mut self, tokens: &[Token]) -> (Vec<Token>, Vec<Diagnostic>) {
        let mark = self.diagnostics.len();
        let expanded = self.expand_tokens(tokens, &HashSet::new(), &mut Vec::new());
        (expanded, self.diagnostics.split_off(mark))
    }

    /// Resolve a macro body to a macro-free token sequence, caching the
    /// result on the entry. `visited` is the chain of names currently being
    /// flattened; re-entering one is a circular definition.
    fn flatten(&mut self, name: &str, visited: &mut Vec<String>) -> Option<Macro> {
        let mac = self.macros.get(name)?.clone();
        if mac.flattened {
            return Some(mac);
        }
        visited.push(name.to_string());
        let masked = mac.formal_names();
        let body = self.expand_tokens(&mac.tokens, &masked, visited);
        visited.pop();

        let flattened = Macro {
            body: tokens_text(&body),
            tokens: body,
            flattened: true,
            ..mac
        };
        self.macros.insert(name.to_string(), flattened.clone());
        Some(flattened)
    }

    // The shared expansion core. Identifiers in `masked` are opaque local
    // names (formal parameters of the macro being flattened), never macro
    // references.
    fn expand_tokens(
        &mut self,
        tokens: &[Token],
        masked: &HashSet<String>,
        visited: &mut Vec<String>,
    ) -> Vec<Token> {
        let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
        let mut i = 0usize;
        while i < tokens.len() {
            let tok = &tokens[i];
            if tok.kind != K::Identifier
                || masked.contains(&tok.text)
                || !self.macros.contains_key(&tok.text)
            {
                out.push(tok.clone());
                i += 1;
                continue;
            }
            if visited.iter().any(|v| v == &tok.text) {
                let mut chain = visited.clone();
                chain.push(tok.text.clone());
                self.diagnostics.push(Diagnostic::at(
                    format!(
                        "Circular macro definition detected: {}",
                        chain.join(" -> ")
                    ),
                    tok,
                ));
                out.push(tok.clone());
                i += 1;
                continue;
            }
            let is_function = self.macros[&tok.text].is_function();
            if !is_function {
                if let Some(mac) = self.flatten(&tok.text, visited) {
                    out.extend(mac.tokens.iter().cloned());
                }
                i += 1;
                continue;
            }
            // a function macro needs '(' right after the name; otherwise the
            // reference stays as-is
            if i + 1 >= tokens.len() || !tokens[i + 1].is(K::Bracket, "(") {
                out.push(tok.clone());
                i += 1;
                continue;
            }
            let Some((actuals, end)) = self.scan_arguments(tokens, i + 1, masked, visited) else {
                out.push(tok.clone());
                i += 1;
                continue;
            };
            if let Some(mac) = self.flatten(&tok.text, visited) {
                let substituted = self.invoke_function_macro(&mac, &actuals, tok);
                out.extend(substituted);
            }
            i = end;
        }
        out
    }

    // Balanced-parenthesis argument scan. `open` indexes the '(' token;
    // top-level commas split parameters, nested parentheses keep theirs.
    // Each parameter is macro-expanded (still honoring `masked`) before it
    // is stored. Returns the parameters and the index just past ')', or
    // None when the stream ends before the parentheses balance.
    fn scan_arguments(
        &mut self,
        tokens: &[Token],
        open: usize,
        masked: &HashSet<String>,
        visited: &mut Vec<String>,
    ) -> Option<(Vec<MacroParam>, usize)> {
        let (raw, end) = scan_parameter_groups(tokens, open)?;
        let mut params = Vec::with_capacity(raw.len());
        for group in raw {
            let expanded = self.expand_tokens(&group.tokens, masked, visited);
            params.push(MacroParam {
                body: tokens_text(&expanded),
                tokens: expanded,
            });
        }
        Some((params, end))
    }

    // Token-for-token parameter substitution into a flattened function-macro
    // body. Too few actuals is an error (the provided prefix still binds and
    // missing formals stay as their own names); extras are dropped silently.
    fn invoke_function_macro(
        &mut self,
        mac: &Macro,
        actuals: &[MacroParam],
        call_site: &Token,
    ) -> Vec<Token> {
        let MacroDef::Function { params } = &mac.def else {
            return mac.tokens.clone();
        };
        if actuals.len() < params.len() {
            self.diagnostics.push(Diagnostic::at(
                format!(
                    "Too few arguments for macro '{}': expected {}, got {}",
                    mac.name,
                    params.len(),
                    actuals.len()
                ),
                call_site,
            ));
        }
        let mut bindings: HashMap<&str, &MacroParam> = HashMap::new();
        for (formal, actual) in params.iter().zip(actuals.iter()) {
            bindings.insert(formal.body.as_str(), actual);
        }
        let mut out = Vec::with_capacity(mac.tokens.len());
        for tok in &mac.tokens {
            match bindings.get(tok.text.as_str()) {
                Some(actual) if tok.kind == K::Identifier => {
                    out.extend(actual.tokens.iter().cloned());
                }
                _ => out.push(tok.clone()),
            }
        }
        out
    }
}

// Raw balanced-paren split shared by formal-parameter parsing and call-site
// argument scanning. `open` must index a '(' token.
fn scan_parameter_groups(tokens: &[Token], open: usize) -> Option<(Vec<MacroParam>, usize)> {
    if open >= tokens.len() || !tokens[open].is(K::Bracket, "(") {
        return None;
    }
    let mut params: Vec<MacroParam> = Vec::new();
    let mut current: Option<Vec<Token>> = None;
    let mut depth = 1usize;
    let mut i = open + 1;
    while i < tokens.len() {
        let tok = &tokens[i];
        if tok.is(K::Bracket, "(") {
            depth += 1;
        } else if tok.is(K::Bracket, ")") {
            depth -= 1;
            if depth == 0 {
                if let Some(group) = current.take() {
                    params.push(MacroParam {
                        body: tokens_text(&group),
                        tokens: group,
                    });
                }
                return Some((params, i + 1));
            }
        }
        if depth == 1 && tok.is(K::Punct, ",") {
            if let Some(group) = current.take() {
                params.push(MacroParam {
                    body: tokens_text(&group),
                    tokens: group,
                });
            }
        } else {
            current.get_or_insert_with(Vec::new).push(tok.clone());
        }
        i += 1;
    }
    None
}
