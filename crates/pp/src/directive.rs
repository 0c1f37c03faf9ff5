use crate::diag::Diagnostic;
use crate::eval::evaluate;
use crate::expr::Parser;
use crate::macros::MacroTable;

/// Literal line prefixes for each logical directive. The defaults use the
/// `///#` convention so unprocessed shader files are still valid WGSL (the
/// directives read as ordinary line comments); a consumer may remap every
/// entry, e.g. to plain `#` style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    pub define: String,
    pub if_: String,
    pub ifdef: String,
    pub ifndef: String,
    pub elif: String,
    pub elifdef: String,
    pub elifndef: String,
    pub else_: String,
    pub endif: String,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::with_prefix("///#")
    }
}

impl AliasTable {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            define: format!("{prefix}define"),
            if_: format!("{prefix}if"),
            ifdef: format!("{prefix}ifdef"),
            ifndef: format!("{prefix}ifndef"),
            elif: format!("{prefix}elif"),
            elifdef: format!("{prefix}elifdef"),
            elifndef: format!("{prefix}elifndef"),
            else_: format!("{prefix}else"),
            endif: format!("{prefix}endif"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PreprocessOutput {
    pub code: String,
    pub errors: Vec<Diagnostic>,
}

// One entry per open `#if`-chain. `active` decides whether lines under the
// frame are emitted; `resolved` records that some branch of the chain has
// already been taken, which gates `#elif`/`#else`.
#[derive(Debug, Clone, Copy)]
struct Frame {
    active: bool,
    resolved: bool,
}

/// Line-oriented directive engine.
///
/// Pass 1 collects every `#define` line into one macro registry — including
/// defines inside conditional branches that later turn out inactive (the
/// macro namespace is flat for this tool; pinned by tests). Pass 2 walks the
/// remaining lines with a conditional-frame stack and emits a line iff every
/// frame on the stack is active.
pub struct Preprocessor {
    alias: AliasTable,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Preprocessor {
    pub fn new() -> Self {
        Self {
            alias: AliasTable::default(),
        }
    }

    pub fn with_alias(alias: AliasTable) -> Self {
        Self { alias }
    }

    pub fn process(&self, source: &str) -> PreprocessOutput {
        let alias = &self.alias;

        let mut defines: Vec<String> = Vec::new();
        let mut body: Vec<&str> = Vec::new();
        for line in source.split('\n') {
            match line.strip_prefix(alias.define.as_str()) {
                Some(rest) => defines.push(rest.trim().to_string()),
                None => body.push(line),
            }
        }

        let mut table = MacroTable::from_defines(&defines);
        let mut errors = table.take_diagnostics();

        let mut output: Vec<&str> = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();

        for raw in body {
            let line = raw.trim();

            // most specific alias first, so `#ifdef` is never read as
            // `#if def ...`
            if let Some(rest) = line.strip_prefix(alias.elifndef.as_str()) {
                match stack.last_mut() {
                    None => errors.push(Diagnostic::msg("Unexpected #elifndef")),
                    Some(top) => {
                        let cond = !table.has(rest.trim());
                        take_branch(top, cond);
                    }
                }
                continue;
            }
            if let Some(rest) = line.strip_prefix(alias.elifdef.as_str()) {
                match stack.last_mut() {
                    None => errors.push(Diagnostic::msg("Unexpected #elifdef")),
                    Some(top) => {
                        let cond = table.has(rest.trim());
                        take_branch(top, cond);
                    }
                }
                continue;
            }
            if let Some(rest) = line.strip_prefix(alias.elif.as_str()) {
                match stack.last_mut() {
                    None => errors.push(Diagnostic::msg("Unexpected #elif")),
                    Some(top) => {
                        let (cond, diags) = evaluate_condition(&mut table, rest.trim());
                        errors.extend(diags);
                        take_branch(top, cond);
                    }
                }
                continue;
            }
            if let Some(rest) = line.strip_prefix(alias.ifndef.as_str()) {
                let cond = !table.has(rest.trim());
                stack.push(Frame {
                    active: cond,
                    resolved: cond,
                });
                continue;
            }
            if let Some(rest) = line.strip_prefix(alias.ifdef.as_str()) {
                let cond = table.has(rest.trim());
                stack.push(Frame {
                    active: cond,
                    resolved: cond,
                });
                continue;
            }
            if let Some(rest) = line.strip_prefix(alias.if_.as_str()) {
                let (cond, diags) = evaluate_condition(&mut table, rest.trim());
                errors.extend(diags);
                stack.push(Frame {
                    active: cond,
                    resolved: cond,
                });
                continue;
            }
            if line.strip_prefix(alias.else_.as_str()).is_some() {
                match stack.last_mut() {
                    None => errors.push(Diagnostic::msg("Unexpected #else")),
                    Some(top) => take_branch(top, true),
                }
                continue;
            }
            if line.strip_prefix(alias.endif.as_str()).is_some() {
                if stack.pop().is_none() {
                    errors.push(Diagnostic::msg("Unexpected #endif"));
                }
                continue;
            }

            if stack.iter().all(|f| f.active) {
                output.push(raw);
            }
        }

        PreprocessOutput {
            code: output.join("\n"),
            errors,
        }
    }
}

// `#elif`-family / `#else` branch selection: the branch activates only if
// its condition holds and no earlier branch of the chain was taken.
fn take_branch(top: &mut Frame, condition: bool) {
    let active = condition && !top.resolved;
    top.active = active;
    if active {
        top.resolved = true;
    }
}

/// Resolve an `#if`/`#elif` condition: expand macros, parse, evaluate.
/// Any diagnostic along the way makes the condition false; the diagnostics
/// are reported either way.
pub fn evaluate_condition(table: &mut MacroTable, expression: &str) -> (bool, Vec<Diagnostic>) {
    let (tokens, mut errors) = table.expand_text(expression);
    if !errors.is_empty() {
        return (false, errors);
    }
    let parsed = Parser::new(&tokens).parse();
    if !parsed.diagnostics.is_empty() {
        errors.extend(parsed.diagnostics);
        return (false, errors);
    }
    let Some(first) = parsed.body.first() else {
        return (false, errors);
    };
    let evaluated = evaluate(first);
    if !evaluated.diagnostics.is_empty() {
        errors.extend(evaluated.diagnostics);
        return (false, errors);
    }
    (evaluated.value != 0.0, errors)
}
