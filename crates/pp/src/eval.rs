use crate::diag::Diagnostic;
use crate::expr::{BinaryOp, ExprNode, UnaryOp};

#[derive(Debug, Clone, Default)]
pub struct EvalOutput {
    pub value: f64,
    pub diagnostics: Vec<Diagnostic>,
}

// 32-bit two's-complement truncation for the bitwise operators, matching
// shader/preprocessor integer semantics.
fn to_int32(v: f64) -> i32 {
    if !v.is_finite() {
        return 0;
    }
    let m = v.trunc().rem_euclid(4_294_967_296.0);
    if m >= 2_147_483_648.0 {
        (m - 4_294_967_296.0) as i32
    } else {
        m as i32
    }
}

fn truthy(v: f64) -> bool {
    v != 0.0
}

fn bool_num(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Evaluate a constant expression tree to a numeric result.
///
/// `&&`/`||` do NOT short-circuit: both operands were already fully
/// evaluated by the time the operator applies. The ternary conditional DOES
/// short-circuit (only the selected branch is evaluated). That asymmetry is
/// part of the tool's contract and is pinned by tests.
pub fn evaluate(node: &ExprNode) -> EvalOutput {
    match node {
        ExprNode::Number { value, .. } => EvalOutput {
            value: *value,
            diagnostics: Vec::new(),
        },
        ExprNode::Unary { op, operand, .. } => {
            let mut out = evaluate(operand);
            out.value = match op {
                UnaryOp::Plus => out.value,
                UnaryOp::Minus => -out.value,
                UnaryOp::LogicalNot => {
                    if out.value == 0.0 {
                        1.0
                    } else {
                        0.0
                    }
                }
                UnaryOp::BitNot => f64::from(!to_int32(out.value)),
            };
            out
        }
        ExprNode::Binary {
            op, left, right, position,
        } => {
            let l = evaluate(left);
            let r = evaluate(right);
            let mut diagnostics = l.diagnostics;
            diagnostics.extend(r.diagnostics);
            let (l, r) = (l.value, r.value);
            let value = match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                BinaryOp::Mul => l * r,
                BinaryOp::Div => {
                    if r == 0.0 {
                        diagnostics.push(Diagnostic {
                            message: "Division by zero".to_string(),
                            position: Some(*position),
                            expected: None,
                        });
                        0.0
                    } else {
                        l / r
                    }
                }
                BinaryOp::Mod => {
                    if r == 0.0 {
                        diagnostics.push(Diagnostic {
                            message: "Modulo by zero".to_string(),
                            position: Some(*position),
                            expected: None,
                        });
                        0.0
                    } else {
                        l % r
                    }
                }
                BinaryOp::Shl => f64::from(to_int32(l) << (to_int32(r) & 31)),
                BinaryOp::Shr => f64::from(to_int32(l) >> (to_int32(r) & 31)),
                BinaryOp::Lt => bool_num(l < r),
                BinaryOp::Le => bool_num(l <= r),
                BinaryOp::Gt => bool_num(l > r),
                BinaryOp::Ge => bool_num(l >= r),
                BinaryOp::Eq => bool_num(l == r),
                BinaryOp::Ne => bool_num(l != r),
                BinaryOp::BitAnd => f64::from(to_int32(l) & to_int32(r)),
                BinaryOp::BitXor => f64::from(to_int32(l) ^ to_int32(r)),
                BinaryOp::BitOr => f64::from(to_int32(l) | to_int32(r)),
                BinaryOp::LAnd => bool_num(truthy(l) && truthy(r)),
                BinaryOp::LOr => bool_num(truthy(l) || truthy(r)),
            };
            EvalOutput { value, diagnostics }
        }
        ExprNode::Conditional {
            condition,
            when_true,
            when_false,
            ..
        } => {
            let cond = evaluate(condition);
            let mut diagnostics = cond.diagnostics;
            let branch = if truthy(cond.value) {
                evaluate(when_true)
            } else {
                evaluate(when_false)
            };
            diagnostics.extend(branch.diagnostics);
            EvalOutput {
                value: branch.value,
                diagnostics,
            }
        }
        ExprNode::Identifier { name, position } => EvalOutput {
            value: 0.0,
            diagnostics: vec![Diagnostic {
                message: format!("Unsupported evaluate node: identifier '{}'", name),
                position: Some(*position),
                expected: None,
            }],
        },
        ExprNode::Str { position, .. } => EvalOutput {
            value: 0.0,
            diagnostics: vec![Diagnostic {
                message: "Unsupported evaluate node: string literal".to_string(),
                position: Some(*position),
                expected: None,
            }],
        },
        ExprNode::Error { position } => EvalOutput {
            value: 0.0,
            diagnostics: vec![Diagnostic {
                message: "Unsupported evaluate node: parse error placeholder".to_string(),
                position: Some(*position),
                expected: None,
            }],
        },
    }
}
