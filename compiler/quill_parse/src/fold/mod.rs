//! Constant folding over the parsed tree.
//!
//! Folds integer arithmetic on literal operands, `not` on literals,
//! integer comparisons between literals and conditionals with a literal
//! condition. Arithmetic uses [`quill_ir::arith`], the same helpers the
//! `int_*` intrinsics use, and is left unfolded when it would overflow or
//! divide by zero so the error surfaces at run time.

use quill_ir::arith;
use quill_ir::ast::{
    BinaryOp, ClassDef, ExceptClause, Expr, FunctionDef, Literal, Param, Pattern, RelationOp,
    Stmt, UnaryOp,
};
use quill_stack::with_stack_headroom;

/// Fold every statement of a module.
#[tracing::instrument(level = "debug", skip_all)]
pub fn fold(body: Vec<Stmt>) -> Vec<Stmt> {
    fold_block(body)
}

fn fold_block(body: Vec<Stmt>) -> Vec<Stmt> {
    body.into_iter().map(fold_stmt).collect()
}

fn fold_stmt(stmt: Stmt) -> Stmt {
    with_stack_headroom(|| match stmt {
        Stmt::Expr(expr) => Stmt::Expr(fold_expr(expr)),
        Stmt::Assign { targets, value } => Stmt::Assign {
            targets: targets.into_iter().map(fold_pattern).collect(),
            value: fold_expr(value),
        },
        Stmt::Del(target) => Stmt::Del(fold_pattern(target)),
        Stmt::Return(value) => Stmt::Return(value.map(fold_expr)),
        Stmt::Raise(value) => Stmt::Raise(fold_expr(value)),
        Stmt::If {
            cond,
            then_body,
            else_body,
        } => Stmt::If {
            cond: fold_expr(cond),
            then_body: fold_block(then_body),
            else_body: fold_block(else_body),
        },
        Stmt::While { cond, body } => Stmt::While {
            cond: fold_expr(cond),
            body: fold_block(body),
        },
        Stmt::For { target, iter, body } => Stmt::For {
            target: fold_pattern(target),
            iter: fold_expr(iter),
            body: fold_block(body),
        },
        Stmt::Def(def) => Stmt::Def(FunctionDef {
            params: def
                .params
                .into_iter()
                .map(|p| Param {
                    name: p.name,
                    default: p.default.map(fold_expr),
                })
                .collect(),
            body: fold_block(def.body),
            ..def
        }),
        Stmt::Class(class) => Stmt::Class(ClassDef {
            base: class.base.map(fold_expr),
            body: fold_block(class.body),
            ..class
        }),
        Stmt::Try { body, handlers } => Stmt::Try {
            body: fold_block(body),
            handlers: handlers
                .into_iter()
                .map(|h| ExceptClause {
                    kind: h.kind.map(fold_expr),
                    binding: h.binding,
                    body: fold_block(h.body),
                })
                .collect(),
        },
        stmt @ (Stmt::Pass
        | Stmt::Global(_)
        | Stmt::Nonlocal(_)
        | Stmt::Break
        | Stmt::Continue) => stmt,
    })
}

fn fold_pattern(pattern: Pattern) -> Pattern {
    match pattern {
        Pattern::Name(_) => pattern,
        Pattern::Tuple(items) => Pattern::Tuple(items.into_iter().map(fold_pattern).collect()),
        Pattern::Member { object, member } => Pattern::Member {
            object: fold_expr(object),
            member,
        },
        Pattern::Index { object, index } => Pattern::Index {
            object: fold_expr(object),
            index: fold_expr(index),
        },
    }
}

fn fold_boxed(expr: Box<Expr>) -> Box<Expr> {
    Box::new(fold_expr(*expr))
}

fn fold_expr(expr: Expr) -> Expr {
    with_stack_headroom(|| match expr {
        Expr::Unary { op, operand } => fold_unary(op, fold_expr(*operand)),
        Expr::Binary { op, lhs, rhs } => fold_binary(op, fold_expr(*lhs), fold_expr(*rhs)),
        Expr::Relation { operands, ops } => {
            fold_relation(operands.into_iter().map(fold_expr).collect(), ops)
        }
        Expr::Conditional {
            cond,
            then_expr,
            else_expr,
        } => match fold_expr(*cond) {
            Expr::Literal(lit) => {
                if truthy(&lit) {
                    fold_expr(*then_expr)
                } else {
                    fold_expr(*else_expr)
                }
            }
            cond => Expr::Conditional {
                cond: Box::new(cond),
                then_expr: fold_boxed(then_expr),
                else_expr: fold_boxed(else_expr),
            },
        },
        Expr::Logical { op, lhs, rhs } => Expr::Logical {
            op,
            lhs: fold_boxed(lhs),
            rhs: fold_boxed(rhs),
        },
        Expr::Member { object, member } => Expr::Member {
            object: fold_boxed(object),
            member,
        },
        Expr::Index { object, index } => Expr::Index {
            object: fold_boxed(object),
            index: fold_boxed(index),
        },
        Expr::Call { callee, args } => Expr::Call {
            callee: fold_boxed(callee),
            args: args.into_iter().map(fold_expr).collect(),
        },
        Expr::Tuple(items) => Expr::Tuple(items.into_iter().map(fold_expr).collect()),
        Expr::Dict(entries) => Expr::Dict(
            entries
                .into_iter()
                .map(|(k, v)| (fold_expr(k), fold_expr(v)))
                .collect(),
        ),
        Expr::Yield(value) => Expr::Yield(value.map(fold_boxed)),
        expr @ (Expr::Name(_) | Expr::Literal(_)) => expr,
    })
}

fn truthy(lit: &Literal) -> bool {
    match lit {
        Literal::Int(v) => *v != 0,
        Literal::Bool(b) => *b,
        Literal::Str(s) => !s.is_empty(),
        Literal::None => false,
        Literal::Ellipsis => true,
    }
}

fn fold_unary(op: UnaryOp, operand: Expr) -> Expr {
    let folded = match (op, &operand) {
        (UnaryOp::Not, Expr::Literal(lit)) => Some(Literal::Bool(!truthy(lit))),
        (UnaryOp::Pos, Expr::Literal(Literal::Int(v))) => Some(Literal::Int(*v)),
        (UnaryOp::Neg, Expr::Literal(Literal::Int(v))) => v.checked_neg().map(Literal::Int),
        (UnaryOp::Inv, Expr::Literal(Literal::Int(v))) => Some(Literal::Int(!v)),
        _ => None,
    };
    match folded {
        Some(lit) => Expr::Literal(lit),
        None => Expr::Unary {
            op,
            operand: Box::new(operand),
        },
    }
}

fn fold_binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    if let (Expr::Literal(Literal::Int(a)), Expr::Literal(Literal::Int(b))) = (&lhs, &rhs) {
        let folded = match op {
            BinaryOp::Add => arith::add(*a, *b),
            BinaryOp::Sub => arith::sub(*a, *b),
            BinaryOp::Mul => arith::mul(*a, *b),
            BinaryOp::FloorDiv => arith::floor_div(*a, *b),
            BinaryOp::Mod => arith::floor_mod(*a, *b),
        };
        if let Some(value) = folded {
            return Expr::int(value);
        }
    }
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

/// A chain of integer comparisons between literals folds to a boolean.
/// Identity comparisons are never folded.
fn fold_relation(operands: Vec<Expr>, ops: Vec<RelationOp>) -> Expr {
    let ints: Option<Vec<i64>> = operands
        .iter()
        .map(|e| match e {
            Expr::Literal(Literal::Int(v)) => Some(*v),
            _ => None,
        })
        .collect();
    let identity = ops
        .iter()
        .any(|op| matches!(op, RelationOp::Is | RelationOp::IsNot));
    let (Some(ints), false) = (ints, identity) else {
        return Expr::Relation { operands, ops };
    };
    let mut result = true;
    for (op, pair) in ops.iter().zip(ints.windows(2)) {
        let (a, b) = (pair[0], pair[1]);
        let holds = match op {
            RelationOp::Lt => a < b,
            RelationOp::Gt => a > b,
            RelationOp::Le => a <= b,
            RelationOp::Ge => a >= b,
            RelationOp::Eq => a == b,
            RelationOp::Ne => a != b,
            RelationOp::Is | RelationOp::IsNot => false,
        };
        result &= holds;
    }
    Expr::Literal(Literal::Bool(result))
}

#[cfg(test)]
mod tests;
