//! Expression lowering.

use quill_ir::ast::{Expr, Literal, LogicalOp, RelationOp};
use quill_ir::hir::{Immediate, Instr};
use quill_ir::{Arity, Intrinsic, INTRINSIC_PREFIX};
use quill_stack::with_stack_headroom;

use super::{GenResult, Generator, Operand};
use crate::GenError;

fn immediate(literal: &Literal) -> Immediate {
    match literal {
        Literal::Int(v) => Immediate::Int(*v),
        Literal::Bool(b) => Immediate::Bool(*b),
        Literal::Str(s) => Immediate::Str(s.clone()),
        Literal::None => Immediate::None,
        Literal::Ellipsis => Immediate::Ellipsis,
    }
}

impl Generator {
    pub(super) fn expr(&mut self, expr: &Expr) -> GenResult<Operand> {
        with_stack_headroom(|| match expr {
            Expr::Name(name) => Ok(self.load_name(name)),
            Expr::Literal(literal) => Ok(self.imm(immediate(literal))),
            Expr::Member { object, member } => {
                let object = self.expr(object)?;
                let key = self.str_imm(member);
                Ok(self.builtin("getattr", vec![object, key]))
            }
            Expr::Index { object, index } => {
                let object = self.expr(object)?;
                let index = self.expr(index)?;
                Ok(self.builtin("index", vec![object, index]))
            }
            Expr::Call { callee, args } => self.call(callee, args),
            Expr::Tuple(items) => {
                let items = self.exprs(items)?;
                Ok(self.intrinsic(Intrinsic::TupleMake, items))
            }
            Expr::Dict(entries) => {
                let dict = self.intrinsic(Intrinsic::DictNew, Vec::new());
                for (key, value) in entries {
                    let key = self.expr(key)?;
                    let value = self.expr(value)?;
                    self.intrinsic_discard(Intrinsic::DictSet, vec![dict.share(), key, value]);
                }
                Ok(dict)
            }
            Expr::Unary { op, operand } => {
                let operand = self.expr(operand)?;
                Ok(self.builtin(op.builtin_name(), vec![operand]))
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.expr(lhs)?;
                let rhs = self.expr(rhs)?;
                Ok(self.builtin(op.builtin_name(), vec![lhs, rhs]))
            }
            Expr::Logical { op, lhs, rhs } => self.logical(*op, lhs, rhs),
            Expr::Conditional {
                cond,
                then_expr,
                else_expr,
            } => {
                let cond = self.expr(cond)?;
                let truth = self.builtin("bool", vec![cond]);
                self.select(truth, then_expr, else_expr)
            }
            Expr::Relation { operands, ops } => self.relation(operands, ops),
            Expr::Yield(value) => self.yield_expr(value.as_deref()),
        })
    }

    fn exprs(&mut self, exprs: &[Expr]) -> GenResult<Vec<Operand>> {
        exprs.iter().map(|e| self.expr(e)).collect()
    }

    /// A call. `__intrinsic__<name><arity>(...)` with a bare name lowers to
    /// the intrinsic itself; every other call goes through `__builtin__call`.
    fn call(&mut self, callee: &Expr, args: &[Expr]) -> GenResult<Operand> {
        if let Expr::Name(name) = callee {
            if name.starts_with(INTRINSIC_PREFIX) {
                let intrinsic = Intrinsic::from_source_name(name)
                    .ok_or_else(|| GenError::UnknownIntrinsic(name.clone()))?;
                if let Arity::Fixed(expected) = intrinsic.arity() {
                    if expected != args.len() {
                        return Err(GenError::IntrinsicArity {
                            name: name.clone(),
                            expected,
                            found: args.len(),
                        });
                    }
                }
                let args = self.exprs(args)?;
                return Ok(self.intrinsic(intrinsic, args));
            }
        }
        let callee = self.expr(callee)?;
        let args = self.exprs(args)?;
        let packed = self.intrinsic(Intrinsic::TupleMake, args);
        Ok(self.builtin("call", vec![callee, packed]))
    }

    /// Value of `then_expr` when `cond` is not `False`, else of `else_expr`.
    fn select(&mut self, cond: Operand, then_expr: &Expr, else_expr: &Expr) -> GenResult<Operand> {
        let result = self.temp();
        self.emit_if_else(
            cond,
            |g| {
                let value = g.expr(then_expr)?;
                g.store(result.slot, value);
                Ok(())
            },
            |g| {
                let value = g.expr(else_expr)?;
                g.store(result.slot, value);
                Ok(())
            },
        )?;
        Ok(result)
    }

    /// `a and b` / `a or b`: `a` is evaluated once and is the result when it
    /// decides the outcome.
    fn logical(&mut self, op: LogicalOp, lhs: &Expr, rhs: &Expr) -> GenResult<Operand> {
        let left = self.expr(lhs)?;
        let truth = self.builtin("bool", vec![left.share()]);
        let result = self.temp();
        let keep_left = |g: &mut Generator| -> GenResult<()> {
            g.store(result.slot, left.share());
            Ok(())
        };
        let eval_right = |g: &mut Generator| -> GenResult<()> {
            let value = g.expr(rhs)?;
            g.store(result.slot, value);
            Ok(())
        };
        match op {
            LogicalOp::And => self.emit_if_else(truth, eval_right, keep_left)?,
            LogicalOp::Or => self.emit_if_else(truth, keep_left, eval_right)?,
        }
        self.release(left);
        Ok(result)
    }

    fn compare(&mut self, op: RelationOp, lhs: Operand, rhs: Operand) -> Operand {
        match op {
            RelationOp::Is => self.intrinsic(Intrinsic::Is, vec![lhs, rhs]),
            RelationOp::IsNot => {
                let same = self.intrinsic(Intrinsic::Is, vec![lhs, rhs]);
                self.intrinsic(Intrinsic::Not, vec![same])
            }
            RelationOp::Lt
            | RelationOp::Gt
            | RelationOp::Le
            | RelationOp::Ge
            | RelationOp::Eq
            | RelationOp::Ne => {
                let name = op.builtin_name().unwrap_or("eq");
                self.builtin(name, vec![lhs, rhs])
            }
        }
    }

    /// `a < b < c`: every operand is evaluated at most once, left to right,
    /// and evaluation stops at the first comparison yielding `False`.
    fn relation(&mut self, operands: &[Expr], ops: &[RelationOp]) -> GenResult<Operand> {
        let Some((first, rest)) = operands.split_first() else {
            return Ok(self.imm(Immediate::Bool(true)));
        };
        if let ([op], [second]) = (ops, rest) {
            let lhs = self.expr(first)?;
            let rhs = self.expr(second)?;
            return Ok(self.compare(*op, lhs, rhs));
        }

        let acc = self.imm(Immediate::Bool(true));
        let mut exits = Vec::new();
        let mut lhs = self.expr(first)?;
        for (i, (op, operand)) in ops.iter().zip(rest).enumerate() {
            let rhs = self.expr(operand)?;
            let result = self.compare(*op, lhs, rhs.share());
            self.store(acc.slot, result);
            if i + 1 < ops.len() {
                exits.push(self.emit_jump_if_false(acc.slot));
            }
            lhs = rhs;
        }
        self.release(lhs);
        let end = self.pos();
        for exit in exits {
            self.patch(exit, end);
        }
        Ok(acc)
    }

    /// `yield [value]` suspends the generator; the expression itself
    /// evaluates to `None`.
    fn yield_expr(&mut self, value: Option<&Expr>) -> GenResult<Operand> {
        self.closure_mut().is_generator = true;
        let value = match value {
            Some(expr) => self.expr(expr)?,
            None => self.imm(Immediate::None),
        };
        self.emit(Instr::Yield { value: value.slot });
        self.release(value);
        Ok(self.imm(Immediate::None))
    }
}
