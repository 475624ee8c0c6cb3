//! Statement lowering and assignment targets.

use quill_ir::ast::{Pattern, Stmt};
use quill_ir::hir::{Immediate, Instr};
use quill_ir::Intrinsic;
use quill_stack::with_stack_headroom;

use super::{GenResult, Generator, Operand};

impl Generator {
    pub(super) fn block(&mut self, body: &[Stmt]) -> GenResult<()> {
        body.iter().try_for_each(|stmt| self.stmt(stmt))
    }

    fn stmt(&mut self, stmt: &Stmt) -> GenResult<()> {
        with_stack_headroom(|| match stmt {
            Stmt::Pass | Stmt::Global(_) | Stmt::Nonlocal(_) => Ok(()),
            Stmt::Expr(expr) => {
                let value = self.expr(expr)?;
                self.release(value);
                Ok(())
            }
            Stmt::Assign { targets, value } => {
                let value = self.expr(value)?;
                for target in targets {
                    self.store_pattern(target, value.share())?;
                }
                self.release(value);
                Ok(())
            }
            Stmt::Del(target) => self.delete_pattern(target),
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => self.expr(expr)?,
                    None => self.imm(Immediate::None),
                };
                self.emit(Instr::Return { value: value.slot });
                self.release(value);
                Ok(())
            }
            Stmt::Raise(value) => {
                let value = self.expr(value)?;
                self.emit(Instr::Raise { value: value.slot });
                self.release(value);
                Ok(())
            }
            Stmt::If {
                cond,
                then_body,
                else_body,
            } => self.if_stmt(cond, then_body, else_body),
            Stmt::While { cond, body } => self.while_stmt(cond, body),
            Stmt::For { target, iter, body } => self.for_stmt(target, iter, body),
            Stmt::Break => self.break_stmt(),
            Stmt::Continue => self.continue_stmt(),
            Stmt::Def(def) => self.function_def(def),
            Stmt::Class(class) => self.class_def(class),
            Stmt::Try { body, handlers } => self.try_stmt(body, handlers),
        })
    }

    /// Store `value` into `target`, consuming `value`. Tuple targets are
    /// unpacked front to back with builtin `index`.
    pub(super) fn store_pattern(&mut self, target: &Pattern, value: Operand) -> GenResult<()> {
        match target {
            Pattern::Name(name) => self.store_name(name, value),
            Pattern::Tuple(items) => {
                for (i, item) in items.iter().enumerate() {
                    let index = self.int_imm(i);
                    let element = self.builtin("index", vec![value.share(), index]);
                    self.store_pattern(item, element)?;
                }
                self.release(value);
            }
            Pattern::Member { object, member } => {
                let object = self.expr(object)?;
                let key = self.str_imm(member);
                self.builtin_discard("setattr", vec![object, key, value]);
            }
            Pattern::Index { object, index } => {
                let object = self.expr(object)?;
                let index = self.expr(index)?;
                self.builtin_discard("setitem", vec![object, index, value]);
            }
        }
        Ok(())
    }

    fn delete_pattern(&mut self, target: &Pattern) -> GenResult<()> {
        match target {
            Pattern::Name(name) => match self.scopes.get(name).slot() {
                Some(slot) => {
                    self.intrinsic_discard(Intrinsic::Del, vec![Operand::borrowed(slot)]);
                }
                None => {
                    let globals = self.intrinsic(Intrinsic::GetGlobal, Vec::new());
                    let key = self.str_imm(name);
                    self.intrinsic_discard(Intrinsic::DictDel, vec![globals, key]);
                }
            },
            Pattern::Tuple(items) => {
                for item in items {
                    self.delete_pattern(item)?;
                }
            }
            Pattern::Member { object, member } => {
                let object = self.expr(object)?;
                let key = self.str_imm(member);
                self.builtin_discard("delattr", vec![object, key]);
            }
            Pattern::Index { object, index } => {
                let object = self.expr(object)?;
                let index = self.expr(index)?;
                self.builtin_discard("delitem", vec![object, index]);
            }
        }
        Ok(())
    }
}
