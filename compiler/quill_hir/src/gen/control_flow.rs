//! Branches, loops and exception handlers.

use quill_ir::ast::{ExceptClause, Expr, Pattern, Stmt};
use quill_ir::hir::{Immediate, Instr};
use quill_ir::{Intrinsic, INTRINSIC_PREFIX};

use super::{GenResult, Generator, LoopContext, Operand, UNPATCHED};
use crate::GenError;

impl Generator {
    /// Two-way branch:
    ///
    /// ```text
    ///       jf cond -> else
    ///       <on_true>
    ///       jump -> end
    /// else: <on_false>
    /// end:
    /// ```
    ///
    /// `on_true` runs whenever `cond` holds anything but the `False`
    /// singleton.
    pub(super) fn emit_if_else(
        &mut self,
        cond: Operand,
        on_true: impl FnOnce(&mut Self) -> GenResult<()>,
        on_false: impl FnOnce(&mut Self) -> GenResult<()>,
    ) -> GenResult<()> {
        let to_else = self.emit_jump_if_false(cond.slot);
        self.release(cond);
        on_true(self)?;
        let to_end = self.emit_jump();
        let else_start = self.pos();
        on_false(self)?;
        let end = self.pos();
        self.patch(to_else, else_start);
        self.patch(to_end, end);
        Ok(())
    }

    /// The negation of a statement condition, for jumping past the body.
    ///
    /// `__intrinsic__not1(x)` written as the whole condition needs no
    /// negation: `x` itself is the jump condition. This keeps the builtins
    /// that implement truthiness from recursing into themselves.
    fn negated_condition(&mut self, cond: &Expr) -> GenResult<Operand> {
        if let Expr::Call { callee, args } = cond {
            if let (Expr::Name(name), [arg]) = (&**callee, args.as_slice()) {
                if name.starts_with(INTRINSIC_PREFIX)
                    && Intrinsic::from_source_name(name) == Some(Intrinsic::Not)
                {
                    return self.expr(arg);
                }
            }
        }
        let value = self.expr(cond)?;
        Ok(self.builtin("not", vec![value]))
    }

    pub(super) fn if_stmt(
        &mut self,
        cond: &Expr,
        then_body: &[Stmt],
        else_body: &[Stmt],
    ) -> GenResult<()> {
        let negated = self.negated_condition(cond)?;
        self.emit_if_else(negated, |g| g.block(else_body), |g| g.block(then_body))
    }

    // Loops

    fn enter_loop(&mut self, continue_target: usize) {
        let handler_depth = self.state.handler_depth;
        self.state.loops.push(LoopContext {
            continue_target,
            breaks: Vec::new(),
            handler_depth,
        });
    }

    fn exit_loop(&mut self, end: usize) {
        if let Some(context) = self.state.loops.pop() {
            for at in context.breaks {
                self.patch(at, end);
            }
        }
    }

    pub(super) fn while_stmt(&mut self, cond: &Expr, body: &[Stmt]) -> GenResult<()> {
        let top = self.pos();
        let negated = self.negated_condition(cond)?;
        self.enter_loop(top);
        self.emit_if_else(
            negated,
            |_| Ok(()),
            |g| {
                g.block(body)?;
                g.jump_to(top);
                Ok(())
            },
        )?;
        let end = self.pos();
        self.exit_loop(end);
        Ok(())
    }

    /// ```text
    ///      it = iter(iterable); stop = <fresh object>
    /// top: v = for_next(it, stop)
    ///      jf not1(is2(v, stop)) -> end
    ///      <target> = v; <body>; jump -> top
    /// end:
    /// ```
    pub(super) fn for_stmt(&mut self, target: &Pattern, iter: &Expr, body: &[Stmt]) -> GenResult<()> {
        let iterable = self.expr(iter)?;
        let it = self.builtin("iter", vec![iterable]);
        let base = self.imm(Immediate::None);
        let ty = self.imm(Immediate::None);
        let attrs = self.intrinsic(Intrinsic::DictNew, Vec::new());
        let stop = self.intrinsic(Intrinsic::ObjNew, vec![base, ty, attrs]);

        let top = self.pos();
        let value = self.builtin("for_next", vec![it.share(), stop.share()]);
        let done = self.intrinsic(Intrinsic::Is, vec![value.share(), stop.share()]);
        let more = self.intrinsic(Intrinsic::Not, vec![done]);
        self.enter_loop(top);
        let exit = self.emit_jump_if_false(more.slot);
        self.release(more);
        self.store_pattern(target, value)?;
        self.block(body)?;
        self.jump_to(top);
        let end = self.pos();
        self.patch(exit, end);
        self.exit_loop(end);

        self.release(stop);
        self.release(it);
        Ok(())
    }

    /// Pop the handlers installed inside the innermost loop.
    fn unwind_handlers_to_loop(&mut self, depth: usize) {
        for _ in depth..self.state.handler_depth {
            self.emit(Instr::PopExcept);
        }
    }

    pub(super) fn break_stmt(&mut self) -> GenResult<()> {
        let depth = match self.state.loops.last() {
            Some(context) => context.handler_depth,
            None => return Err(GenError::BreakOutsideLoop),
        };
        self.unwind_handlers_to_loop(depth);
        let at = self.emit_jump();
        if let Some(context) = self.state.loops.last_mut() {
            context.breaks.push(at);
        }
        Ok(())
    }

    pub(super) fn continue_stmt(&mut self) -> GenResult<()> {
        let (depth, target) = match self.state.loops.last() {
            Some(context) => (context.handler_depth, context.continue_target),
            None => return Err(GenError::ContinueOutsideLoop),
        };
        self.unwind_handlers_to_loop(depth);
        self.jump_to(target);
        Ok(())
    }

    // Exceptions

    /// ```text
    ///          exc = push_except -> handler
    ///          <body>
    ///          pop_except; jump -> end
    /// handler: per clause: jf isinstance(exc, T) -> next; bind; <body>; jump -> end
    ///          raise exc        (only when no clause is bare)
    /// end:
    /// ```
    pub(super) fn try_stmt(&mut self, body: &[Stmt], handlers: &[ExceptClause]) -> GenResult<()> {
        let exc = self.temp();
        let push = self.emit(Instr::PushExcept {
            dest: exc.slot,
            target: UNPATCHED,
        });
        self.state.handler_depth += 1;
        let result = self.block(body);
        self.state.handler_depth -= 1;
        result?;
        self.emit(Instr::PopExcept);
        let mut to_end = vec![self.emit_jump()];

        let handler = self.pos();
        self.patch(push, handler);
        let mut catches_all = false;
        for clause in handlers {
            let skip = match &clause.kind {
                Some(kind) => {
                    let kind = self.expr(kind)?;
                    let matches = self.builtin("isinstance", vec![exc.share(), kind]);
                    let at = self.emit_jump_if_false(matches.slot);
                    self.release(matches);
                    Some(at)
                }
                None => None,
            };
            if let Some(name) = &clause.binding {
                self.store_name(name, exc.share());
            }
            self.block(&clause.body)?;
            to_end.push(self.emit_jump());
            match skip {
                Some(at) => {
                    let next = self.pos();
                    self.patch(at, next);
                }
                None => {
                    catches_all = true;
                    break;
                }
            }
        }
        if !catches_all {
            self.emit(Instr::Raise { value: exc.slot });
        }

        let end = self.pos();
        for at in to_end {
            self.patch(at, end);
        }
        self.release(exc);
        Ok(())
    }
}
