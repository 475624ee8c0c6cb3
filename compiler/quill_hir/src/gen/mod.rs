//! The HIR generator.
//!
//! [`Generator`] owns the closures produced so far, the scope stack, and
//! per-closure loop/handler bookkeeping. Lowering is split by concern:
//!
//! - `expr.rs`: expressions, calls, name loads
//! - `stmt.rs`: simple statements, assignment and deletion targets
//! - `control_flow.rs`: the if/else helper, conditions, loops, try/except
//! - `def.rs`: functions, argument loading, classes
//! - `bindings.rs`: the pre-pass marking which names a body binds
//!
//! Every value lives in a slot. Expression lowering returns an [`Operand`]:
//! either a temporary the caller now owns, or a borrowed slot of a named
//! variable. Temporaries go back to the scope's free list as soon as the
//! instruction consuming them has been emitted.

mod bindings;
mod control_flow;
mod def;
mod expr;
mod stmt;

use quill_ir::ast::Stmt;
use quill_ir::hir::{Closure, ClosureId, Immediate, Instr, Module, Slot, SlotRef};
use quill_ir::Intrinsic;
use smallvec::SmallVec;

use crate::scope::{ScopeKind, ScopeStack};
use crate::GenError;

type GenResult<T> = Result<T, GenError>;

/// Jump target written before the real target is known.
const UNPATCHED: usize = usize::MAX;

/// Lower a module body to HIR.
#[tracing::instrument(level = "debug", skip_all)]
pub fn generate(body: &[Stmt]) -> Result<Module, GenError> {
    let mut gen = Generator::new();
    gen.collect_bindings(body, false)?;
    gen.block(body)?;
    let module = gen.finish()?;
    tracing::debug!(closures = module.closures.len(), "generated module");
    Ok(module)
}

/// A value produced by expression lowering.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Operand {
    slot: Slot,
    /// Temporaries are released by whoever consumes them; borrowed slots
    /// belong to a named variable and are never released.
    owned: bool,
}

impl Operand {
    fn borrowed(slot: Slot) -> Operand {
        Operand { slot, owned: false }
    }

    /// Non-owning view of the same slot, for using a temporary more than
    /// once before releasing it.
    fn share(self) -> Operand {
        Operand::borrowed(self.slot)
    }
}

/// Innermost loop being generated.
struct LoopContext {
    continue_target: usize,
    breaks: Vec<usize>,
    /// Handler depth when the loop started; `break`/`continue` pop every
    /// handler installed since.
    handler_depth: usize,
}

/// Bookkeeping for the closure currently being generated.
struct FnState {
    closure: ClosureId,
    loops: Vec<LoopContext>,
    handler_depth: usize,
}

impl FnState {
    fn new(closure: ClosureId) -> Self {
        FnState {
            closure,
            loops: Vec::new(),
            handler_depth: 0,
        }
    }
}

pub(crate) struct Generator {
    closures: Vec<Closure>,
    scopes: ScopeStack,
    state: FnState,
    /// States of the enclosing closures, innermost last.
    outer: Vec<FnState>,
}

impl Generator {
    fn new() -> Self {
        Generator {
            closures: vec![Closure::default()],
            scopes: ScopeStack::new(),
            state: FnState::new(ClosureId::ENTRY),
            outer: Vec::new(),
        }
    }

    fn finish(mut self) -> GenResult<Module> {
        let entry = &mut self.closures[ClosureId::ENTRY.index()];
        if entry.is_generator {
            return Err(GenError::YieldOutsideFunction);
        }
        entry.local_size = self.scopes.current().local_size();
        Ok(Module {
            closures: self.closures,
        })
    }

    // Closure management

    /// Start generating a new closure. Its id is fixed now, so closures are
    /// numbered in the order their definitions begin.
    fn push_closure(&mut self, kind: ScopeKind) -> ClosureId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "closure count never exceeds u32"
        )]
        let id = ClosureId::new(self.closures.len() as u32);
        self.closures.push(Closure::default());
        self.scopes.push(kind);
        let outer = std::mem::replace(&mut self.state, FnState::new(id));
        self.outer.push(outer);
        id
    }

    /// Finish the innermost closure and return the names it captures, in
    /// capture-index order.
    fn pop_closure(&mut self) -> Vec<String> {
        let Some(scope) = self.scopes.pop() else {
            return Vec::new();
        };
        let id = self.state.closure;
        self.closures[id.index()].local_size = scope.local_size();
        if let Some(outer) = self.outer.pop() {
            self.state = outer;
        }
        scope.captured().to_vec()
    }

    fn closure_mut(&mut self) -> &mut Closure {
        let id = self.state.closure;
        &mut self.closures[id.index()]
    }

    // Instruction emission

    /// Index the next instruction will get.
    fn pos(&self) -> usize {
        self.closures[self.state.closure.index()].instrs.len()
    }

    fn emit(&mut self, instr: Instr) -> usize {
        let instrs = &mut self.closure_mut().instrs;
        instrs.push(instr);
        instrs.len() - 1
    }

    /// Point the jump or handler at `at` to `target`.
    fn patch(&mut self, at: usize, target: usize) {
        if let Some(
            Instr::JumpIfFalse { target: slot, .. } | Instr::PushExcept { target: slot, .. },
        ) = self.closure_mut().instrs.get_mut(at)
        {
            *slot = target;
        }
    }

    fn emit_jump_if_false(&mut self, cond: Slot) -> usize {
        self.emit(Instr::JumpIfFalse {
            cond,
            target: UNPATCHED,
        })
    }

    /// Unconditional jump: a conditional jump on a fresh `False`.
    fn emit_jump(&mut self) -> usize {
        let never = self.imm(Immediate::Bool(false));
        let at = self.emit_jump_if_false(never.slot);
        self.release(never);
        at
    }

    fn jump_to(&mut self, target: usize) {
        let at = self.emit_jump();
        self.patch(at, target);
    }

    // Slots

    fn temp(&mut self) -> Operand {
        Operand {
            slot: Slot::local(self.scopes.current_mut().new_local()),
            owned: true,
        }
    }

    fn release(&mut self, operand: Operand) {
        if !operand.owned {
            return;
        }
        if let SlotRef::Local(index) = operand.slot.decode() {
            self.scopes.current_mut().del_local(index);
        }
    }

    fn imm(&mut self, value: Immediate) -> Operand {
        let dest = self.temp();
        self.emit(Instr::Imm {
            dest: dest.slot,
            value,
        });
        dest
    }

    fn str_imm(&mut self, value: &str) -> Operand {
        self.imm(Immediate::Str(value.to_owned()))
    }

    fn int_imm(&mut self, value: usize) -> Operand {
        self.imm(Immediate::Int(i64::try_from(value).unwrap_or(i64::MAX)))
    }

    /// Copy `value` into `dest`, consuming `value`.
    fn store(&mut self, dest: Slot, value: Operand) {
        self.emit(Instr::Move {
            dest,
            src: value.slot,
        });
        self.release(value);
    }

    /// Emit an intrinsic call. Arguments are released before the result
    /// slot is allocated, so the result may reuse an argument's slot.
    fn intrinsic(&mut self, intrinsic: Intrinsic, args: Vec<Operand>) -> Operand {
        let slots: SmallVec<[Slot; 4]> = args.iter().map(|a| a.slot).collect();
        for arg in args {
            self.release(arg);
        }
        let dest = self.temp();
        self.emit(Instr::Intrinsic {
            dest: dest.slot,
            intrinsic,
            args: slots,
        });
        dest
    }

    /// Emit an intrinsic whose result is not needed.
    fn intrinsic_discard(&mut self, intrinsic: Intrinsic, args: Vec<Operand>) {
        let result = self.intrinsic(intrinsic, args);
        self.release(result);
    }

    /// `dict_get3(get_global0(), name, None)`: a global read that yields
    /// `None` instead of failing when the name is unbound.
    fn global_or_none(&mut self, name: &str) -> Operand {
        let globals = self.intrinsic(Intrinsic::GetGlobal, Vec::new());
        let key = self.str_imm(name);
        let none = self.imm(Immediate::None);
        self.intrinsic(Intrinsic::DictGet, vec![globals, key, none])
    }

    /// Call `__builtin__<name>` with `args` packed into a tuple.
    fn builtin(&mut self, name: &str, args: Vec<Operand>) -> Operand {
        let callee = self.global_or_none(&format!("{}{name}", quill_ir::BUILTIN_PREFIX));
        let packed = self.intrinsic(Intrinsic::TupleMake, args);
        self.intrinsic(Intrinsic::Call, vec![callee, packed])
    }

    fn builtin_discard(&mut self, name: &str, args: Vec<Operand>) {
        let result = self.builtin(name, args);
        self.release(result);
    }

    // Names

    fn load_name(&mut self, name: &str) -> Operand {
        match self.scopes.get(name).slot() {
            Some(slot) => Operand::borrowed(slot),
            None => {
                let key = self.str_imm(name);
                self.builtin("global_get", vec![key])
            }
        }
    }

    /// Store `value` under `name`, consuming `value`.
    fn store_name(&mut self, name: &str, value: Operand) {
        match self.scopes.get(name).slot() {
            Some(slot) => self.store(slot, value),
            None => {
                let globals = self.intrinsic(Intrinsic::GetGlobal, Vec::new());
                let key = self.str_imm(name);
                self.intrinsic_discard(Intrinsic::DictSet, vec![globals, key, value]);
            }
        }
    }

    /// Slot of a name the closure being built captures from this scope.
    fn capture_slot(&mut self, name: &str) -> GenResult<Slot> {
        self.scopes
            .get(name)
            .slot()
            .ok_or_else(|| GenError::UnboundCapture(name.to_owned()))
    }
}
