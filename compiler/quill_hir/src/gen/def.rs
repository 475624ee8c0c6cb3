//! Function and class definitions.

use quill_ir::ast::{ClassDef, FunctionDef};
use quill_ir::hir::{ClosureId, Immediate, Instr, Slot};
use quill_ir::Intrinsic;

use super::{GenResult, Generator, Operand};
use crate::scope::ScopeKind;
use crate::GenError;

impl Generator {
    pub(super) fn function_def(&mut self, def: &FunctionDef) -> GenResult<()> {
        let id = self.push_closure(ScopeKind::Function);
        for param in &def.params {
            self.scopes.mark_local(&param.name);
        }
        if let Some(rest) = &def.rest {
            self.scopes.mark_local(rest);
        }
        self.collect_bindings(&def.body, true)?;
        self.load_args(def)?;
        self.block(&def.body)?;
        let none = self.imm(Immediate::None);
        self.emit(Instr::Return { value: none.slot });
        self.release(none);
        let captured = self.pop_closure();
        tracing::trace!(name = %def.name, closure = %id, captures = captured.len(), "function");

        let defaults = def
            .params
            .iter()
            .filter_map(|param| param.default.as_ref())
            .map(|default| self.expr(default))
            .collect::<GenResult<Vec<_>>>()?;
        let defaults = self.intrinsic(Intrinsic::TupleMake, defaults);
        let function = self.make_closure(id, &captured, defaults)?;
        self.store_name(&def.name, function);
        Ok(())
    }

    /// Bind parameters from `v_args0()`.
    ///
    /// A parameter with a default takes argument `i` when `i < len(args)`
    /// and otherwise the next entry of `v_defaults0()`; defaults are counted
    /// separately from positions.
    fn load_args(&mut self, def: &FunctionDef) -> GenResult<()> {
        if def.params.is_empty() {
            if let Some(rest) = &def.rest {
                let args = self.intrinsic(Intrinsic::Args, Vec::new());
                self.store_name(rest, args);
            }
            return Ok(());
        }

        let args = self.intrinsic(Intrinsic::Args, Vec::new());
        let len = self.intrinsic(Intrinsic::TupleLen, vec![args.share()]);
        let mut next_default = 0;
        for (i, param) in def.params.iter().enumerate() {
            if param.default.is_none() {
                let value = self.positional(args, i);
                self.store_name(&param.name, value);
                continue;
            }
            let default_index = next_default;
            next_default += 1;
            let position = self.int_imm(i);
            let passed = self.intrinsic(Intrinsic::IntLt, vec![position, len.share()]);
            self.emit_if_else(
                passed,
                |g| {
                    let value = g.positional(args, i);
                    g.store_name(&param.name, value);
                    Ok(())
                },
                |g| {
                    let defaults = g.intrinsic(Intrinsic::Defaults, Vec::new());
                    let index = g.int_imm(default_index);
                    let value = g.intrinsic(Intrinsic::TupleIdx, vec![defaults, index]);
                    g.store_name(&param.name, value);
                    Ok(())
                },
            )?;
        }
        self.release(len);

        if let Some(rest) = &def.rest {
            let start = self.int_imm(def.params.len());
            let end = self.imm(Immediate::None);
            let step = self.imm(Immediate::None);
            let tail = self.intrinsic(Intrinsic::TupleSlice, vec![args, start, end, step]);
            self.store_name(rest, tail);
        } else {
            self.release(args);
        }
        Ok(())
    }

    fn positional(&mut self, args: Operand, i: usize) -> Operand {
        let index = self.int_imm(i);
        self.intrinsic(Intrinsic::TupleIdx, vec![args.share(), index])
    }

    /// A class body runs once, as a function returning its namespace; the
    /// class object is `obj_new3(base, type, namespace)`.
    pub(super) fn class_def(&mut self, class: &ClassDef) -> GenResult<()> {
        let id = self.push_closure(ScopeKind::Class);
        self.collect_bindings(&class.body, true)?;
        self.block(&class.body)?;
        if self.closure_mut().is_generator {
            return Err(GenError::YieldOutsideFunction);
        }
        let locals: Vec<(String, usize)> = self
            .scopes
            .current()
            .locals()
            .map(|(name, index)| (name.to_owned(), index))
            .collect();
        let namespace = self.intrinsic(Intrinsic::DictNew, Vec::new());
        for (name, index) in locals {
            let key = self.str_imm(&name);
            let value = Operand::borrowed(Slot::local(index));
            self.intrinsic_discard(Intrinsic::DictSet, vec![namespace.share(), key, value]);
        }
        self.emit(Instr::Return {
            value: namespace.slot,
        });
        self.release(namespace);
        let captured = self.pop_closure();
        tracing::trace!(name = %class.name, closure = %id, "class");

        let base = match &class.base {
            Some(base) => self.expr(base)?,
            None => self.global_or_none("object"),
        };
        let ty = self.global_or_none("type");
        let no_defaults = self.intrinsic(Intrinsic::TupleMake, Vec::new());
        let body = self.make_closure(id, &captured, no_defaults)?;
        let no_args = self.intrinsic(Intrinsic::TupleMake, Vec::new());
        let namespace = self.intrinsic(Intrinsic::Call, vec![body, no_args]);
        let object = self.intrinsic(Intrinsic::ObjNew, vec![base, ty, namespace]);
        self.store_name(&class.name, object);
        Ok(())
    }

    /// Emit a `Closure` instruction for the finished closure `id`, resolving
    /// each captured name in the current scope.
    fn make_closure(
        &mut self,
        id: ClosureId,
        captured: &[String],
        defaults: Operand,
    ) -> GenResult<Operand> {
        let captures = captured
            .iter()
            .map(|name| self.capture_slot(name))
            .collect::<GenResult<Vec<_>>>()?;
        let defaults_slot = defaults.slot;
        self.release(defaults);
        let dest = self.temp();
        self.emit(Instr::Closure {
            dest: dest.slot,
            closure: id,
            captures,
            defaults: defaults_slot,
        });
        Ok(dest)
    }
}
