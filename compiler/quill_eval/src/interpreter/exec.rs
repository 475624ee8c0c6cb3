//! Instruction execution and the virtual intrinsics.

use std::rc::Rc;

use quill_ir::hir::{ClosureId, Immediate, Instr, Slot};
use quill_ir::{Arity, Intrinsic};
use smallvec::SmallVec;
use tracing::debug;

use super::{Interpreter, RunResult};
use crate::error::RuntimeError;
use crate::frame::{new_group, Frame};
use crate::intrinsic::{wrong_type, IntrinsicError};
use crate::object::{describe_exception, new_pool, ClosureValue, Object, ObjectRef, Primitive};

impl Interpreter {
    pub(super) fn exec(&mut self, instr: &Instr) -> RunResult<()> {
        match instr {
            Instr::Imm { dest, value } => {
                let s = &self.natives.singletons;
                let value = match value {
                    Immediate::Int(v) => Object::int(*v),
                    Immediate::Bool(b) => s.bool(*b),
                    Immediate::Str(text) => Object::str(text.as_str()),
                    Immediate::None => Rc::clone(&s.none),
                    Immediate::Ellipsis => Rc::clone(&s.ellipsis),
                };
                self.write(*dest, value)
            }
            Instr::Move { dest, src } => {
                let value = self.read(*src)?;
                self.write(*dest, value)
            }
            Instr::Closure {
                dest,
                closure,
                captures,
                defaults,
            } => self.make_closure(*dest, *closure, captures, *defaults),
            Instr::Intrinsic {
                dest,
                intrinsic,
                args,
            } => self.call_intrinsic(*dest, *intrinsic, args),
            Instr::JumpIfFalse { cond, target } => {
                let cond = self.read(*cond)?;
                if self.natives.singletons.is_false(&cond) {
                    self.with_frame_mut(|f| f.ip = *target)?;
                }
                Ok(())
            }
            Instr::Return { value } => {
                let value = self.read(*value)?;
                loop {
                    match self.pop_frame() {
                        None => return Err(RuntimeError::ReturnOutsideFunction),
                        Some((false, dest)) => return self.write(dest, value),
                        Some((true, _)) => {}
                    }
                }
            }
            Instr::Raise { value } => {
                let value = self.read(*value)?;
                loop {
                    match self.pop_frame() {
                        None => {
                            let description =
                                describe_exception(&value, &self.natives.singletons);
                            return Err(RuntimeError::UnhandledException(description));
                        }
                        Some((true, dest)) => return self.write(dest, value),
                        Some((false, _)) => {}
                    }
                }
            }
            Instr::PushExcept { dest, target } => {
                let group = self.groups.last().ok_or(RuntimeError::NoActiveFrame)?;
                let mut frames = group.borrow_mut();
                let handler = frames
                    .last()
                    .ok_or(RuntimeError::NoActiveFrame)?
                    .handler(*dest, *target);
                let below_top = frames.len() - 1;
                frames.insert(below_top, handler);
                if frames.len() > self.max_frames {
                    return Err(RuntimeError::FrameLimit(self.max_frames));
                }
                Ok(())
            }
            Instr::PopExcept => {
                let group = self.groups.last().ok_or(RuntimeError::NoActiveFrame)?;
                let mut frames = group.borrow_mut();
                match frames.len().checked_sub(2) {
                    Some(below_top) if frames[below_top].is_handler => {
                        frames.remove(below_top);
                        Ok(())
                    }
                    _ => Err(RuntimeError::InvalidPopExcept),
                }
            }
            Instr::Yield { value } => {
                let value = self.read(*value)?;
                if self.groups.len() < 2 {
                    return Err(RuntimeError::YieldOutsideGenerator);
                }
                self.groups.pop();
                let dest = self.with_frame(|f| f.dest)?;
                self.write(dest, value)
            }
        }
    }

    fn make_closure(
        &mut self,
        dest: Slot,
        closure: ClosureId,
        captures: &[Slot],
        defaults: Slot,
    ) -> RunResult<()> {
        let module = self.with_frame(|f| f.module)?;
        if self.module(module)?.closure(closure).is_none() {
            return Err(RuntimeError::UnknownClosure);
        }
        let captured = captures
            .iter()
            .map(|slot| self.cell(*slot))
            .collect::<RunResult<Vec<_>>>()?;
        let value = Object::new(Primitive::Closure(ClosureValue {
            module,
            closure,
            captured: Rc::new(captured),
            defaults: self.read(defaults)?,
        }));
        self.write(dest, value)
    }

    fn call_intrinsic(&mut self, dest: Slot, intrinsic: Intrinsic, args: &[Slot]) -> RunResult<()> {
        if !intrinsic.is_virtual() {
            let values = args
                .iter()
                .map(|slot| self.read(*slot))
                .collect::<RunResult<SmallVec<[ObjectRef; 4]>>>()?;
            let result = self
                .natives
                .call(intrinsic, &values)
                .map_err(|e| RuntimeError::intrinsic(intrinsic, e))?;
            return self.write(dest, result);
        }

        if let Arity::Fixed(expected) = intrinsic.arity() {
            if expected != args.len() {
                let error = IntrinsicError::Arity {
                    expected,
                    found: args.len(),
                };
                return Err(RuntimeError::intrinsic(intrinsic, error));
            }
        }
        match intrinsic {
            Intrinsic::Args => {
                let value = self.with_frame(|f| Rc::clone(&f.args))?;
                self.write(dest, value)
            }
            Intrinsic::Defaults => {
                let value = self.with_frame(|f| Rc::clone(&f.defaults))?;
                self.write(dest, value)
            }
            Intrinsic::Del => {
                self.write(dest, Rc::clone(&self.natives.singletons.none))?;
                self.write(args[0], Rc::clone(&self.natives.singletons.uninit))
            }
            Intrinsic::Call => {
                let callee = self.read(args[0])?;
                let call_args = self.read(args[1])?;
                self.call(dest, &callee, call_args)
            }
            Intrinsic::GenNext => {
                let generator = self.read(args[0])?;
                self.resume(dest, &generator)
            }
            _ => Err(RuntimeError::intrinsic(intrinsic, IntrinsicError::Virtual)),
        }
    }

    /// `v_call2`: push a frame for a plain function, or wrap a fresh
    /// suspended group in a generator object.
    fn call(&mut self, dest: Slot, callee: &ObjectRef, args: ObjectRef) -> RunResult<()> {
        let Primitive::Closure(function) = callee.primitive() else {
            let error = wrong_type(&[Rc::clone(callee)], 0, "function");
            return Err(RuntimeError::intrinsic(Intrinsic::Call, error));
        };
        if !matches!(args.primitive(), Primitive::Tuple(_)) {
            let error = IntrinsicError::WrongType {
                position: 2,
                expected: "tuple",
                found: args.kind_name(),
            };
            return Err(RuntimeError::intrinsic(Intrinsic::Call, error));
        }

        let module = self.module(function.module)?;
        let closure = module
            .closure(function.closure)
            .ok_or(RuntimeError::UnknownClosure)?;
        let frame = Frame {
            module: function.module,
            closure: function.closure,
            ip: 0,
            locals: new_pool(closure.local_size, &self.natives.singletons.uninit),
            captured: Rc::clone(&function.captured),
            args,
            defaults: Rc::clone(&function.defaults),
            is_handler: false,
            dest: Slot::local(0),
        };

        if closure.is_generator {
            debug!(closure = %function.closure, "generator created");
            let generator = Object::new(Primitive::Generator(new_group(vec![frame])));
            return self.write(dest, generator);
        }
        self.with_frame_mut(|f| {
            f.dest = dest;
            f.is_handler = false;
        })?;
        self.push_frame(frame)
    }

    /// `v_gen_next1`: make the generator's group live. Its next `Yield`
    /// (or final `Return`) writes into `dest` of the current frame.
    fn resume(&mut self, dest: Slot, generator: &ObjectRef) -> RunResult<()> {
        let Primitive::Generator(group) = generator.primitive() else {
            let error = wrong_type(&[Rc::clone(generator)], 0, "generator");
            return Err(RuntimeError::intrinsic(Intrinsic::GenNext, error));
        };
        if group.borrow().is_empty() {
            return Err(RuntimeError::GeneratorExhausted);
        }
        if self.groups.iter().any(|live| Rc::ptr_eq(live, group)) {
            return Err(RuntimeError::GeneratorRunning);
        }
        if self.groups.len() >= self.max_frames {
            return Err(RuntimeError::FrameLimit(self.max_frames));
        }
        self.with_frame_mut(|f| {
            f.dest = dest;
            f.is_handler = false;
        })?;
        self.groups.push(Rc::clone(group));
        Ok(())
    }
}
