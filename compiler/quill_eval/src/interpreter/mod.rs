//! The frame-stack interpreter.
//!
//! [`Interpreter`] owns every loaded module, the stack of live frame groups
//! and the native intrinsic state. Running a module pushes one group holding
//! the entry frame and dispatches until that frame runs off the end of the
//! entry closure.
//!
//! # Control transfer
//!
//! Nothing recurses on the host stack. A call pushes a frame onto the live
//! group; `Return` and `Raise` pop frames until they reach the kind of frame
//! they are looking for (a caller, or a handler installed by `PushExcept`);
//! a generator's body is its own group, pushed by `v_gen_next1` and popped
//! by `Yield` or by running out of frames. See `exec` for each instruction.

mod builder;
mod exec;

pub use builder::InterpreterBuilder;

use std::fmt;
use std::rc::Rc;

use quill_ir::hir::{ClosureId, Module, Slot, SlotRef};
use tracing::{debug, trace};

use crate::error::RuntimeError;
use crate::frame::{new_group, Frame, FrameGroup};
use crate::intrinsic::Natives;
use crate::io::SharedOutput;
use crate::object::{new_pool, repr, Cell, Object, ObjectRef, Primitive, Singletons};

type RunResult<T> = Result<T, RuntimeError>;

/// Handle of a module loaded into an [`Interpreter`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ModuleId(u32);

impl ModuleId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// What a finished run leaves behind: the entry frame's local cells.
#[derive(Debug)]
pub struct RunOutcome {
    locals: Vec<ObjectRef>,
}

impl RunOutcome {
    pub fn locals(&self) -> &[ObjectRef] {
        &self.locals
    }
}

pub struct Interpreter {
    modules: Vec<Rc<Module>>,
    /// Live frame groups; the last one is executing.
    groups: Vec<FrameGroup>,
    natives: Natives,
    max_frames: usize,
    step_limit: Option<u64>,
    steps: u64,
}

impl Interpreter {
    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    pub fn load(&mut self, module: Module) -> ModuleId {
        let id = ModuleId(u32::try_from(self.modules.len()).unwrap_or(u32::MAX));
        debug!(module = %id, closures = module.closures.len(), "module loaded");
        self.modules.push(Rc::new(module));
        id
    }

    /// Run a loaded module's entry closure to completion.
    ///
    /// Globals written by earlier runs stay visible, which is how the prelude
    /// reaches the main module. Any error leaves no frames behind.
    #[tracing::instrument(level = "debug", skip_all, fields(module = %id))]
    pub fn run(&mut self, id: ModuleId) -> RunResult<RunOutcome> {
        let module = self.module(id)?;
        let entry = module.entry().ok_or(RuntimeError::UnknownClosure)?;
        self.groups.clear();
        self.steps = 0;

        let empty = Object::tuple(Vec::new());
        let frame = Frame {
            module: id,
            closure: ClosureId::ENTRY,
            ip: 0,
            locals: new_pool(entry.local_size, &self.natives.singletons.uninit),
            captured: new_pool(0, &self.natives.singletons.uninit),
            args: Rc::clone(&empty),
            defaults: empty,
            is_handler: false,
            dest: Slot::local(0),
        };
        self.groups.push(new_group(vec![frame]));

        let result = self.dispatch(id, entry.instrs.len());
        self.groups.clear();
        let locals = result?;
        debug!(steps = self.steps, "run finished");
        Ok(RunOutcome { locals })
    }

    fn dispatch(&mut self, root: ModuleId, entry_len: usize) -> RunResult<Vec<ObjectRef>> {
        loop {
            let (module_id, closure_id, ip) = self.with_frame(|f| (f.module, f.closure, f.ip))?;
            if module_id == root && closure_id == ClosureId::ENTRY && ip == entry_len {
                return self.with_frame(|f| f.locals.iter().map(|c| Rc::clone(&c.borrow())).collect());
            }
            self.tick()?;

            let module = self.module(module_id)?;
            let closure = module
                .closure(closure_id)
                .ok_or(RuntimeError::UnknownClosure)?;
            let instr = closure.instrs.get(ip).ok_or(RuntimeError::InvalidIp)?;
            self.with_frame_mut(|f| f.ip += 1)?;
            trace!(closure = %closure_id, ip, %instr, "dispatch");
            self.exec(instr)?;
        }
    }

    fn tick(&mut self) -> RunResult<()> {
        self.steps += 1;
        match self.step_limit {
            Some(limit) if self.steps > limit => Err(RuntimeError::StepLimit(limit)),
            _ => Ok(()),
        }
    }

    // ── Accessors ──

    /// Value bound to a global name, as left by the runs so far.
    pub fn global(&self, name: &str) -> Option<ObjectRef> {
        match self.natives.globals.primitive() {
            Primitive::Dict(entries) => entries.borrow().get(name).cloned(),
            _ => None,
        }
    }

    pub fn singletons(&self) -> &Singletons {
        &self.natives.singletons
    }

    pub fn output(&self) -> &SharedOutput {
        self.natives.output()
    }

    /// Render a value the way `repr1` does.
    pub fn repr(&self, value: &ObjectRef) -> String {
        repr(value, &self.natives.singletons)
    }

    fn module(&self, id: ModuleId) -> RunResult<Rc<Module>> {
        self.modules
            .get(id.index())
            .cloned()
            .ok_or(RuntimeError::UnknownModule)
    }

    // ── Frames and slots ──

    fn with_frame<R>(&self, f: impl FnOnce(&Frame) -> R) -> RunResult<R> {
        let group = self.groups.last().ok_or(RuntimeError::NoActiveFrame)?;
        let frames = group.borrow();
        let frame = frames.last().ok_or(RuntimeError::NoActiveFrame)?;
        Ok(f(frame))
    }

    fn with_frame_mut<R>(&self, f: impl FnOnce(&mut Frame) -> R) -> RunResult<R> {
        let group = self.groups.last().ok_or(RuntimeError::NoActiveFrame)?;
        let mut frames = group.borrow_mut();
        let frame = frames.last_mut().ok_or(RuntimeError::NoActiveFrame)?;
        Ok(f(frame))
    }

    fn cell(&self, slot: Slot) -> RunResult<Cell> {
        self.with_frame(|f| match slot.decode() {
            SlotRef::Local(index) => f.locals.get(index).cloned(),
            SlotRef::Capture(index) => f.captured.get(index).cloned(),
        })?
        .ok_or(RuntimeError::SlotOutOfRange(slot))
    }

    fn read(&self, slot: Slot) -> RunResult<ObjectRef> {
        let cell = self.cell(slot)?;
        let value = Rc::clone(&cell.borrow());
        Ok(value)
    }

    fn write(&self, slot: Slot, value: ObjectRef) -> RunResult<()> {
        *self.cell(slot)?.borrow_mut() = value;
        Ok(())
    }

    /// Push a frame onto the live group.
    fn push_frame(&mut self, frame: Frame) -> RunResult<()> {
        let group = self.groups.last().ok_or(RuntimeError::NoActiveFrame)?;
        let mut frames = group.borrow_mut();
        frames.push(frame);
        if frames.len() > self.max_frames {
            return Err(RuntimeError::FrameLimit(self.max_frames));
        }
        Ok(())
    }

    /// Pop the executing frame. An emptied group leaves the live stack.
    ///
    /// Returns the handler flag and destination of the frame now on top,
    /// or `None` when nothing is left.
    fn pop_frame(&mut self) -> Option<(bool, Slot)> {
        let emptied = {
            let mut frames = self.groups.last()?.borrow_mut();
            frames.pop();
            frames.is_empty()
        };
        if emptied {
            self.groups.pop();
        }
        self.groups
            .last()?
            .borrow()
            .last()
            .map(|f| (f.is_handler, f.dest))
    }
}
