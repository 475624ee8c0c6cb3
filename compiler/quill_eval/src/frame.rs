//! Activation records.
//!
//! A [`FrameGroup`] is a stack of frames that runs as a unit: the root
//! group of a run, or the body of one generator. The interpreter keeps a
//! stack of live groups; the frame on top of the top group is the one
//! executing. Suspending a generator moves its group off the live stack
//! intact, so resuming it needs no bookkeeping beyond pushing it back.
//!
//! Handler frames installed by `PushExcept` sit directly beneath the frame
//! that installed them. They share that frame's cell pools and resume it at
//! the handler's target.

use std::cell::RefCell;
use std::rc::Rc;

use quill_ir::hir::{ClosureId, Slot};

use crate::interpreter::ModuleId;
use crate::object::{CellPool, ObjectRef};

pub type FrameGroup = Rc<RefCell<Vec<Frame>>>;

pub(crate) fn new_group(frames: Vec<Frame>) -> FrameGroup {
    Rc::new(RefCell::new(frames))
}

#[derive(Clone)]
pub struct Frame {
    pub(crate) module: ModuleId,
    pub(crate) closure: ClosureId,
    /// Index of the next instruction.
    pub(crate) ip: usize,
    pub(crate) locals: CellPool,
    pub(crate) captured: CellPool,
    pub(crate) args: ObjectRef,
    pub(crate) defaults: ObjectRef,
    /// Set on frames pushed by `PushExcept`. `Return` skips them and
    /// `Raise` stops at them.
    pub(crate) is_handler: bool,
    /// Where the value delivered to this frame goes: the call result,
    /// the yielded value, or the caught exception.
    pub(crate) dest: Slot,
}

impl Frame {
    /// Copy of this frame resuming at `target` as an exception handler.
    pub(crate) fn handler(&self, dest: Slot, target: usize) -> Frame {
        Frame {
            ip: target,
            is_handler: true,
            dest,
            ..self.clone()
        }
    }
}
