//! HIR: the linear instruction set executed by the interpreter.
//!
//! A [`Module`] is a list of [`Closure`]s; closure 0 is the module entry.
//! Each closure is a flat instruction vector addressed by index. Jump
//! targets are instruction indices within the same closure.

mod dump;

use smallvec::SmallVec;

use crate::Intrinsic;

// ── Slots ───────────────────────────────────────────────────────────

/// A storage location in the running frame.
///
/// Non-negative values address the local cell pool. Negative values
/// address the capture pool, with capture `k` encoded as `!k` (`-1 - k`)
/// so that capture 0 and local 0 stay distinct.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Slot(i32);

/// A decoded [`Slot`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SlotRef {
    Local(usize),
    Capture(usize),
}

impl Slot {
    #[inline]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn local(index: usize) -> Slot {
        Slot(index as i32)
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn capture(index: usize) -> Slot {
        Slot(!(index as i32))
    }

    #[inline]
    pub const fn from_raw(raw: i32) -> Slot {
        Slot(raw)
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    #[allow(clippy::cast_sign_loss)]
    pub const fn decode(self) -> SlotRef {
        if self.0 >= 0 {
            SlotRef::Local(self.0 as usize)
        } else {
            SlotRef::Capture(!self.0 as usize)
        }
    }
}

// ── Closures and modules ────────────────────────────────────────────

/// Index of a closure within its module.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ClosureId(u32);

impl ClosureId {
    /// The module entry.
    pub const ENTRY: ClosureId = ClosureId(0);

    #[inline]
    pub const fn new(index: u32) -> Self {
        ClosureId(index)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Constant operand of [`Instr::Imm`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Immediate {
    Int(i64),
    Bool(bool),
    Str(String),
    None,
    Ellipsis,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Instr {
    Imm {
        dest: Slot,
        value: Immediate,
    },
    Move {
        dest: Slot,
        src: Slot,
    },
    /// Build a closure object over the cells named by `captures` (in the
    /// callee's capture order) and the default tuple in `defaults`.
    Closure {
        dest: Slot,
        closure: ClosureId,
        captures: Vec<Slot>,
        defaults: Slot,
    },
    Intrinsic {
        dest: Slot,
        intrinsic: Intrinsic,
        args: SmallVec<[Slot; 4]>,
    },
    /// Continue at `target` when `cond` holds the `False` singleton.
    JumpIfFalse {
        cond: Slot,
        target: usize,
    },
    Return {
        value: Slot,
    },
    Raise {
        value: Slot,
    },
    /// Install a handler resuming at `target` with the raised value in `dest`.
    PushExcept {
        dest: Slot,
        target: usize,
    },
    PopExcept,
    Yield {
        value: Slot,
    },
}

/// One compiled function, class body, or module entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Closure {
    /// Size of the local cell pool a frame of this closure needs.
    pub local_size: usize,
    /// Set when the body contains `yield`; calling it creates a generator.
    pub is_generator: bool,
    pub instrs: Vec<Instr>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Module {
    pub closures: Vec<Closure>,
}

impl Module {
    pub fn entry(&self) -> Option<&Closure> {
        self.closures.first()
    }

    pub fn closure(&self, id: ClosureId) -> Option<&Closure> {
        self.closures.get(id.index())
    }
}

#[cfg(test)]
mod tests;
