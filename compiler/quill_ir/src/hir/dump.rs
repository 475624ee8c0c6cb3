//! Textual rendering of HIR, one instruction per line.
//!
//! ```text
//! entry #0 (locals: 2):
//!      0: %0 = imm 1
//!      1: %1 = get_global0
//! ```

use std::fmt;

use super::{Closure, ClosureId, Immediate, Instr, Module, Slot};
use crate::quote;

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

impl fmt::Display for ClosureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Immediate::Int(v) => write!(f, "{v}"),
            Immediate::Bool(true) => f.write_str("True"),
            Immediate::Bool(false) => f.write_str("False"),
            Immediate::Str(s) => f.write_str(&quote(s)),
            Immediate::None => f.write_str("None"),
            Immediate::Ellipsis => f.write_str("..."),
        }
    }
}

fn write_slots(f: &mut fmt::Formatter<'_>, slots: &[Slot]) -> fmt::Result {
    for (i, slot) in slots.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{slot}")?;
    }
    Ok(())
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Imm { dest, value } => write!(f, "{dest} = imm {value}"),
            Instr::Move { dest, src } => write!(f, "{dest} = move {src}"),
            Instr::Closure {
                dest,
                closure,
                captures,
                defaults,
            } => {
                write!(f, "{dest} = closure {closure} [")?;
                write_slots(f, captures)?;
                write!(f, "] defaults {defaults}")
            }
            Instr::Intrinsic {
                dest,
                intrinsic,
                args,
            } => {
                write!(f, "{dest} = {intrinsic}")?;
                if !args.is_empty() {
                    f.write_str(" ")?;
                    write_slots(f, args)?;
                }
                Ok(())
            }
            Instr::JumpIfFalse { cond, target } => write!(f, "jf {cond} -> {target}"),
            Instr::Return { value } => write!(f, "return {value}"),
            Instr::Raise { value } => write!(f, "raise {value}"),
            Instr::PushExcept { dest, target } => write!(f, "{dest} = push_except -> {target}"),
            Instr::PopExcept => f.write_str("pop_except"),
            Instr::Yield { value } => write!(f, "yield {value}"),
        }
    }
}

impl Closure {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ip, instr) in self.instrs.iter().enumerate() {
            writeln!(f, "{ip:>6}: {instr}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "closure (locals: {}", self.local_size)?;
        if self.is_generator {
            f.write_str(", generator")?;
        }
        writeln!(f, "):")?;
        self.fmt_body(f)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, closure) in self.closures.iter().enumerate() {
            let label = if index == 0 { "entry" } else { "closure" };
            let id = ClosureId::new(u32::try_from(index).unwrap_or(u32::MAX));
            write!(f, "{label} {id} (locals: {}", closure.local_size)?;
            if closure.is_generator {
                f.write_str(", generator")?;
            }
            writeln!(f, "):")?;
            closure.fmt_body(f)?;
        }
        Ok(())
    }
}
