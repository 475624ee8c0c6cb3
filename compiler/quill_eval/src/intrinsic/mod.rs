//! Native intrinsics.
//!
//! [`Natives`] owns everything the native half of the catalog touches: the
//! singletons, the global dictionary and the I/O handlers. The virtual
//! intrinsics (`v_*`) need frame state and are executed by the interpreter;
//! reaching them here is an error.
//!
//! Every failure is an [`IntrinsicError`]. The interpreter turns it into a
//! fatal [`RuntimeError`](crate::RuntimeError); programs cannot catch it.

mod seq;

use std::cell::RefCell;
use std::rc::Rc;

use quill_ir::{arith, Arity, Intrinsic};

use crate::frame::FrameGroup;
use crate::io::{InputHandler, SharedOutput};
use crate::object::{repr, Dict, Object, ObjectRef, Primitive, Singletons};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IntrinsicError {
    #[error("argument {position} must be {expected}, found {found}")]
    WrongType {
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("expected {expected} argument(s), got {found}")]
    Arity { expected: usize, found: usize },
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("range {start}..{end} is invalid for length {len}")]
    InvalidRange { start: i64, end: i64, len: usize },
    #[error("integer overflow")]
    Overflow,
    #[error("division by zero")]
    DivisionByZero,
    #[error("slice step is zero")]
    ZeroStep,
    #[error("expected a string of length 1, got length {0}")]
    NotSingleChar(usize),
    #[error("invalid integer literal {0:?}")]
    InvalidInt(String),
    #[error("global `{0}` is not defined")]
    MissingGlobal(&'static str),
    #[error("uninitialized value")]
    Uninitialized,
    #[error("virtual intrinsic outside the interpreter")]
    Virtual,
    #[error("stream failure: {0}")]
    Stream(String),
    #[error("end of input")]
    EndOfInput,
}

type NativeResult<T> = Result<T, IntrinsicError>;

pub(crate) fn wrong_type(args: &[ObjectRef], index: usize, expected: &'static str) -> IntrinsicError {
    IntrinsicError::WrongType {
        position: index + 1,
        expected,
        found: args[index].kind_name(),
    }
}

fn int_arg(args: &[ObjectRef], index: usize) -> NativeResult<i64> {
    args[index]
        .as_int()
        .ok_or_else(|| wrong_type(args, index, "int"))
}

fn str_arg(args: &[ObjectRef], index: usize) -> NativeResult<&str> {
    args[index]
        .as_str()
        .ok_or_else(|| wrong_type(args, index, "str"))
}

fn tuple_arg(args: &[ObjectRef], index: usize) -> NativeResult<&RefCell<Vec<ObjectRef>>> {
    match args[index].primitive() {
        Primitive::Tuple(items) => Ok(items),
        _ => Err(wrong_type(args, index, "tuple")),
    }
}

fn dict_arg(args: &[ObjectRef], index: usize) -> NativeResult<&RefCell<Dict>> {
    match args[index].primitive() {
        Primitive::Dict(entries) => Ok(entries),
        _ => Err(wrong_type(args, index, "dict")),
    }
}

fn generator_arg(args: &[ObjectRef], index: usize) -> NativeResult<&FrameGroup> {
    match args[index].primitive() {
        Primitive::Generator(group) => Ok(group),
        _ => Err(wrong_type(args, index, "generator")),
    }
}

fn len_to_int(len: usize) -> ObjectRef {
    Object::int(i64::try_from(len).unwrap_or(i64::MAX))
}

pub(crate) struct Natives {
    pub(crate) singletons: Singletons,
    pub(crate) globals: ObjectRef,
    output: SharedOutput,
    input: InputHandler,
}

impl Natives {
    pub(crate) fn new(output: SharedOutput, input: InputHandler) -> Self {
        Natives {
            singletons: Singletons::new(),
            globals: Object::dict(Dict::default()),
            output,
            input,
        }
    }

    pub(crate) fn output(&self) -> &SharedOutput {
        &self.output
    }

    /// Integer argument, or `None` when the argument is the `None` object.
    fn opt_int_arg(&self, args: &[ObjectRef], index: usize) -> NativeResult<Option<i64>> {
        if self.singletons.is_none(&args[index]) {
            Ok(None)
        } else {
            int_arg(args, index).map(Some)
        }
    }

    fn global(&self, name: &'static str) -> NativeResult<ObjectRef> {
        match self.globals.primitive() {
            Primitive::Dict(entries) => entries
                .borrow()
                .get(name)
                .cloned()
                .ok_or(IntrinsicError::MissingGlobal(name)),
            _ => Err(IntrinsicError::MissingGlobal(name)),
        }
    }

    pub(crate) fn call(&mut self, intrinsic: Intrinsic, args: &[ObjectRef]) -> NativeResult<ObjectRef> {
        if let Arity::Fixed(expected) = intrinsic.arity() {
            if expected != args.len() {
                return Err(IntrinsicError::Arity {
                    expected,
                    found: args.len(),
                });
            }
        }
        let s = &self.singletons;
        let value = match intrinsic {
            Intrinsic::Call
            | Intrinsic::Args
            | Intrinsic::Defaults
            | Intrinsic::GenNext
            | Intrinsic::Del => return Err(IntrinsicError::Virtual),

            // ── Core ──
            Intrinsic::GenStopped => s.bool(generator_arg(args, 0)?.borrow().is_empty()),
            Intrinsic::GetGlobal => Rc::clone(&self.globals),
            Intrinsic::Is => s.bool(Rc::ptr_eq(&args[0], &args[1])),
            Intrinsic::Id => {
                let address = Rc::as_ptr(&args[0]) as usize;
                Object::int(i64::try_from(address).unwrap_or(i64::MAX))
            }
            Intrinsic::Not => s.bool(s.is_false(&args[0])),
            Intrinsic::Repr => Object::str(repr(&args[0], s)),

            // ── Attributes and objects ──
            Intrinsic::GetAttr => {
                let name = str_arg(args, 1)?;
                let found = args[0].attrs().borrow().get(name).cloned();
                found.unwrap_or_else(|| Rc::clone(&args[2]))
            }
            Intrinsic::SetAttr => {
                let name = str_arg(args, 1)?.to_owned();
                args[0]
                    .attrs()
                    .borrow_mut()
                    .insert(name, Rc::clone(&args[2]));
                Rc::clone(&s.none)
            }
            Intrinsic::DelAttr => {
                let name = str_arg(args, 1)?;
                let removed = args[0].attrs().borrow_mut().shift_remove(name);
                s.bool(removed.is_some())
            }
            Intrinsic::ObjNew => {
                let base = (!s.is_none(&args[0])).then(|| Rc::clone(&args[0]));
                let ty = (!s.is_none(&args[1])).then(|| Rc::clone(&args[1]));
                let attrs = dict_arg(args, 2)?.borrow().clone();
                Object::with_attrs(Primitive::Object { base, ty }, attrs)
            }
            Intrinsic::ObjGetBase => self.base_of(&args[0])?,
            Intrinsic::ObjGetType => self.type_of(&args[0])?,

            // ── Tuples ──
            Intrinsic::TupleMake => Object::tuple(args.to_vec()),
            Intrinsic::TupleLen => len_to_int(tuple_arg(args, 0)?.borrow().len()),
            Intrinsic::TupleIdx => {
                let items = tuple_arg(args, 0)?.borrow();
                let index = int_arg(args, 1)?;
                let found = usize::try_from(index).ok().and_then(|i| items.get(i)).cloned();
                found.ok_or(IntrinsicError::IndexOutOfRange {
                    index,
                    len: items.len(),
                })?
            }
            Intrinsic::TupleConcat => {
                let mut items = tuple_arg(args, 0)?.borrow().clone();
                items.extend(tuple_arg(args, 1)?.borrow().iter().cloned());
                Object::tuple(items)
            }
            Intrinsic::TupleSplice => {
                let start = int_arg(args, 1)?;
                let end = int_arg(args, 2)?;
                let replacement = tuple_arg(args, 3)?.borrow().clone();
                let target = tuple_arg(args, 0)?;
                seq::splice(&mut *target.borrow_mut(), start, end, replacement)?;
                Rc::clone(&args[0])
            }
            Intrinsic::TupleSlice => {
                let items = tuple_arg(args, 0)?.borrow();
                let indices = seq::slice_indices(
                    items.len(),
                    self.opt_int_arg(args, 1)?,
                    self.opt_int_arg(args, 2)?,
                    self.opt_int_arg(args, 3)?,
                )?;
                let picked = indices.into_iter().map(|i| Rc::clone(&items[i])).collect();
                Object::tuple(picked)
            }

            // ── Integers ──
            Intrinsic::IntAdd => int_op(args, arith::add)?,
            Intrinsic::IntSub => int_op(args, arith::sub)?,
            Intrinsic::IntMul => int_op(args, arith::mul)?,
            Intrinsic::IntDiv => int_div_op(args, arith::floor_div)?,
            Intrinsic::IntMod => int_div_op(args, arith::floor_mod)?,
            Intrinsic::IntLt => s.bool(int_arg(args, 0)? < int_arg(args, 1)?),
            Intrinsic::IntEq => s.bool(int_arg(args, 0)? == int_arg(args, 1)?),
            Intrinsic::IntToStr => Object::str(int_arg(args, 0)?.to_string()),

            // ── Strings ──
            Intrinsic::StrLen => len_to_int(str_arg(args, 0)?.chars().count()),
            Intrinsic::StrFind => Object::int(seq::find(
                str_arg(args, 0)?,
                str_arg(args, 1)?,
                int_arg(args, 2)?,
                int_arg(args, 3)?,
            )),
            Intrinsic::StrSlice => {
                let chars: Vec<char> = str_arg(args, 0)?.chars().collect();
                let indices = seq::slice_indices(
                    chars.len(),
                    self.opt_int_arg(args, 1)?,
                    self.opt_int_arg(args, 2)?,
                    self.opt_int_arg(args, 3)?,
                )?;
                Object::str(indices.into_iter().map(|i| chars[i]).collect::<String>())
            }
            Intrinsic::StrToOrd => {
                let text = str_arg(args, 0)?;
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Object::int(i64::from(u32::from(c))),
                    _ => return Err(IntrinsicError::NotSingleChar(text.chars().count())),
                }
            }
            Intrinsic::StrToInt => {
                let text = str_arg(args, 0)?;
                let value = text
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| IntrinsicError::InvalidInt(text.to_owned()))?;
                Object::int(value)
            }
            Intrinsic::StrConcat => {
                let mut joined = str_arg(args, 0)?.to_owned();
                joined.push_str(str_arg(args, 1)?);
                Object::str(joined)
            }
            Intrinsic::StrEq => s.bool(str_arg(args, 0)? == str_arg(args, 1)?),
            Intrinsic::StrLt => s.bool(str_arg(args, 0)? < str_arg(args, 1)?),

            // ── Dictionaries ──
            Intrinsic::DictNew => Object::dict(Dict::default()),
            Intrinsic::DictLen => len_to_int(dict_arg(args, 0)?.borrow().len()),
            Intrinsic::DictGet => {
                let key = str_arg(args, 1)?;
                let found = dict_arg(args, 0)?.borrow().get(key).cloned();
                found.unwrap_or_else(|| Rc::clone(&args[2]))
            }
            Intrinsic::DictSet => {
                let key = str_arg(args, 1)?.to_owned();
                dict_arg(args, 0)?
                    .borrow_mut()
                    .insert(key, Rc::clone(&args[2]));
                Rc::clone(&s.none)
            }
            Intrinsic::DictDel => {
                let key = str_arg(args, 1)?;
                dict_arg(args, 0)?.borrow_mut().shift_remove(key);
                Rc::clone(&s.none)
            }
            Intrinsic::DictToTuple => {
                let pairs = dict_arg(args, 0)?
                    .borrow()
                    .iter()
                    .map(|(key, value)| Object::tuple(vec![Object::str(key.clone()), Rc::clone(value)]))
                    .collect();
                Object::tuple(pairs)
            }

            // ── I/O ──
            Intrinsic::Print => {
                let text = str_arg(args, 0)?;
                self.output
                    .write(text)
                    .map_err(|e| IntrinsicError::Stream(e.to_string()))?;
                Rc::clone(&s.none)
            }
            Intrinsic::Flush => {
                self.output
                    .flush()
                    .map_err(|e| IntrinsicError::Stream(e.to_string()))?;
                Rc::clone(&s.none)
            }
            Intrinsic::Input => {
                let line = self
                    .input
                    .read_line()
                    .map_err(|e| IntrinsicError::Stream(e.to_string()))?
                    .ok_or(IntrinsicError::EndOfInput)?;
                Object::str(line)
            }
        };
        Ok(value)
    }

    /// `obj_get_base1`: the recorded base of a user object, `type` for
    /// other primitives, `None` for the singletons.
    fn base_of(&self, obj: &ObjectRef) -> NativeResult<ObjectRef> {
        let s = &self.singletons;
        match obj.primitive() {
            _ if s.is_none(obj) || Rc::ptr_eq(obj, &s.ellipsis) => Ok(Rc::clone(&s.none)),
            Primitive::Bool(_) => Ok(Rc::clone(&s.none)),
            Primitive::Object { base, .. } => Ok(base.clone().unwrap_or_else(|| Rc::clone(&s.none))),
            Primitive::Uninit => Err(IntrinsicError::Uninitialized),
            Primitive::Int(_)
            | Primitive::Str(_)
            | Primitive::Tuple(_)
            | Primitive::Dict(_)
            | Primitive::Closure(_)
            | Primitive::Generator(_) => self.global("type"),
        }
    }

    /// `obj_get_type1`: primitives map to the global of their kind's name,
    /// user objects to their recorded type or `None`.
    fn type_of(&self, obj: &ObjectRef) -> NativeResult<ObjectRef> {
        let s = &self.singletons;
        if s.is_none(obj) {
            return self.global("NoneType");
        }
        if Rc::ptr_eq(obj, &s.ellipsis) {
            return self.global("ellipsis");
        }
        match obj.primitive() {
            Primitive::Bool(_) => self.global("bool"),
            Primitive::Int(_) => self.global("int"),
            Primitive::Str(_) => self.global("str"),
            Primitive::Tuple(_) => self.global("tuple"),
            Primitive::Dict(_) => self.global("dict"),
            Primitive::Closure(_) => self.global("function"),
            Primitive::Generator(_) => self.global("generator"),
            Primitive::Object { ty, .. } => Ok(ty.clone().unwrap_or_else(|| Rc::clone(&s.none))),
            Primitive::Uninit => Err(IntrinsicError::Uninitialized),
        }
    }
}

fn int_op(args: &[ObjectRef], op: fn(i64, i64) -> Option<i64>) -> NativeResult<ObjectRef> {
    let value = op(int_arg(args, 0)?, int_arg(args, 1)?).ok_or(IntrinsicError::Overflow)?;
    Ok(Object::int(value))
}

fn int_div_op(args: &[ObjectRef], op: fn(i64, i64) -> Option<i64>) -> NativeResult<ObjectRef> {
    let divisor = int_arg(args, 1)?;
    if divisor == 0 {
        return Err(IntrinsicError::DivisionByZero);
    }
    let value = op(int_arg(args, 0)?, divisor).ok_or(IntrinsicError::Overflow)?;
    Ok(Object::int(value))
}

#[cfg(test)]
mod tests;
