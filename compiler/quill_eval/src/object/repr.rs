//! Value dump used by `repr1` and error reports.

use std::fmt::Write;
use std::rc::Rc;

use quill_ir::quote;

use super::{ObjectRef, Primitive, Singletons};

/// Nesting beyond this renders as `...`; tuples can contain themselves.
const MAX_DEPTH: usize = 32;

pub fn repr(obj: &ObjectRef, singletons: &Singletons) -> String {
    let mut out = String::new();
    write_repr(&mut out, obj, singletons, 0);
    out
}

fn write_repr(out: &mut String, obj: &ObjectRef, singletons: &Singletons, depth: usize) {
    if depth > MAX_DEPTH {
        out.push_str("...");
        return;
    }
    match obj.primitive() {
        Primitive::Bool(true) => out.push_str("True"),
        Primitive::Bool(false) => out.push_str("False"),
        Primitive::Int(v) => {
            let _ = write!(out, "{v}");
        }
        Primitive::Str(s) => out.push_str(&quote(s)),
        Primitive::Tuple(items) => {
            let items = items.borrow();
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_repr(out, item, singletons, depth + 1);
            }
            if items.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
        Primitive::Dict(entries) => {
            out.push('{');
            for (i, (key, value)) in entries.borrow().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&quote(key));
                out.push_str(": ");
                write_repr(out, value, singletons, depth + 1);
            }
            out.push('}');
        }
        Primitive::Closure(closure) => {
            let _ = write!(out, "<function {}>", closure.closure);
        }
        Primitive::Generator(_) => out.push_str("<generator>"),
        Primitive::Object { ty, .. } => {
            if Rc::ptr_eq(obj, &singletons.none) {
                out.push_str("None");
            } else if Rc::ptr_eq(obj, &singletons.ellipsis) {
                out.push_str("Ellipsis");
            } else {
                match ty.as_ref().and_then(type_name) {
                    Some(name) => {
                        let _ = write!(out, "<{name} object>");
                    }
                    None => out.push_str("<object>"),
                }
            }
        }
        Primitive::Uninit => out.push_str("<uninitialized>"),
    }
}

/// `__name__` attribute of a type object, when it is a string.
fn type_name(ty: &ObjectRef) -> Option<String> {
    ty.attrs()
        .borrow()
        .get("__name__")
        .and_then(|name| name.as_str().map(str::to_owned))
}

/// One-line description of a raised value: `Name(args...)` for instances
/// of a named type, otherwise its dump.
pub fn describe_exception(value: &ObjectRef, singletons: &Singletons) -> String {
    if let Primitive::Object { ty: Some(ty), .. } = value.primitive() {
        if let Some(name) = type_name(ty) {
            let args = value.attrs().borrow().get("args").cloned();
            return match args {
                Some(args) => format!("{name}{}", repr(&args, singletons)),
                None => format!("{name}()"),
            };
        }
    }
    repr(value, singletons)
}
