//! Runtime objects.
//!
//! Every value is an [`ObjectRef`]: a shared pointer to an [`Object`] made
//! of a primitive payload and an attribute table. Identity (`is`) is pointer
//! identity. Booleans, `None`, `...` and the uninitialized value are
//! singletons owned by [`Singletons`]; integers and strings are allocated
//! fresh every time they are produced.
//!
//! Slots do not hold objects directly. Each slot is a [`Cell`], and a
//! frame's locals and captures are pools of cells, so that a closure
//! capturing a variable aliases the very cell its defining frame writes.

mod repr;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use quill_ir::hir::ClosureId;
use rustc_hash::FxBuildHasher;

use crate::frame::FrameGroup;
use crate::interpreter::ModuleId;

pub use repr::{describe_exception, repr};

pub type ObjectRef = Rc<Object>;

/// String-keyed table in insertion order, used for dictionaries, attribute
/// tables and the global namespace.
pub type Dict = IndexMap<String, ObjectRef, FxBuildHasher>;

/// A mutable slot holding an object reference.
pub type Cell = Rc<RefCell<ObjectRef>>;

/// A frame's locals or a closure's captures.
pub type CellPool = Rc<Vec<Cell>>;

pub fn new_cell(value: ObjectRef) -> Cell {
    Rc::new(RefCell::new(value))
}

/// A pool of `size` cells, each holding `fill`.
pub fn new_pool(size: usize, fill: &ObjectRef) -> CellPool {
    Rc::new((0..size).map(|_| new_cell(Rc::clone(fill))).collect())
}

pub struct Object {
    primitive: Primitive,
    attrs: RefCell<Dict>,
}

pub enum Primitive {
    Bool(bool),
    Int(i64),
    Str(String),
    /// Tuples are mutable in place only through `tuple_splice4`.
    Tuple(RefCell<Vec<ObjectRef>>),
    Dict(RefCell<Dict>),
    Closure(ClosureValue),
    Generator(FrameGroup),
    /// A user object. `base` is the object attribute lookup falls back to;
    /// `ty` is what `obj_get_type1` reports.
    Object {
        base: Option<ObjectRef>,
        ty: Option<ObjectRef>,
    },
    Uninit,
}

/// A function value: code plus the cells and defaults it closed over.
pub struct ClosureValue {
    pub module: ModuleId,
    pub closure: ClosureId,
    pub captured: CellPool,
    pub defaults: ObjectRef,
}

impl Object {
    pub fn new(primitive: Primitive) -> ObjectRef {
        Object::with_attrs(primitive, Dict::default())
    }

    pub fn with_attrs(primitive: Primitive, attrs: Dict) -> ObjectRef {
        Rc::new(Object {
            primitive,
            attrs: RefCell::new(attrs),
        })
    }

    pub fn int(value: i64) -> ObjectRef {
        Object::new(Primitive::Int(value))
    }

    pub fn str(value: impl Into<String>) -> ObjectRef {
        Object::new(Primitive::Str(value.into()))
    }

    pub fn tuple(items: Vec<ObjectRef>) -> ObjectRef {
        Object::new(Primitive::Tuple(RefCell::new(items)))
    }

    pub fn dict(entries: Dict) -> ObjectRef {
        Object::new(Primitive::Dict(RefCell::new(entries)))
    }

    #[inline]
    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    #[inline]
    pub fn attrs(&self) -> &RefCell<Dict> {
        &self.attrs
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.primitive {
            Primitive::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.primitive {
            Primitive::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Copy of the elements when this is a tuple.
    pub fn tuple_items(&self) -> Option<Vec<ObjectRef>> {
        match &self.primitive {
            Primitive::Tuple(items) => Some(items.borrow().clone()),
            _ => None,
        }
    }

    pub fn is_uninit(&self) -> bool {
        matches!(self.primitive, Primitive::Uninit)
    }

    /// Name of the payload kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        self.primitive.kind_name()
    }
}

impl Primitive {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Primitive::Bool(_) => "bool",
            Primitive::Int(_) => "int",
            Primitive::Str(_) => "str",
            Primitive::Tuple(_) => "tuple",
            Primitive::Dict(_) => "dict",
            Primitive::Closure(_) => "function",
            Primitive::Generator(_) => "generator",
            Primitive::Object { .. } => "object",
            Primitive::Uninit => "uninitialized",
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.primitive {
            Primitive::Bool(b) => write!(f, "Bool({b})"),
            Primitive::Int(v) => write!(f, "Int({v})"),
            Primitive::Str(s) => write!(f, "Str({s:?})"),
            Primitive::Tuple(items) => write!(f, "Tuple(len {})", items.borrow().len()),
            Primitive::Dict(entries) => write!(f, "Dict(len {})", entries.borrow().len()),
            Primitive::Closure(c) => write!(f, "Closure({} {})", c.module, c.closure),
            Primitive::Generator(_) => f.write_str("Generator"),
            Primitive::Object { .. } => write!(f, "Object({:p})", self),
            Primitive::Uninit => f.write_str("Uninit"),
        }
    }
}

/// Objects every run shares. Comparisons against them are by identity.
pub struct Singletons {
    pub true_obj: ObjectRef,
    pub false_obj: ObjectRef,
    pub none: ObjectRef,
    pub ellipsis: ObjectRef,
    pub uninit: ObjectRef,
}

impl Singletons {
    pub fn new() -> Self {
        let plain = || {
            Object::new(Primitive::Object {
                base: None,
                ty: None,
            })
        };
        Singletons {
            true_obj: Object::new(Primitive::Bool(true)),
            false_obj: Object::new(Primitive::Bool(false)),
            none: plain(),
            ellipsis: plain(),
            uninit: Object::new(Primitive::Uninit),
        }
    }

    #[inline]
    pub fn bool(&self, value: bool) -> ObjectRef {
        if value {
            Rc::clone(&self.true_obj)
        } else {
            Rc::clone(&self.false_obj)
        }
    }

    #[inline]
    pub fn is_none(&self, obj: &ObjectRef) -> bool {
        Rc::ptr_eq(obj, &self.none)
    }

    #[inline]
    pub fn is_false(&self, obj: &ObjectRef) -> bool {
        Rc::ptr_eq(obj, &self.false_obj)
    }
}

impl Default for Singletons {
    fn default() -> Self {
        Self::new()
    }
}
