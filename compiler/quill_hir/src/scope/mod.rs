//! Name resolution for HIR generation.
//!
//! Every closure being generated (module entry, function, class body) has a
//! [`Scope`]; the scopes of the closures currently open form a
//! [`ScopeStack`], and a scope's parent is the entry beneath it.
//!
//! A name resolves to a local slot, a capture index, or the global
//! dictionary. Lookups are memoized per scope: the first time a name that is
//! not bound locally is looked up, the parent chain decides. A parent
//! answer of "global" is remembered as global; anything else becomes a new
//! capture of this scope, numbered in order of first reference.
//!
//! The module scope never binds locals, so every module-level name is a
//! global. Class scopes hide their own locals from nested functions (methods
//! see globals instead), but still forward captures from enclosing
//! functions.

use indexmap::IndexMap;
use quill_ir::hir::Slot;
use rustc_hash::FxBuildHasher;

type NameMap<V> = IndexMap<String, V, FxBuildHasher>;

/// How a name is stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NameKind {
    Local(usize),
    Capture(usize),
    Global,
}

impl NameKind {
    /// Frame slot for locals and captures; globals live in the dictionary.
    pub fn slot(self) -> Option<Slot> {
        match self {
            NameKind::Local(index) => Some(Slot::local(index)),
            NameKind::Capture(index) => Some(Slot::capture(index)),
            NameKind::Global => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Class,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("name `{0}` is used before its global declaration")]
    UseBeforeGlobal(String),
    #[error("name `{0}` is used before its nonlocal declaration")]
    UseBeforeNonlocal(String),
    #[error("nonlocal name `{0}` cannot be declared global")]
    NonlocalDeclaredGlobal(String),
    #[error("global name `{0}` cannot be declared nonlocal")]
    GlobalDeclaredNonlocal(String),
    #[error("no binding for nonlocal `{0}` in an enclosing function")]
    NonlocalNotFound(String),
}

/// Bindings of one closure under generation.
#[derive(Debug)]
pub struct Scope {
    kind: ScopeKind,
    names: NameMap<NameKind>,
    captured: Vec<String>,
    /// Occupancy of local slots; the first free entry is reused.
    allocated: Vec<bool>,
}

impl Scope {
    pub fn new(kind: ScopeKind) -> Self {
        Scope {
            kind,
            names: NameMap::default(),
            captured: Vec::new(),
            allocated: Vec::new(),
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    // Slot allocation

    /// Allocate the lowest free local slot.
    pub fn new_local(&mut self) -> usize {
        if let Some(index) = self.allocated.iter().position(|used| !used) {
            self.allocated[index] = true;
            index
        } else {
            self.allocated.push(true);
            self.allocated.len() - 1
        }
    }

    /// Return `index` to the free pool.
    pub fn del_local(&mut self, index: usize) {
        if let Some(used) = self.allocated.get_mut(index) {
            *used = false;
        }
    }

    /// Number of local slots a frame of this closure needs.
    pub fn local_size(&self) -> usize {
        self.allocated.len()
    }

    // Bindings

    /// Bind `name` to a fresh local slot unless it is already bound.
    pub fn mark_local(&mut self, name: &str) {
        if !self.names.contains_key(name) {
            let index = self.new_local();
            self.names.insert(name.to_owned(), NameKind::Local(index));
        }
    }

    pub fn mark_global(&mut self, name: &str) -> Result<(), ScopeError> {
        match self.names.get(name) {
            None => {
                self.names.insert(name.to_owned(), NameKind::Global);
                Ok(())
            }
            Some(NameKind::Global) => Ok(()),
            Some(NameKind::Local(_)) => Err(ScopeError::UseBeforeGlobal(name.to_owned())),
            Some(NameKind::Capture(_)) => Err(ScopeError::NonlocalDeclaredGlobal(name.to_owned())),
        }
    }

    fn new_capture(&mut self, name: &str) -> usize {
        let index = self.captured.len();
        self.captured.push(name.to_owned());
        self.names.insert(name.to_owned(), NameKind::Capture(index));
        index
    }

    /// Named locals with their slots, in declaration order.
    pub fn locals(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.names.iter().filter_map(|(name, kind)| match kind {
            NameKind::Local(index) => Some((name.as_str(), *index)),
            NameKind::Capture(_) | NameKind::Global => None,
        })
    }

    /// Captured names, indexed by capture number.
    pub fn captured(&self) -> &[String] {
        &self.captured
    }
}

/// The scopes of every closure currently being generated; the bottom entry
/// is the module scope and is never popped.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![Scope::new(ScopeKind::Module)],
        }
    }

    pub fn push(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope::new(kind));
    }

    /// Pop the innermost scope. The module scope stays.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.scopes.len() > 1 {
            self.scopes.pop()
        } else {
            None
        }
    }

    #[inline]
    pub fn current(&self) -> &Scope {
        &self.scopes[self.scopes.len() - 1]
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut Scope {
        let top = self.scopes.len() - 1;
        &mut self.scopes[top]
    }

    /// Resolve `name` in the innermost scope.
    pub fn get(&mut self, name: &str) -> NameKind {
        let kind = self.resolve_at(self.scopes.len() - 1, name, false);
        tracing::trace!(name, ?kind, "resolved");
        kind
    }

    pub fn mark_local(&mut self, name: &str) {
        self.current_mut().mark_local(name);
    }

    pub fn mark_global(&mut self, name: &str) -> Result<(), ScopeError> {
        self.current_mut().mark_global(name)
    }

    pub fn mark_nonlocal(&mut self, name: &str) -> Result<(), ScopeError> {
        let top = self.scopes.len() - 1;
        match self.scopes[top].names.get(name) {
            Some(NameKind::Capture(_)) => return Ok(()),
            Some(NameKind::Global) => {
                return Err(ScopeError::GlobalDeclaredNonlocal(name.to_owned()))
            }
            Some(NameKind::Local(_)) => {
                return Err(ScopeError::UseBeforeNonlocal(name.to_owned()))
            }
            None => {}
        }
        if top == 0 || self.resolve_at(top - 1, name, true) == NameKind::Global {
            return Err(ScopeError::NonlocalNotFound(name.to_owned()));
        }
        self.scopes[top].new_capture(name);
        Ok(())
    }

    /// Resolve `name` in the scope at `depth`, registering captures along
    /// the way. `for_child` is set when a nested closure is asking.
    fn resolve_at(&mut self, depth: usize, name: &str, for_child: bool) -> NameKind {
        let scope = &self.scopes[depth];
        match scope.names.get(name) {
            Some(NameKind::Local(_)) if for_child && scope.kind() == ScopeKind::Class => {
                return NameKind::Global;
            }
            Some(kind) => return *kind,
            None => {}
        }
        if depth == 0 {
            return NameKind::Global;
        }
        match self.resolve_at(depth - 1, name, true) {
            NameKind::Global => {
                self.scopes[depth]
                    .names
                    .insert(name.to_owned(), NameKind::Global);
                NameKind::Global
            }
            NameKind::Local(_) | NameKind::Capture(_) => {
                NameKind::Capture(self.scopes[depth].new_capture(name))
            }
        }
    }
}
