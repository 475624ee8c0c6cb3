//! Pre-pass over a closure body: which names does it bind?
//!
//! Runs before any code for the body is emitted, so named locals occupy
//! the low slots and temporaries come after them.

use quill_ir::ast::{Pattern, Stmt};

use super::{GenResult, Generator};

impl Generator {
    /// Record the bindings of `body` in the current scope. With
    /// `bind_locals` unset (the module body) only `global`/`nonlocal`
    /// declarations are processed. Nested function and class bodies are
    /// not entered; only their names are bound here.
    pub(super) fn collect_bindings(&mut self, body: &[Stmt], bind_locals: bool) -> GenResult<()> {
        for stmt in body {
            match stmt {
                Stmt::Assign { targets, .. } => {
                    for target in targets {
                        self.bind_pattern(target, bind_locals);
                    }
                }
                Stmt::Del(target) => self.bind_pattern(target, bind_locals),
                Stmt::For { target, body, .. } => {
                    self.bind_pattern(target, bind_locals);
                    self.collect_bindings(body, bind_locals)?;
                }
                Stmt::Def(def) => self.bind_name(&def.name, bind_locals),
                Stmt::Class(class) => self.bind_name(&class.name, bind_locals),
                Stmt::Global(names) => {
                    for name in names {
                        self.scopes.mark_global(name)?;
                    }
                }
                Stmt::Nonlocal(names) => {
                    for name in names {
                        self.scopes.mark_nonlocal(name)?;
                    }
                }
                Stmt::If {
                    then_body,
                    else_body,
                    ..
                } => {
                    self.collect_bindings(then_body, bind_locals)?;
                    self.collect_bindings(else_body, bind_locals)?;
                }
                Stmt::While { body, .. } => self.collect_bindings(body, bind_locals)?,
                Stmt::Try { body, handlers } => {
                    self.collect_bindings(body, bind_locals)?;
                    for clause in handlers {
                        if let Some(name) = &clause.binding {
                            self.bind_name(name, bind_locals);
                        }
                        self.collect_bindings(&clause.body, bind_locals)?;
                    }
                }
                Stmt::Pass
                | Stmt::Expr(_)
                | Stmt::Return(_)
                | Stmt::Raise(_)
                | Stmt::Break
                | Stmt::Continue => {}
            }
        }
        Ok(())
    }

    fn bind_name(&mut self, name: &str, bind_locals: bool) {
        if bind_locals {
            self.scopes.mark_local(name);
        }
    }

    /// Only bare names bind; attribute and subscript targets store into an
    /// existing object.
    fn bind_pattern(&mut self, pattern: &Pattern, bind_locals: bool) {
        pattern.for_each_name(&mut |name| self.bind_name(name, bind_locals));
    }
}
