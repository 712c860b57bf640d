//! Type environment with lexically scoped bindings.
//!
//! [`TypeEnv`] manages a stack of scopes, each mapping names to the type
//! text the checker assigned at their declaration.

use std::collections::HashMap;

// ══════════════════════════════════════════════════════════════════════════════
// Scope Kind
// ══════════════════════════════════════════════════════════════════════════════

/// What kind of code context a scope represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// Top-level module scope.
    Module,
    /// Function or method body, including its parameters.
    Function,
    /// `{ ... }` block, loop head or catch clause.
    Block,
}

// ══════════════════════════════════════════════════════════════════════════════
// Scope
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    bindings: HashMap<String, String>,
}

impl Scope {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            bindings: HashMap::new(),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// TypeEnv
// ══════════════════════════════════════════════════════════════════════════════

/// A stack of scopes for name resolution.
#[derive(Debug)]
pub struct TypeEnv {
    scopes: Vec<Scope>,
}

impl TypeEnv {
    /// Create a new environment with an initial module scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeKind::Module)],
        }
    }

    pub fn push_scope(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope::new(kind));
    }

    /// Pop the top scope. The module scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Define a binding in the current scope, replacing any binding of the
    /// same name there. Returns `false` if the name was already defined.
    pub fn define(&mut self, name: &str, ty: impl Into<String>) -> bool {
        let ty = ty.into();
        match self.scopes.last_mut() {
            Some(scope) => scope.bindings.insert(name.to_string(), ty).is_none(),
            None => false,
        }
    }

    /// Define a `var`-style binding in the nearest function or module scope.
    pub fn define_hoisted(&mut self, name: &str, ty: impl Into<String>) -> bool {
        let ty = ty.into();
        let scope = self
            .scopes
            .iter_mut()
            .rev()
            .find(|s| s.kind != ScopeKind::Block);
        match scope {
            Some(scope) => scope.bindings.insert(name.to_string(), ty).is_none(),
            None => false,
        }
    }

    /// Look up a binding, searching from innermost to outermost scope.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.bindings.get(name))
            .map(String::as_str)
    }

    /// `true` inside any function body.
    pub fn in_function(&self) -> bool {
        self.scopes.iter().any(|s| s.kind == ScopeKind::Function)
    }

    pub fn current_scope_kind(&self) -> ScopeKind {
        self.scopes.last().map_or(ScopeKind::Module, |s| s.kind)
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for TypeEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_scope_shadows() {
        let mut env = TypeEnv::new();
        env.define("x", "number");
        env.push_scope(ScopeKind::Block);
        env.define("x", "string");
        assert_eq!(env.lookup("x"), Some("string"));
        env.pop_scope();
        assert_eq!(env.lookup("x"), Some("number"));
    }

    #[test]
    fn hoisted_skips_blocks() {
        let mut env = TypeEnv::new();
        env.push_scope(ScopeKind::Function);
        env.push_scope(ScopeKind::Block);
        env.define_hoisted("v", "number");
        env.pop_scope();
        assert_eq!(env.lookup("v"), Some("number"));
        env.pop_scope();
        assert_eq!(env.lookup("v"), None);
    }

    #[test]
    fn module_scope_survives_pop() {
        let mut env = TypeEnv::new();
        env.pop_scope();
        assert_eq!(env.depth(), 1);
        assert!(!env.in_function());
        assert_eq!(env.current_scope_kind(), ScopeKind::Module);
    }
}
