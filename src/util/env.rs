use std::collections::HashMap;

use log::trace;

use crate::frontend::symbol::Symbol;

/// alias for a single scope: maps identifier to its declared type
pub type Env<T> = HashMap<Symbol, T>;

/// stack of scopes, lookup goes from the innermost scope outwards
/// so inner declarations shadow the outer ones
#[derive(Debug, Clone)]
pub struct SymbolEnv {
    scopes: Vec<Env<Symbol>>,
}

impl Default for SymbolEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolEnv {
    /// environment is created with a single (outermost) scope
    pub fn new() -> Self {
        Self { scopes: vec![Env::new()] }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Env::new());
        trace!("entered scope, depth {}", self.depth());
    }

    /// the outermost scope is never removed
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
        trace!("exited scope, depth {}", self.depth());
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// binds ident in the innermost scope, returns previous binding from the same scope
    pub fn add(&mut self, ident: Symbol, t: Symbol) -> Option<Symbol> {
        match self.scopes.last_mut() {
            Some(scope) => scope.insert(ident, t),
            None => None,
        }
    }

    /// finds the innermost binding of ident
    pub fn lookup(&self, ident: Symbol) -> Option<Symbol> {
        self.scopes.iter()
            .rev()
            .find_map(|scope| scope.get(&ident))
            .copied()
    }

    /// finds binding of ident in the innermost scope only
    pub fn probe(&self, ident: Symbol) -> Option<Symbol> {
        self.scopes.last()
            .and_then(|scope| scope.get(&ident))
            .copied()
    }
}
