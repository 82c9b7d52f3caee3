use std::collections::{HashMap, HashSet};

use crate::frontend::ast::{Class, Keyed, MethodItem};
use crate::frontend::error::SemanticErrorKind;
use crate::frontend::symbol::{Interner, Symbol, WellKnownNames};
use crate::meta::LocationMeta;

/// all classes of the program (user-defined and built-in) indexed by name
#[derive(Debug)]
pub struct ClassRegistry<'prog> {
    names: &'prog WellKnownNames,
    interner: &'prog Interner,

    classes: HashMap<Symbol, &'prog Class<LocationMeta>>,

    /// user-defined classes that were registered, in declaration order
    declared: Vec<&'prog Class<LocationMeta>>,

    /// class itself first, Object last; only filled for a validated hierarchy
    ancestors: HashMap<Symbol, Vec<Symbol>>,
}

impl<'p> ClassRegistry<'p> {
    pub fn new(names: &'p WellKnownNames, interner: &'p Interner) -> Self {
        Self {
            names,
            interner,
            classes: HashMap::new(),
            declared: Vec::new(),
            ancestors: HashMap::new(),
        }
    }

    pub fn names(&self) -> &'p WellKnownNames {
        self.names
    }

    pub fn interner(&self) -> &'p Interner {
        self.interner
    }

    /// shorthand for the text of the symbol, used in error messages
    pub fn name(&self, symbol: Symbol) -> String {
        String::from(self.interner.resolve(symbol))
    }

    /// built-in classes are trusted: not validated and not type-checked
    pub fn register_builtin(&mut self, cls: &'p Class<LocationMeta>) {
        self.classes.insert(cls.get_key(), cls);
    }

    /// add user-defined class, SELF_TYPE and names of existing classes cannot be reused
    pub fn register(&mut self, cls: &'p Class<LocationMeta>) -> Result<(), SemanticErrorKind> {
        let key = cls.get_key();
        if key == self.names.self_type || self.classes.contains_key(&key) {
            return Err(SemanticErrorKind::DuplicateClass { class: self.name(key) });
        }
        self.classes.insert(key, cls);
        self.declared.push(cls);
        Ok(())
    }

    pub fn lookup(&self, name: Symbol) -> Option<&'p Class<LocationMeta>> {
        self.classes.get(&name).copied()
    }

    /// like lookup, but SELF_TYPE and self denote the class that is currently checked
    pub fn resolve(&self, name: Symbol, current: Symbol) -> Option<&'p Class<LocationMeta>> {
        if name == self.names.self_type || name == self.names.self_ {
            self.lookup(current)
        } else {
            self.lookup(name)
        }
    }

    pub fn parent_of(&self, cls: &Class<LocationMeta>) -> Option<&'p Class<LocationMeta>> {
        self.lookup(cls.item.parent)
    }

    pub fn declared_classes(&self) -> &[&'p Class<LocationMeta>] {
        &self.declared
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// precompute ancestor chains of every class, requires acyclic hierarchy
    /// (walks are still bounded by the number of classes)
    pub fn compute_ancestors(&mut self) {
        let mut ancestors = HashMap::new();
        for (&key, &cls) in self.classes.iter() {
            let mut chain = vec![key];
            let mut current = cls;
            while current.get_key() != self.names.object && chain.len() <= self.classes.len() {
                match self.parent_of(current) {
                    Some(parent) => {
                        chain.push(parent.get_key());
                        current = parent;
                    }
                    None => break,
                }
            }
            ancestors.insert(key, chain);
        }
        self.ancestors = ancestors;
    }

    /// closed ancestor chain: the class itself, its parent, ..., Object
    pub fn ancestors(&self, name: Symbol) -> &[Symbol] {
        self.ancestors.get(&name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// true iff `sub` is `sup` or `sup` is one of its ancestors
    pub fn is_subclass(&self, sub: Symbol, sup: Symbol) -> bool {
        sub == sup || self.ancestors(sub).contains(&sup)
    }

    /// nearest common ancestor: first class on the chain of `b` that is also an ancestor of `a`
    pub fn get_lub(&self, a: Symbol, b: Symbol) -> Symbol {
        if a == b {
            return a;
        }
        let a_ancestors: HashSet<_> = self.ancestors(a).iter().collect();
        self.ancestors(b).iter()
            .find(|t| a_ancestors.contains(t))
            .copied()
            .unwrap_or(self.names.object)
    }

    /// subtyping on type names as they appear in the program:
    /// SELF_TYPE is the current class, no-type conforms to anything, unknown names to nothing
    pub fn conforms(&self, t1: Symbol, t2: Symbol, current: Symbol) -> bool {
        if t1 == self.names.no_type {
            return true;
        }
        match (self.resolve(t1, current), self.resolve(t2, current)) {
            (Some(c1), Some(c2)) => self.is_subclass(c1.get_key(), c2.get_key()),
            _ => false,
        }
    }

    /// least upper bound on type names, used to merge types of divergent branches
    pub fn join(&self, t1: Symbol, t2: Symbol, current: Symbol) -> Symbol {
        if t1 == t2 {
            return t1;
        }
        match (self.resolve(t1, current), self.resolve(t2, current)) {
            (Some(c1), Some(c2)) => self.get_lub(c1.get_key(), c2.get_key()),
            _ => self.names.object,
        }
    }

    /// the most derived declaration of the method visible in the class
    pub fn get_method(&self, cls: Symbol, method: Symbol) -> Option<&'p MethodItem<LocationMeta>> {
        self.ancestors(cls).iter()
            .filter_map(|&ancestor| self.lookup(ancestor))
            .find_map(|ancestor| ancestor.item.methods().find(|m| m.get_key() == method))
    }
}
