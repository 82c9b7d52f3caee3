use std::collections::HashSet;

use log::debug;

use crate::frontend::ast::{Class, Keyed, Program};
use crate::frontend::error::{Diagnostics, SemanticErrorKind, SourceLocation};
use crate::frontend::symbol::{Interner, Symbol, WellKnownNames};
use crate::frontend::typechecker::registry::ClassRegistry;
use crate::meta::{GetLocation, LocationMeta};

/// outcome of following the parent links of a single class
enum Ancestry {
    /// the walk reached Object
    Rooted,
    /// the walk failed, all visited classes are listed (starting with the checked class)
    Broken { visited: Vec<Symbol>, error: Option<SemanticErrorKind> },
}

/// checks the inheritance graph, class by class, in declaration order
struct HierarchyValidator<'r, 'p> {
    registry: &'r ClassRegistry<'p>,

    /// classes already known to be part of (or to lead into) an inheritance cycle
    malformed: HashSet<Symbol>,
}

impl<'r, 'p> HierarchyValidator<'r, 'p> {
    fn new(registry: &'r ClassRegistry<'p>) -> Self {
        Self { registry, malformed: HashSet::new() }
    }

    /// Int, String, Bool and SELF_TYPE can never be used as parents
    fn is_illegal_parent(&self, parent: Symbol) -> bool {
        let names = self.registry.names();
        names.is_primitive(parent) || parent == names.self_type
    }

    fn walk(&self, cls: &Class<LocationMeta>) -> Ancestry {
        let names = self.registry.names();
        let class_name = self.registry.name(cls.get_key());
        let mut visited = vec![cls.get_key()];
        let mut current = cls;
        loop {
            let parent_name = current.item.parent;
            if self.is_illegal_parent(parent_name) {
                let error = SemanticErrorKind::IllegalInheritance {
                    class: class_name,
                    parent: self.registry.name(parent_name),
                };
                return Ancestry::Broken { visited, error: Some(error) };
            }
            let parent = match self.registry.lookup(parent_name) {
                Some(parent) => parent,
                None => {
                    let error = SemanticErrorKind::UndefinedParent {
                        class: class_name,
                        parent: self.registry.name(parent_name),
                    };
                    return Ancestry::Broken { visited, error: Some(error) };
                }
            };
            let parent_key = parent.get_key();
            if parent_key == names.object {
                return Ancestry::Rooted;
            }
            if self.malformed.contains(&parent_key) {
                // the cycle behind this class was already reported
                return Ancestry::Broken { visited, error: None };
            }
            if let Some(pos) = visited.iter().position(|&v| v == parent_key) {
                let mut cycle: Vec<_> = visited[pos..].iter()
                    .map(|&v| self.registry.name(v))
                    .collect();
                cycle.push(self.registry.name(parent_key));
                let error = SemanticErrorKind::CyclicInheritance { class: class_name, cycle };
                return Ancestry::Broken { visited, error: Some(error) };
            }
            if visited.len() > self.registry.len() {
                let cycle = visited.iter().map(|&v| self.registry.name(v)).collect();
                let error = SemanticErrorKind::CyclicInheritance { class: class_name, cycle };
                return Ancestry::Broken { visited, error: Some(error) };
            }
            visited.push(parent_key);
            current = parent;
        }
    }

    fn validate(&mut self, diagnostics: &mut Diagnostics) {
        let registry = self.registry;
        let interner = registry.interner();
        for &cls in registry.declared_classes() {
            if self.malformed.contains(&cls.get_key()) {
                continue;
            }
            if let Ancestry::Broken { visited, error } = self.walk(cls) {
                match error {
                    Some(kind) => {
                        if let SemanticErrorKind::CyclicInheritance { .. } = kind {
                            self.malformed.extend(visited);
                        }
                        diagnostics.report(kind, class_location(cls, interner));
                    }
                    None => self.malformed.extend(visited),
                }
            }
        }
    }
}

pub fn class_location(cls: &Class<LocationMeta>, interner: &Interner) -> SourceLocation {
    SourceLocation::new(interner.resolve(cls.item.filename), cls.get_location().line)
}

/// registers built-in and user-defined classes and validates the inheritance graph;
/// ancestor chains are available in the registry only if no errors were reported
pub fn build_class_registry<'p>(
    builtins: &'p [Class<LocationMeta>],
    program: &'p Program<LocationMeta>,
    names: &'p WellKnownNames,
    interner: &'p Interner,
) -> (ClassRegistry<'p>, Diagnostics) {
    let mut registry = ClassRegistry::new(names, interner);
    let mut diagnostics = Diagnostics::new();

    for cls in builtins.iter() {
        registry.register_builtin(cls);
    }
    // all classes are registered before validation, parent may be declared after its child
    for cls in program.classes.iter() {
        if let Err(kind) = registry.register(cls) {
            diagnostics.report(kind, class_location(cls, interner));
        }
    }

    HierarchyValidator::new(&registry).validate(&mut diagnostics);

    if registry.lookup(names.main_class).is_none() {
        diagnostics.report(SemanticErrorKind::MissingMain, SourceLocation::Program);
    }

    if diagnostics.is_empty() {
        registry.compute_ancestors();
    }
    debug!(
        "class hierarchy: {} classes registered, {} errors",
        registry.len(),
        diagnostics.count()
    );
    (registry, diagnostics)
}
