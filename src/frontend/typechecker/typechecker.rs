use std::collections::HashSet;

use itertools::Itertools;
use log::{debug, info};

use crate::frontend::ast::*;
use crate::frontend::error::{Diagnostics, SemanticErrorKind, SourceLocation};
use crate::frontend::symbol::{Symbol, WellKnownNames};
use crate::frontend::typechecker::registry::ClassRegistry;
use crate::meta::{GetLocation, GetType, LocationMeta, TypeMeta};
use crate::util::env::SymbolEnv;

/// the class whose features are currently checked, passed explicitly through the whole walk
#[derive(Debug, Clone, Copy)]
pub struct ClassContext<'p> {
    pub cls: &'p Class<LocationMeta>,
    pub filename: &'p str,
}

impl<'p> ClassContext<'p> {
    pub fn name(&self) -> Symbol {
        self.cls.get_key()
    }

    pub fn locate(&self, loc: LocationMeta) -> SourceLocation {
        SourceLocation::new(self.filename, loc.line)
    }
}

pub struct TypeChecker<'r, 'p> {
    /// validated class hierarchy (ancestor chains are computed)
    pub(super) registry: &'r ClassRegistry<'p>,

    pub(super) names: &'p WellKnownNames,

    /// scopes of the class, method, let and case branch that is currently checked
    pub(super) env: SymbolEnv,

    diagnostics: Diagnostics,

    /// dump class scopes at info level
    debug: bool,
}

impl<'r, 'p> TypeChecker<'r, 'p> {
    pub fn new(registry: &'r ClassRegistry<'p>, debug: bool) -> Self {
        Self {
            registry,
            names: registry.names(),
            env: SymbolEnv::new(),
            diagnostics: Diagnostics::new(),
            debug,
        }
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    pub(super) fn name(&self, symbol: Symbol) -> String {
        self.registry.name(symbol)
    }

    pub(super) fn report(&mut self, ctx: ClassContext, kind: SemanticErrorKind, loc: LocationMeta) {
        self.diagnostics.report(kind, ctx.locate(loc));
    }

    /// report the error and fall back to Object, so that checking of the parent expression continues
    pub(super) fn fail(&mut self, ctx: ClassContext, kind: SemanticErrorKind, loc: LocationMeta) -> Symbol {
        self.report(ctx, kind, loc);
        self.names.object
    }

    /// runs f in a new nested scope, the scope is removed when f returns
    pub(super) fn with_scope<T, F>(&mut self, f: F) -> T where F: FnOnce(&mut Self) -> T {
        self.env.enter_scope();
        let result = f(self);
        self.env.exit_scope();
        result
    }

    /// check every class of the program, in declaration order
    pub fn map_program(&mut self, program: &'p Program<LocationMeta>) -> Program<TypeMeta> {
        let interner = self.registry.interner();
        let classes = program.classes.iter()
            .map(|cls| {
                let ctx = ClassContext { cls, filename: interner.resolve(cls.item.filename) };
                self.map_class(ctx)
            })
            .collect();
        Program::new(classes)
    }

    pub fn map_class(&mut self, ctx: ClassContext<'p>) -> Class<TypeMeta> {
        debug!("checking class {}", self.name(ctx.name()));
        self.check_duplicate_methods(ctx);

        let features: Vec<Feature<TypeMeta>> = self.with_scope(|typechecker| {
            typechecker.env.add(typechecker.names.self_, ctx.name());
            typechecker.publish_attributes(ctx);
            ctx.cls.item.features.iter()
                .map(|feature| typechecker.map_feature(ctx, feature))
                .collect()
        });

        let item = ClassItem {
            ident: ctx.cls.item.ident,
            parent: ctx.cls.item.parent,
            features,
            filename: ctx.cls.item.filename,
        };
        Class::new(item, TypeMeta::new(ctx.name(), ctx.cls.get_location()))
    }

    /// method name can be declared only once per class (overriding happens between classes)
    fn check_duplicate_methods(&mut self, ctx: ClassContext) {
        let mut declared = HashSet::new();
        for feature in ctx.cls.item.features.iter() {
            if let FeatureKind::Method(method) = &feature.item {
                if !declared.insert(method.ident) {
                    let kind = SemanticErrorKind::DuplicateMethod { method: self.name(method.ident) };
                    self.report(ctx, kind, feature.get_location());
                }
            }
        }
    }

    /// bind attributes of all ancestors (starting from Object) and of the class itself,
    /// only problems with attributes of the current class are reported
    fn publish_attributes(&mut self, ctx: ClassContext<'p>) {
        let registry = self.registry;
        for &ancestor in registry.ancestors(ctx.name()).iter().rev() {
            if let Some(owner) = registry.lookup(ancestor) {
                for feature in owner.item.features.iter() {
                    if let FeatureKind::Attribute(attr) = &feature.item {
                        let is_own = ancestor == ctx.name();
                        self.publish_attribute(ctx, attr, feature.get_location(), is_own);
                    }
                }
            }
        }
        if self.debug {
            let published = registry.ancestors(ctx.name()).iter()
                .rev()
                .filter_map(|&ancestor| registry.lookup(ancestor))
                .flat_map(|owner| owner.item.attributes())
                .map(|attr| format!("{}: {}", self.name(attr.ident), self.name(attr.t)))
                .join(", ");
            info!("scope of class {}: self: SELF_TYPE, {}", self.name(ctx.name()), published);
        }
    }

    fn publish_attribute(
        &mut self, ctx: ClassContext, attr: &AttributeItem<LocationMeta>, loc: LocationMeta, is_own: bool,
    ) {
        if attr.ident == self.names.self_ {
            if is_own {
                let kind = SemanticErrorKind::ReservedIdentifier {
                    ident: self.name(attr.ident),
                    usage: String::from("an attribute"),
                };
                self.report(ctx, kind, loc);
            }
            return;
        }
        if self.env.probe(attr.ident).is_some() {
            if is_own {
                let kind = SemanticErrorKind::DuplicateAttribute { attr: self.name(attr.ident) };
                self.report(ctx, kind, loc);
            }
            return;
        }
        if is_own && self.registry.resolve(attr.t, ctx.name()).is_none() {
            let kind = SemanticErrorKind::UndefinedType {
                t: self.name(attr.t),
                usage: format!("attribute {}", self.name(attr.ident)),
            };
            self.report(ctx, kind, loc);
        }
        self.env.add(attr.ident, attr.t);
    }

    /// bind formal parameters in the current (method) scope
    fn publish_formals(&mut self, ctx: ClassContext, method: &MethodItem<LocationMeta>) {
        for formal in method.formals.iter() {
            let FormalItem { ident, t } = formal.item;
            let loc = formal.get_location();
            if ident == self.names.self_ {
                let kind = SemanticErrorKind::ReservedIdentifier {
                    ident: self.name(ident),
                    usage: format!("a formal parameter of method {}", self.name(method.ident)),
                };
                self.report(ctx, kind, loc);
                continue;
            }
            if self.env.probe(ident).is_some() {
                let kind = SemanticErrorKind::DuplicateFormal {
                    formal: self.name(ident),
                    method: self.name(method.ident),
                };
                self.report(ctx, kind, loc);
                continue;
            }
            // SELF_TYPE formals are reported by the signature check
            if t != self.names.self_type && self.registry.lookup(t).is_none() {
                let kind = SemanticErrorKind::UndefinedType {
                    t: self.name(t),
                    usage: format!("formal parameter {}", self.name(ident)),
                };
                self.report(ctx, kind, loc);
            }
            self.env.add(ident, t);
        }
    }

    fn map_feature(&mut self, ctx: ClassContext<'p>, feature: &Feature<LocationMeta>) -> Feature<TypeMeta> {
        let loc = feature.get_location();
        match &feature.item {
            FeatureKind::Attribute(attr) => {
                let mapped = self.map_attribute(ctx, attr, loc);
                Feature::new(FeatureKind::Attribute(mapped), TypeMeta::new(attr.t, loc))
            }
            FeatureKind::Method(method) => {
                let mapped = self.map_method(ctx, method, loc);
                Feature::new(FeatureKind::Method(mapped), TypeMeta::new(method.ret, loc))
            }
        }
    }

    fn map_attribute(
        &mut self, ctx: ClassContext<'p>, attr: &AttributeItem<LocationMeta>, loc: LocationMeta,
    ) -> AttributeItem<TypeMeta> {
        let init = self.map_expression(ctx, &attr.init);
        let init_t = init.get_type();

        // attribute named self was reported when the class scope was published
        let skip_check = attr.ident == self.names.self_ || init.item.is_no_expr();
        if !skip_check && !self.registry.conforms(init_t, attr.t, ctx.name()) {
            let kind = SemanticErrorKind::AttributeInitTypeMismatch {
                attr: self.name(attr.ident),
                expected: self.name(attr.t),
                actual: self.name(init_t),
            };
            self.report(ctx, kind, loc);
        }
        AttributeItem { ident: attr.ident, t: attr.t, init: Box::new(init) }
    }

    fn map_method(
        &mut self, ctx: ClassContext<'p>, method: &MethodItem<LocationMeta>, loc: LocationMeta,
    ) -> MethodItem<TypeMeta> {
        let body = self.with_scope(|typechecker| {
            typechecker.publish_formals(ctx, method);
            typechecker.map_expression(ctx, &method.body)
        });
        if let Err(kind) = self.check_method_signature(ctx, method, body.get_type()) {
            self.report(ctx, kind, loc);
        }

        let formals: Vec<Formal<TypeMeta>> = method.formals.iter()
            .map(|formal| Formal::new(formal.item.clone(), TypeMeta::new(formal.item.t, formal.get_location())))
            .collect();
        MethodItem { ident: method.ident, formals, ret: method.ret, body: Box::new(body) }
    }

    /// return type and override rules, stops at the first violation
    fn check_method_signature(
        &self, ctx: ClassContext, method: &MethodItem<LocationMeta>, body_t: Symbol,
    ) -> Result<(), SemanticErrorKind> {
        let n = self.names;
        let current = ctx.name();
        let method_name = self.name(method.ident);

        if method.ret == n.self_type && body_t != n.self_type {
            return Err(SemanticErrorKind::BadSelfTypeReturn { method: method_name, actual: self.name(body_t) });
        }
        let body_t = if body_t == n.self_type { current } else { body_t };

        let ret_cls = self.registry.resolve(method.ret, current)
            .ok_or_else(|| SemanticErrorKind::UndefinedReturnType {
                method: method_name.clone(),
                t: self.name(method.ret),
            })?;
        if !self.registry.conforms(body_t, ret_cls.get_key(), current) {
            return Err(SemanticErrorKind::ReturnTypeMismatch {
                method: method_name,
                expected: self.name(method.ret),
                actual: self.name(body_t),
            });
        }

        let overridden = self.registry.parent_of(ctx.cls)
            .and_then(|parent| self.registry.get_method(parent.get_key(), method.ident));
        if let Some(original) = overridden {
            if original.formals.len() != method.formals.len() {
                return Err(SemanticErrorKind::ArityMismatch {
                    method: method_name,
                    expected: original.formals.len(),
                    actual: method.formals.len(),
                });
            }
        }
        for (i, formal) in method.formals.iter().enumerate() {
            if formal.item.t == n.self_type {
                return Err(SemanticErrorKind::SelfTypeFormal {
                    method: method_name,
                    formal: self.name(formal.item.ident),
                });
            }
            let original_t = overridden
                .and_then(|original| original.formals.get(i))
                .map(|original_formal| original_formal.item.t);
            if let Some(original_t) = original_t {
                if original_t != formal.item.t {
                    return Err(SemanticErrorKind::OverrideParameterTypeMismatch {
                        method: method_name,
                        formal: self.name(formal.item.ident),
                        expected: self.name(original_t),
                        actual: self.name(formal.item.t),
                    });
                }
            }
        }
        if let Some(original) = overridden {
            if original.ret != method.ret && !self.registry.conforms(method.ret, original.ret, current) {
                return Err(SemanticErrorKind::OverrideReturnTypeMismatch {
                    method: method_name,
                    expected: self.name(original.ret),
                    actual: self.name(method.ret),
                });
            }
        }
        Ok(())
    }
}
