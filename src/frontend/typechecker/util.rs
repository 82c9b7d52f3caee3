use crate::frontend::ast::{
    AttributeItem, Class, ClassItem, Expression, ExpressionKind, Feature, FeatureKind, Formal,
    FormalItem, MethodItem,
};
use crate::frontend::symbol::{Interner, Symbol, WellKnownNames};
use crate::meta::LocationMeta;

/// built-in classes have no source, they are all reported at line 0
fn builtin_location() -> LocationMeta {
    LocationMeta::from(0)
}

fn no_expr() -> Box<Expression<LocationMeta>> {
    Box::new(Expression::new(ExpressionKind::NoExpr, builtin_location()))
}

fn method(ident: Symbol, formals: Vec<(Symbol, Symbol)>, ret: Symbol) -> Feature<LocationMeta> {
    let formals = formals.into_iter()
        .map(|(ident, t)| Formal::new(FormalItem { ident, t }, builtin_location()))
        .collect();
    let item = MethodItem { ident, formals, ret, body: no_expr() };
    Feature::new(FeatureKind::Method(item), builtin_location())
}

fn attribute(ident: Symbol, t: Symbol) -> Feature<LocationMeta> {
    let item = AttributeItem { ident, t, init: no_expr() };
    Feature::new(FeatureKind::Attribute(item), builtin_location())
}

fn class(ident: Symbol, parent: Symbol, features: Vec<Feature<LocationMeta>>, filename: Symbol) -> Class<LocationMeta> {
    Class::new(ClassItem { ident, parent, features, filename }, builtin_location())
}

/// get the basic classes: Object, IO, Int, Bool and String;
/// method bodies are empty, they are provided by the runtime system
pub fn get_builtin_classes(
    names: &WellKnownNames, interner: &mut Interner, filename: &str,
) -> Vec<Class<LocationMeta>> {
    let n = names;
    let filename = interner.intern(filename);

    let object_class = class(n.object, n.no_class, vec![
        method(n.abort, vec![], n.object),
        method(n.type_name, vec![], n.string),
        method(n.copy, vec![], n.self_type),
    ], filename);

    let io_class = class(n.io, n.object, vec![
        method(n.out_string, vec![(n.arg, n.string)], n.self_type),
        method(n.out_int, vec![(n.arg, n.int)], n.self_type),
        method(n.in_string, vec![], n.string),
        method(n.in_int, vec![], n.int),
    ], filename);

    // the only attribute is the raw value slot
    let int_class = class(n.int, n.object, vec![
        attribute(n.val, n.prim_slot),
    ], filename);

    let bool_class = class(n.bool, n.object, vec![
        attribute(n.val, n.prim_slot),
    ], filename);

    // _val is the length of the string, _str_field the string itself
    let string_class = class(n.string, n.object, vec![
        attribute(n.val, n.int),
        attribute(n.str_field, n.prim_slot),
        method(n.length, vec![], n.int),
        method(n.concat, vec![(n.arg, n.string)], n.string),
        method(n.substr, vec![(n.arg, n.int), (n.arg2, n.int)], n.string),
    ], filename);

    vec![object_class, io_class, int_class, bool_class, string_class]
}
