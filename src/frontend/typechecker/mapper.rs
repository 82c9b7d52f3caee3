use std::collections::HashSet;

use crate::frontend::ast::*;
use crate::frontend::error::SemanticErrorKind;
use crate::frontend::symbol::Symbol;
use crate::frontend::typechecker::typechecker::{ClassContext, TypeChecker};
use crate::meta::{GetLocation, GetType, LocationMeta, TypeMeta};

impl<'r, 'p> TypeChecker<'r, 'p> {
    /// annotate the expression (and all its sub-expressions) with static types,
    /// erroneous expressions are reported and typed as Object
    pub fn map_expression(&mut self, ctx: ClassContext<'p>, expr: &Expression<LocationMeta>) -> Expression<TypeMeta> {
        let n = self.names;
        let loc = expr.get_location();
        let (kind, t) = match &expr.item {
            ExpressionKind::Assign { ident, expr: value } => {
                let declared = self.env.lookup(*ident);
                if declared.is_none() {
                    let kind = SemanticErrorKind::UndeclaredIdentifier { ident: self.name(*ident) };
                    self.report(ctx, kind, loc);
                }
                let mapped = self.map_boxed(ctx, value);
                let value_t = mapped.get_type();
                let t = match declared {
                    None => n.object,
                    Some(declared_t) if declared_t != value_t => {
                        let kind = SemanticErrorKind::AssignTypeMismatch {
                            ident: self.name(*ident),
                            expected: self.name(declared_t),
                            actual: self.name(value_t),
                        };
                        self.fail(ctx, kind, loc)
                    }
                    Some(declared_t) => declared_t,
                };
                (ExpressionKind::Assign { ident: *ident, expr: mapped }, t)
            }
            ExpressionKind::Dispatch { expr: receiver, name, args } => {
                let mapped_receiver = self.map_boxed(ctx, receiver);
                let mapped_args = self.map_expressions(ctx, args);
                let t = self.dispatch_type(ctx, loc, mapped_receiver.get_type(), None, *name, &mapped_args);
                let kind = ExpressionKind::Dispatch { expr: mapped_receiver, name: *name, args: mapped_args };
                (kind, t)
            }
            ExpressionKind::StaticDispatch { expr: receiver, t: target, name, args } => {
                let mapped_receiver = self.map_boxed(ctx, receiver);
                let mapped_args = self.map_expressions(ctx, args);
                let receiver_t = mapped_receiver.get_type();
                let t = self.dispatch_type(ctx, loc, receiver_t, Some(*target), *name, &mapped_args);
                let kind = ExpressionKind::StaticDispatch {
                    expr: mapped_receiver,
                    t: *target,
                    name: *name,
                    args: mapped_args,
                };
                (kind, t)
            }
            ExpressionKind::Cond { pred, then_expr, else_expr } => {
                let mapped_pred = self.map_boxed(ctx, pred);
                let pred_ok = self.check_predicate(ctx, "if", &mapped_pred);
                let mapped_then = self.map_boxed(ctx, then_expr);
                let mapped_else = self.map_boxed(ctx, else_expr);
                let t = if pred_ok {
                    self.registry.join(mapped_then.get_type(), mapped_else.get_type(), ctx.name())
                } else {
                    n.object
                };
                let kind = ExpressionKind::Cond { pred: mapped_pred, then_expr: mapped_then, else_expr: mapped_else };
                (kind, t)
            }
            ExpressionKind::Loop { pred, body } => {
                let mapped_pred = self.map_boxed(ctx, pred);
                self.check_predicate(ctx, "while", &mapped_pred);
                let mapped_body = self.map_boxed(ctx, body);
                (ExpressionKind::Loop { pred: mapped_pred, body: mapped_body }, n.object)
            }
            ExpressionKind::Case { expr: scrutinee, branches } => {
                let mapped_scrutinee = self.map_boxed(ctx, scrutinee);
                let (mapped_branches, t) = self.map_branches(ctx, branches);
                (ExpressionKind::Case { expr: mapped_scrutinee, branches: mapped_branches }, t)
            }
            ExpressionKind::Block { body } => {
                let mapped_body = self.map_expressions(ctx, body);
                // empty block is never produced by the parser, but it must still have a type
                let t = mapped_body.last()
                    .map(|last| last.get_type())
                    .unwrap_or(n.object);
                (ExpressionKind::Block { body: mapped_body }, t)
            }
            ExpressionKind::Let { ident, t: declared_t, init, body } => {
                let binds_self = *ident == n.self_;
                if binds_self {
                    let kind = SemanticErrorKind::ReservedIdentifier {
                        ident: self.name(*ident),
                        usage: String::from("a let binding"),
                    };
                    self.report(ctx, kind, loc);
                }

                // initializer is evaluated in the outer scope
                let mapped_init = self.map_boxed(ctx, init);
                let init_t = mapped_init.get_type();
                let mut well_typed = !binds_self;
                if !binds_self {
                    if self.registry.resolve(*declared_t, ctx.name()).is_none() {
                        let kind = SemanticErrorKind::UndefinedType {
                            t: self.name(*declared_t),
                            usage: format!("let binding {}", self.name(*ident)),
                        };
                        self.report(ctx, kind, loc);
                    }
                    if init_t != n.no_type && init_t != *declared_t {
                        let kind = SemanticErrorKind::LetInitTypeMismatch {
                            ident: self.name(*ident),
                            expected: self.name(*declared_t),
                            actual: self.name(init_t),
                        };
                        self.report(ctx, kind, loc);
                        well_typed = false;
                    }
                }

                let mapped_body = self.with_scope(|typechecker| {
                    if !binds_self {
                        typechecker.env.add(*ident, *declared_t);
                    }
                    typechecker.map_boxed(ctx, body)
                });
                let t = if well_typed { mapped_body.get_type() } else { n.object };
                let kind = ExpressionKind::Let {
                    ident: *ident,
                    t: *declared_t,
                    init: mapped_init,
                    body: mapped_body,
                };
                (kind, t)
            }
            ExpressionKind::Binary { left, op, right } => {
                let mapped_left = self.map_boxed(ctx, left);
                let mapped_right = self.map_boxed(ctx, right);
                let t = self.binary_type(ctx, loc, *op, mapped_left.get_type(), mapped_right.get_type());
                (ExpressionKind::Binary { left: mapped_left, op: *op, right: mapped_right }, t)
            }
            ExpressionKind::Unary { op, arg } => {
                let mapped_arg = self.map_boxed(ctx, arg);
                let arg_t = mapped_arg.get_type();
                let t = match op {
                    UnaryOperator::Neg if arg_t == n.int => n.int,
                    UnaryOperator::Neg => {
                        let kind = SemanticErrorKind::NonIntegerOperand {
                            op: op.to_string(),
                            operands: vec![self.name(arg_t)],
                        };
                        self.fail(ctx, kind, loc)
                    }
                    UnaryOperator::Not if arg_t == n.bool => n.bool,
                    UnaryOperator::Not => {
                        let kind = SemanticErrorKind::NonBooleanOperand {
                            op: op.to_string(),
                            actual: self.name(arg_t),
                        };
                        self.fail(ctx, kind, loc)
                    }
                };
                (ExpressionKind::Unary { op: *op, arg: mapped_arg }, t)
            }
            ExpressionKind::LitInt { val } => (ExpressionKind::LitInt { val: *val }, n.int),
            ExpressionKind::LitBool { val } => (ExpressionKind::LitBool { val: *val }, n.bool),
            ExpressionKind::LitStr { val } => (ExpressionKind::LitStr { val: val.clone() }, n.string),
            ExpressionKind::New { t: class_t } => {
                let t = if *class_t == n.self_type {
                    n.self_type
                } else if self.registry.lookup(*class_t).is_some() {
                    *class_t
                } else {
                    let kind = SemanticErrorKind::UndefinedClass { class: self.name(*class_t) };
                    self.fail(ctx, kind, loc)
                };
                (ExpressionKind::New { t: *class_t }, t)
            }
            ExpressionKind::IsVoid { expr: arg } => {
                let mapped_arg = self.map_boxed(ctx, arg);
                (ExpressionKind::IsVoid { expr: mapped_arg }, n.bool)
            }
            ExpressionKind::Object { ident } => {
                let t = if *ident == n.self_ {
                    n.self_type
                } else {
                    match self.env.lookup(*ident) {
                        Some(t) => t,
                        None => {
                            let kind = SemanticErrorKind::UndeclaredIdentifier { ident: self.name(*ident) };
                            self.fail(ctx, kind, loc)
                        }
                    }
                };
                (ExpressionKind::Object { ident: *ident }, t)
            }
            ExpressionKind::NoExpr => (ExpressionKind::NoExpr, n.no_type),
        };
        Expression::new(kind, TypeMeta::new(t, loc))
    }

    fn map_boxed(&mut self, ctx: ClassContext<'p>, expr: &Expression<LocationMeta>) -> Box<Expression<TypeMeta>> {
        Box::new(self.map_expression(ctx, expr))
    }

    fn map_expressions(
        &mut self, ctx: ClassContext<'p>, exprs: &[Expression<LocationMeta>],
    ) -> Vec<Expression<TypeMeta>> {
        exprs.iter()
            .map(|expr| self.map_expression(ctx, expr))
            .collect()
    }

    /// reports non-Bool predicate of a conditional or loop
    fn check_predicate(&mut self, ctx: ClassContext, construct: &str, pred: &Expression<TypeMeta>) -> bool {
        let pred_t = pred.get_type();
        if pred_t == self.names.bool {
            true
        } else {
            let kind = SemanticErrorKind::NonBooleanPredicate {
                construct: String::from(construct),
                actual: self.name(pred_t),
            };
            self.report(ctx, kind, pred.get_location());
            false
        }
    }

    /// each branch introduces its own scope, the result is the lub of all branch types
    fn map_branches(
        &mut self, ctx: ClassContext<'p>, branches: &[Branch<LocationMeta>],
    ) -> (Vec<Branch<TypeMeta>>, Symbol) {
        let n = self.names;
        let mut seen = HashSet::new();
        let mut has_duplicate = false;
        let mut lub: Option<Symbol> = None;
        let mut mapped_branches = Vec::with_capacity(branches.len());

        for branch in branches.iter() {
            let BranchItem { ident, t, expr } = &branch.item;
            let loc = branch.get_location();
            if !seen.insert(*t) {
                let kind = SemanticErrorKind::DuplicateBranchType { t: self.name(*t) };
                self.report(ctx, kind, loc);
                has_duplicate = true;
            }
            let binds_self = *ident == n.self_;
            if binds_self {
                let kind = SemanticErrorKind::ReservedIdentifier {
                    ident: self.name(*ident),
                    usage: String::from("a case branch binding"),
                };
                self.report(ctx, kind, loc);
            } else if self.registry.lookup(*t).is_none() {
                let kind = SemanticErrorKind::UndefinedType {
                    t: self.name(*t),
                    usage: format!("case branch {}", self.name(*ident)),
                };
                self.report(ctx, kind, loc);
            }

            let mapped_expr = self.with_scope(|typechecker| {
                if !binds_self {
                    typechecker.env.add(*ident, *t);
                }
                typechecker.map_boxed(ctx, expr)
            });
            let branch_t = mapped_expr.get_type();
            lub = Some(match lub {
                None => branch_t,
                Some(lub_t) => self.registry.join(lub_t, branch_t, ctx.name()),
            });
            let item = BranchItem { ident: *ident, t: *t, expr: mapped_expr };
            mapped_branches.push(Branch::new(item, TypeMeta::new(branch_t, loc)));
        }

        let t = if has_duplicate { n.object } else { lub.unwrap_or(n.object) };
        (mapped_branches, t)
    }

    fn binary_type(&mut self, ctx: ClassContext, loc: LocationMeta, op: BinaryOperator, lt: Symbol, rt: Symbol) -> Symbol {
        let n = self.names;
        match op {
            BinaryOperator::Plus | BinaryOperator::Minus | BinaryOperator::Times | BinaryOperator::Divide
            | BinaryOperator::Less | BinaryOperator::LessEqual => {
                if lt == n.int && rt == n.int {
                    match op {
                        BinaryOperator::Less | BinaryOperator::LessEqual => n.bool,
                        _ => n.int,
                    }
                } else {
                    let kind = SemanticErrorKind::NonIntegerOperand {
                        op: op.to_string(),
                        operands: vec![self.name(lt), self.name(rt)],
                    };
                    self.fail(ctx, kind, loc)
                }
            }
            BinaryOperator::Equal => {
                // primitives can be compared only with the values of the same type
                let primitive = n.is_primitive(lt) || n.is_primitive(rt);
                if primitive && lt != rt {
                    let kind = SemanticErrorKind::IncomparableTypes {
                        left: self.name(lt),
                        right: self.name(rt),
                    };
                    self.fail(ctx, kind, loc)
                } else {
                    n.bool
                }
            }
        }
    }

    /// common part of dynamic and static dispatch, arguments are already typed;
    /// `target` is the class named in the static dispatch
    fn dispatch_type(
        &mut self, ctx: ClassContext, loc: LocationMeta, receiver_t: Symbol, target: Option<Symbol>,
        name: Symbol, args: &[Expression<TypeMeta>],
    ) -> Symbol {
        let n = self.names;
        let registry = self.registry;
        let current = ctx.name();

        let receiver_cls = if receiver_t == n.no_type || receiver_t == n.self_type {
            Some(ctx.cls)
        } else {
            registry.lookup(receiver_t)
        };
        let receiver_cls = match receiver_cls {
            Some(cls) => cls,
            None => {
                let kind = SemanticErrorKind::DispatchOnNonClass { t: self.name(receiver_t) };
                return self.fail(ctx, kind, loc);
            }
        };

        // static dispatch resolves the method starting from the parent of the named class
        let method_owner = match target {
            None => receiver_cls.get_key(),
            Some(target) => {
                let target_cls = match registry.lookup(target) {
                    Some(cls) => cls,
                    None => {
                        let kind = SemanticErrorKind::UndefinedClass { class: self.name(target) };
                        return self.fail(ctx, kind, loc);
                    }
                };
                match registry.parent_of(target_cls) {
                    Some(parent) if registry.is_subclass(receiver_cls.get_key(), parent.get_key()) => {
                        parent.get_key()
                    }
                    _ => {
                        let kind = SemanticErrorKind::InvalidStaticDispatch {
                            receiver: self.name(receiver_t),
                            target: self.name(target),
                        };
                        return self.fail(ctx, kind, loc);
                    }
                }
            }
        };

        let method = match registry.get_method(method_owner, name) {
            Some(method) => method,
            None => {
                let kind = SemanticErrorKind::UnknownMethod {
                    class: self.name(method_owner),
                    method: self.name(name),
                };
                return self.fail(ctx, kind, loc);
            }
        };
        if method.formals.len() != args.len() {
            let kind = SemanticErrorKind::ArgumentCountMismatch {
                method: self.name(name),
                expected: method.formals.len(),
                actual: args.len(),
            };
            return self.fail(ctx, kind, loc);
        }

        let mut well_typed = true;
        for (i, (formal, arg)) in method.formals.iter().zip(args.iter()).enumerate() {
            let arg_t = arg.get_type();
            if !registry.conforms(arg_t, formal.item.t, current) {
                let kind = SemanticErrorKind::ArgumentTypeMismatch {
                    method: self.name(name),
                    position: i + 1,
                    expected: self.name(formal.item.t),
                    actual: self.name(arg_t),
                };
                self.report(ctx, kind, arg.get_location());
                well_typed = false;
            }
        }
        if !well_typed {
            return n.object;
        }

        if method.ret == n.self_type {
            // SELF_TYPE result is the type of the receiver (for implicit self: SELF_TYPE)
            if receiver_t == n.no_type { n.self_type } else { receiver_t }
        } else {
            method.ret
        }
    }
}
