#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use cool_semant::frontend::ast::*;
use cool_semant::frontend::error::SemanticErrorKind;
use cool_semant::frontend::symbol::{Interner, Symbol};
use cool_semant::meta::LocationMeta;
use cool_semant::{analyze, Analysis, SemantConfig};

pub type Expr = Expression<LocationMeta>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// builds programs the way the parser would, every node gets the current line
pub struct AstBuilder {
    interner: RefCell<Interner>,
    line: Cell<usize>,
    filename: Symbol,
}

impl AstBuilder {
    pub fn new(filename: &str) -> Self {
        let mut interner = Interner::new();
        let filename = interner.intern(filename);
        Self { interner: RefCell::new(interner), line: Cell::new(1), filename }
    }

    pub fn sym(&self, name: &str) -> Symbol {
        self.interner.borrow_mut().intern(name)
    }

    /// nodes created afterwards are located at the given line
    pub fn at(&self, line: usize) -> &Self {
        self.line.set(line);
        self
    }

    fn loc(&self) -> LocationMeta {
        LocationMeta::from(self.line.get())
    }

    pub fn into_interner(self) -> Interner {
        self.interner.into_inner()
    }

    pub fn program(&self, classes: Vec<Class<LocationMeta>>) -> Program<LocationMeta> {
        Program::new(classes)
    }

    pub fn class(&self, name: &str, parent: &str, features: Vec<Feature<LocationMeta>>) -> Class<LocationMeta> {
        let item = ClassItem {
            ident: self.sym(name),
            parent: self.sym(parent),
            features,
            filename: self.filename,
        };
        Class::new(item, self.loc())
    }

    pub fn attr(&self, name: &str, t: &str, init: Expr) -> Feature<LocationMeta> {
        let item = AttributeItem { ident: self.sym(name), t: self.sym(t), init: Box::new(init) };
        Feature::new(FeatureKind::Attribute(item), self.loc())
    }

    pub fn method(&self, name: &str, formals: &[(&str, &str)], ret: &str, body: Expr) -> Feature<LocationMeta> {
        let formals = formals.iter()
            .map(|(ident, t)| Formal::new(FormalItem { ident: self.sym(ident), t: self.sym(t) }, self.loc()))
            .collect();
        let item = MethodItem { ident: self.sym(name), formals, ret: self.sym(ret), body: Box::new(body) };
        Feature::new(FeatureKind::Method(item), self.loc())
    }

    fn expr(&self, kind: ExpressionKind<LocationMeta>) -> Expr {
        Expression::new(kind, self.loc())
    }

    pub fn int(&self, val: i32) -> Expr {
        self.expr(ExpressionKind::LitInt { val })
    }

    pub fn boolean(&self, val: bool) -> Expr {
        self.expr(ExpressionKind::LitBool { val })
    }

    pub fn string(&self, val: &str) -> Expr {
        self.expr(ExpressionKind::LitStr { val: String::from(val) })
    }

    pub fn object(&self, name: &str) -> Expr {
        self.expr(ExpressionKind::Object { ident: self.sym(name) })
    }

    pub fn no_expr(&self) -> Expr {
        self.expr(ExpressionKind::NoExpr)
    }

    pub fn new_object(&self, t: &str) -> Expr {
        self.expr(ExpressionKind::New { t: self.sym(t) })
    }

    pub fn isvoid(&self, e: Expr) -> Expr {
        self.expr(ExpressionKind::IsVoid { expr: Box::new(e) })
    }

    pub fn assign(&self, name: &str, e: Expr) -> Expr {
        self.expr(ExpressionKind::Assign { ident: self.sym(name), expr: Box::new(e) })
    }

    pub fn dispatch(&self, receiver: Expr, name: &str, args: Vec<Expr>) -> Expr {
        self.expr(ExpressionKind::Dispatch { expr: Box::new(receiver), name: self.sym(name), args })
    }

    /// `name(args)` with implicit self receiver
    pub fn call(&self, name: &str, args: Vec<Expr>) -> Expr {
        let receiver = self.object("self");
        self.dispatch(receiver, name, args)
    }

    pub fn static_dispatch(&self, receiver: Expr, t: &str, name: &str, args: Vec<Expr>) -> Expr {
        self.expr(ExpressionKind::StaticDispatch {
            expr: Box::new(receiver),
            t: self.sym(t),
            name: self.sym(name),
            args,
        })
    }

    pub fn cond(&self, pred: Expr, then_expr: Expr, else_expr: Expr) -> Expr {
        self.expr(ExpressionKind::Cond {
            pred: Box::new(pred),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        })
    }

    pub fn while_loop(&self, pred: Expr, body: Expr) -> Expr {
        self.expr(ExpressionKind::Loop { pred: Box::new(pred), body: Box::new(body) })
    }

    pub fn case(&self, e: Expr, branches: Vec<(&str, &str, Expr)>) -> Expr {
        let branches = branches.into_iter()
            .map(|(ident, t, body)| {
                let item = BranchItem { ident: self.sym(ident), t: self.sym(t), expr: Box::new(body) };
                Branch::new(item, self.loc())
            })
            .collect();
        self.expr(ExpressionKind::Case { expr: Box::new(e), branches })
    }

    pub fn block(&self, body: Vec<Expr>) -> Expr {
        self.expr(ExpressionKind::Block { body })
    }

    pub fn let_in(&self, name: &str, t: &str, init: Expr, body: Expr) -> Expr {
        self.expr(ExpressionKind::Let {
            ident: self.sym(name),
            t: self.sym(t),
            init: Box::new(init),
            body: Box::new(body),
        })
    }

    pub fn binary(&self, left: Expr, op: BinaryOperator, right: Expr) -> Expr {
        self.expr(ExpressionKind::Binary { left: Box::new(left), op, right: Box::new(right) })
    }

    pub fn unary(&self, op: UnaryOperator, arg: Expr) -> Expr {
        self.expr(ExpressionKind::Unary { op, arg: Box::new(arg) })
    }

    /// `class Main { main(): Object { body } }`
    pub fn main_class(&self, body: Expr) -> Class<LocationMeta> {
        let main = self.method("main", &[], "Object", body);
        self.class("Main", "Object", vec![main])
    }
}

/// run the whole analysis with default configuration
pub fn run(builder: AstBuilder, classes: impl FnOnce(&AstBuilder) -> Vec<Class<LocationMeta>>) -> (Analysis, Interner) {
    init_logger();
    let program = builder.program(classes(&builder));
    let mut interner = builder.into_interner();
    let analysis = analyze(&program, &mut interner, &SemantConfig::default());
    (analysis, interner)
}

pub fn kinds(analysis: &Analysis) -> Vec<SemanticErrorKind> {
    analysis.diagnostics.kinds().cloned().collect()
}

/// typed body of the method in the checked program
pub fn method_body<'a>(
    analysis: &'a Analysis, interner: &Interner, class: &str, method: &str,
) -> &'a Expression<cool_semant::meta::TypeMeta> {
    let program = match &analysis.program {
        Some(program) => program,
        None => panic!("program was not type-checked: {:?}", analysis.diagnostics),
    };
    let cls = program.classes.iter()
        .find(|c| interner.resolve(c.item.ident) == class)
        .unwrap_or_else(|| panic!("class {} not found", class));
    let found = cls.item.methods()
        .find(|m| interner.resolve(m.ident) == method)
        .unwrap_or_else(|| panic!("method {}.{} not found", class, method));
    &*found.body
}

pub fn type_of<'a>(interner: &'a Interner, e: &Expression<cool_semant::meta::TypeMeta>) -> &'a str {
    use cool_semant::meta::GetType;
    interner.resolve(e.get_type())
}
