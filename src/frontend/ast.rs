use std::fmt;

use crate::frontend::symbol::Symbol;
use crate::meta::Meta;

/// trait for marking ast items that can searched by key (in an environment)
pub trait Keyed {
    fn get_key(&self) -> Symbol;
}

/// alias for all metadata containers attached to ast items
pub type AstItem<ItemT, MetaT> = Meta<ItemT, MetaT>;

impl<ItemT: Keyed, MetaT> Keyed for AstItem<ItemT, MetaT> {
    /// if item is keyed, the whole wrapper can also be keyed using same key
    fn get_key(&self) -> Symbol {
        self.item.get_key()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Times,
    Divide,
    Less,
    LessEqual,
    Equal,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UnaryOperator {
    /// integer negation: `~e`
    Neg,
    /// boolean complement: `not e`
    Not,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Times => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Equal => "=",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOperator::Neg => write!(f, "~"),
            UnaryOperator::Not => write!(f, "not"),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExpressionKind<MetaT> {
    Assign { ident: Symbol, expr: Box<Expression<MetaT>> },
    /// `expr.name(args)`, implicit `self` receiver is represented by an explicit `self` object
    Dispatch {
        expr: Box<Expression<MetaT>>,
        name: Symbol,
        args: Vec<Expression<MetaT>>,
    },
    /// `expr@t.name(args)`
    StaticDispatch {
        expr: Box<Expression<MetaT>>,
        t: Symbol,
        name: Symbol,
        args: Vec<Expression<MetaT>>,
    },
    Cond {
        pred: Box<Expression<MetaT>>,
        then_expr: Box<Expression<MetaT>>,
        else_expr: Box<Expression<MetaT>>,
    },
    Loop { pred: Box<Expression<MetaT>>, body: Box<Expression<MetaT>> },
    Case { expr: Box<Expression<MetaT>>, branches: Vec<Branch<MetaT>> },
    Block { body: Vec<Expression<MetaT>> },
    Let {
        ident: Symbol,
        t: Symbol,
        init: Box<Expression<MetaT>>,
        body: Box<Expression<MetaT>>,
    },
    Binary {
        left: Box<Expression<MetaT>>,
        op: BinaryOperator,
        right: Box<Expression<MetaT>>,
    },
    Unary { op: UnaryOperator, arg: Box<Expression<MetaT>> },
    LitInt { val: i32 },
    LitBool { val: bool },
    LitStr { val: String },
    New { t: Symbol },
    IsVoid { expr: Box<Expression<MetaT>> },
    Object { ident: Symbol },
    /// missing initializer or body (built-in methods)
    NoExpr,
}

pub type Expression<MetaT> = AstItem<ExpressionKind<MetaT>, MetaT>;

impl<MetaT> ExpressionKind<MetaT> {
    pub fn is_no_expr(&self) -> bool {
        match self {
            ExpressionKind::NoExpr => true,
            _ => false,
        }
    }
}

/// single arm of the case expression: `ident : t => expr`
#[derive(Debug, PartialEq, Clone)]
pub struct BranchItem<MetaT> {
    pub ident: Symbol,
    pub t: Symbol,
    pub expr: Box<Expression<MetaT>>,
}

pub type Branch<MetaT> = AstItem<BranchItem<MetaT>, MetaT>;

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct FormalItem {
    pub ident: Symbol,
    pub t: Symbol,
}

pub type Formal<MetaT> = AstItem<FormalItem, MetaT>;

impl Keyed for FormalItem {
    fn get_key(&self) -> Symbol {
        self.ident
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct AttributeItem<MetaT> {
    pub ident: Symbol,
    pub t: Symbol,
    pub init: Box<Expression<MetaT>>,
}

impl<MetaT> Keyed for AttributeItem<MetaT> {
    fn get_key(&self) -> Symbol {
        self.ident
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct MethodItem<MetaT> {
    pub ident: Symbol,
    pub formals: Vec<Formal<MetaT>>,
    pub ret: Symbol,
    pub body: Box<Expression<MetaT>>,
}

impl<MetaT> Keyed for MethodItem<MetaT> {
    fn get_key(&self) -> Symbol {
        self.ident
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum FeatureKind<MetaT> {
    Attribute(AttributeItem<MetaT>),
    Method(MethodItem<MetaT>),
}

pub type Feature<MetaT> = AstItem<FeatureKind<MetaT>, MetaT>;

impl<MetaT> Keyed for FeatureKind<MetaT> {
    fn get_key(&self) -> Symbol {
        match self {
            FeatureKind::Attribute(attr) => attr.get_key(),
            FeatureKind::Method(method) => method.get_key(),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct ClassItem<MetaT> {
    pub ident: Symbol,
    pub parent: Symbol,
    pub features: Vec<Feature<MetaT>>,
    pub filename: Symbol,
}

pub type Class<MetaT> = AstItem<ClassItem<MetaT>, MetaT>;

impl<MetaT> ClassItem<MetaT> {
    pub fn methods(&self) -> impl Iterator<Item=&MethodItem<MetaT>> {
        self.features.iter().filter_map(|feature| match &feature.item {
            FeatureKind::Method(method) => Some(method),
            FeatureKind::Attribute(_) => None,
        })
    }

    pub fn attributes(&self) -> impl Iterator<Item=&AttributeItem<MetaT>> {
        self.features.iter().filter_map(|feature| match &feature.item {
            FeatureKind::Attribute(attr) => Some(attr),
            FeatureKind::Method(_) => None,
        })
    }
}

impl<MetaT> Keyed for ClassItem<MetaT> {
    fn get_key(&self) -> Symbol {
        self.ident
    }
}

/// the result of parsing (ast root), classes are kept in declaration order
#[derive(Debug, PartialEq, Clone)]
pub struct Program<MetaT> {
    pub classes: Vec<Class<MetaT>>,
}

impl<MetaT> Program<MetaT> {
    pub fn new(classes: Vec<Class<MetaT>>) -> Self {
        Self { classes }
    }
}
