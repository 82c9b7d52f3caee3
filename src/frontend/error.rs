use std::fmt;
use std::io;

use itertools::Itertools;
use log::trace;

use crate::meta::Meta;

#[derive(Debug, PartialEq, Clone)]
pub enum SemanticErrorKind {
    /// structural errors: inheritance graph
    DuplicateClass { class: String },
    UndefinedParent { class: String, parent: String },
    IllegalInheritance { class: String, parent: String },
    CyclicInheritance { class: String, cycle: Vec<String> },
    MissingMain,

    /// declarative errors: class features
    DuplicateAttribute { attr: String },
    DuplicateFormal { formal: String, method: String },
    DuplicateMethod { method: String },
    ReservedIdentifier { ident: String, usage: String },
    UndefinedType { t: String, usage: String },
    BadSelfTypeReturn { method: String, actual: String },
    UndefinedReturnType { method: String, t: String },
    ReturnTypeMismatch { method: String, expected: String, actual: String },
    ArityMismatch { method: String, expected: usize, actual: usize },
    OverrideParameterTypeMismatch {
        method: String,
        formal: String,
        expected: String,
        actual: String,
    },
    OverrideReturnTypeMismatch { method: String, expected: String, actual: String },
    SelfTypeFormal { method: String, formal: String },
    AttributeInitTypeMismatch { attr: String, expected: String, actual: String },

    /// expression-level errors
    UndeclaredIdentifier { ident: String },
    AssignTypeMismatch { ident: String, expected: String, actual: String },
    UndefinedClass { class: String },
    NonIntegerOperand { op: String, operands: Vec<String> },
    NonBooleanOperand { op: String, actual: String },
    IncomparableTypes { left: String, right: String },
    NonBooleanPredicate { construct: String, actual: String },
    LetInitTypeMismatch { ident: String, expected: String, actual: String },
    DispatchOnNonClass { t: String },
    UnknownMethod { class: String, method: String },
    ArgumentCountMismatch { method: String, expected: usize, actual: usize },
    ArgumentTypeMismatch {
        method: String,
        position: usize,
        expected: String,
        actual: String,
    },
    InvalidStaticDispatch { receiver: String, target: String },
    DuplicateBranchType { t: String },
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SemanticErrorKind::DuplicateClass { class } => {
                write!(f, "Class {} was previously defined.", class)
            }
            SemanticErrorKind::UndefinedParent { class, parent } => {
                write!(f, "Class {} inherits from an undefined class {}.", class, parent)
            }
            SemanticErrorKind::IllegalInheritance { class, parent } => {
                write!(f, "Class {} cannot inherit class {}.", class, parent)
            }
            SemanticErrorKind::CyclicInheritance { class, cycle } => {
                write!(
                    f,
                    "Class {}, or an ancestor of {}, is involved in an inheritance cycle: {}.",
                    class, class, cycle.iter().join(" -> ")
                )
            }
            SemanticErrorKind::MissingMain => {
                write!(f, "Class Main is not defined.")
            }
            SemanticErrorKind::DuplicateAttribute { attr } => {
                write!(f, "Attribute {} is already defined in this class or an ancestor.", attr)
            }
            SemanticErrorKind::DuplicateFormal { formal, method } => {
                write!(f, "Formal parameter {} is multiply defined in method {}.", formal, method)
            }
            SemanticErrorKind::DuplicateMethod { method } => {
                write!(f, "Method {} is multiply defined.", method)
            }
            SemanticErrorKind::ReservedIdentifier { ident, usage } => {
                write!(f, "'{}' cannot be the name of {}.", ident, usage)
            }
            SemanticErrorKind::UndefinedType { t, usage } => {
                write!(f, "Class {} of {} is undefined.", t, usage)
            }
            SemanticErrorKind::BadSelfTypeReturn { method, actual } => {
                write!(
                    f,
                    "Method {} is declared to return SELF_TYPE, but its body has type {}.",
                    method, actual
                )
            }
            SemanticErrorKind::UndefinedReturnType { method, t } => {
                write!(f, "Undefined return type {} in method {}.", t, method)
            }
            SemanticErrorKind::ReturnTypeMismatch { method, expected, actual } => {
                write!(
                    f,
                    "Inferred return type {} of method {} does not conform to declared return type {}.",
                    actual, method, expected
                )
            }
            SemanticErrorKind::ArityMismatch { method, expected, actual } => {
                write!(
                    f,
                    "Incompatible number of formal parameters in redefined method {}: expected {}, got {}.",
                    method, expected, actual
                )
            }
            SemanticErrorKind::OverrideParameterTypeMismatch { method, formal, expected, actual } => {
                write!(
                    f,
                    "In redefined method {}, parameter {} has type {}, which is different from the original type {}.",
                    method, formal, actual, expected
                )
            }
            SemanticErrorKind::OverrideReturnTypeMismatch { method, expected, actual } => {
                write!(
                    f,
                    "In redefined method {}, return type {} does not conform to the original return type {}.",
                    method, actual, expected
                )
            }
            SemanticErrorKind::SelfTypeFormal { method, formal } => {
                write!(f, "Formal parameter {} of method {} cannot have type SELF_TYPE.", formal, method)
            }
            SemanticErrorKind::AttributeInitTypeMismatch { attr, expected, actual } => {
                write!(
                    f,
                    "Inferred type {} of initialization of attribute {} does not conform to declared type {}.",
                    actual, attr, expected
                )
            }
            SemanticErrorKind::UndeclaredIdentifier { ident } => {
                write!(f, "Undeclared identifier {}.", ident)
            }
            SemanticErrorKind::AssignTypeMismatch { ident, expected, actual } => {
                write!(
                    f,
                    "Type {} of assigned expression does not match declared type {} of identifier {}.",
                    actual, expected, ident
                )
            }
            SemanticErrorKind::UndefinedClass { class } => {
                write!(f, "Undefined class {}.", class)
            }
            SemanticErrorKind::NonIntegerOperand { op, operands } => {
                write!(f, "non-Int arguments: {}", operands.iter().join(&format!(" {} ", op)))
            }
            SemanticErrorKind::NonBooleanOperand { op, actual } => {
                write!(f, "Argument of '{}' has type {} instead of Bool.", op, actual)
            }
            SemanticErrorKind::IncomparableTypes { left, right } => {
                write!(f, "Illegal comparison of {} with {}.", left, right)
            }
            SemanticErrorKind::NonBooleanPredicate { construct, actual } => {
                write!(f, "Predicate of '{}' has type {} instead of Bool.", construct, actual)
            }
            SemanticErrorKind::LetInitTypeMismatch { ident, expected, actual } => {
                write!(
                    f,
                    "Inferred type {} of initialization of {} does not match identifier's declared type {}.",
                    actual, ident, expected
                )
            }
            SemanticErrorKind::DispatchOnNonClass { t } => {
                write!(f, "Dispatch on undefined class {}.", t)
            }
            SemanticErrorKind::UnknownMethod { class, method } => {
                write!(f, "Dispatch to undefined method {} of class {}.", method, class)
            }
            SemanticErrorKind::ArgumentCountMismatch { method, expected, actual } => {
                write!(
                    f,
                    "Method {} called with wrong number of arguments: expected {}, got {}.",
                    method, expected, actual
                )
            }
            SemanticErrorKind::ArgumentTypeMismatch { method, position, expected, actual } => {
                write!(
                    f,
                    "In call of method {}, type {} of argument {} does not conform to declared type {}.",
                    method, actual, position, expected
                )
            }
            SemanticErrorKind::InvalidStaticDispatch { receiver, target } => {
                write!(
                    f,
                    "Expression type {} does not conform to the parent of declared static dispatch type {}.",
                    receiver, target
                )
            }
            SemanticErrorKind::DuplicateBranchType { t } => {
                write!(f, "Duplicate branch {} in case statement.", t)
            }
        }
    }
}

/// file and line the error is reported for, program-wide errors have no location
#[derive(Debug, PartialEq, Clone)]
pub enum SourceLocation {
    Line { filename: String, line: usize },
    Program,
}

impl SourceLocation {
    pub fn new(filename: &str, line: usize) -> Self {
        SourceLocation::Line { filename: String::from(filename), line }
    }
}

/// standardized type to remember all semantic errors
pub type SemanticError = Meta<SemanticErrorKind, SourceLocation>;

/// result of every phase that may fail as a whole (collects all errors, not just the first one)
pub type SemanticResult<T> = Result<T, Vec<SemanticError>>;

impl fmt::Display for SemanticError {
    /// `<filename>:<line>: <message>`, message alone for program-wide errors
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.get_meta() {
            SourceLocation::Line { filename, line } => {
                write!(f, "{}:{}: {}", filename, line, self.item)
            }
            SourceLocation::Program => write!(f, "{}", self.item),
        }
    }
}

/// append-only sink for all errors detected during the analysis
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Diagnostics {
    errors: Vec<SemanticError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, kind: SemanticErrorKind, location: SourceLocation) {
        let err = SemanticError::new(kind, location);
        trace!("semantic error: {}", err);
        self.errors.push(err);
    }

    pub fn append(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
    }

    pub fn count(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item=&SemanticError> {
        self.errors.iter()
    }

    pub fn kinds(&self) -> impl Iterator<Item=&SemanticErrorKind> {
        self.errors.iter().map(|e| &e.item)
    }

    /// write every error on a separate line
    pub fn write_to<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for err in self.errors.iter() {
            writeln!(out, "{}", err)?;
        }
        Ok(())
    }

    pub fn into_vec(self) -> Vec<SemanticError> {
        self.errors
    }
}
