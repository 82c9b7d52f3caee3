pub use self::typechecker::{
    analyze, build_class_registry, check_types, get_builtin_classes, Analysis, CheckedProgram,
    ClassRegistry,
};

pub mod ast;
pub mod error;
pub mod symbol;
mod typechecker;
