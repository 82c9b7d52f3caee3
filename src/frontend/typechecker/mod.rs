use itertools::Itertools;
use log::{debug, info};

use crate::config::SemantConfig;
use crate::frontend::ast::{Keyed, Program};
use crate::frontend::error::{Diagnostics, SemanticResult};
use crate::frontend::symbol::{Interner, WellKnownNames};
use crate::meta::{LocationMeta, TypeMeta};

pub use self::hierarchy::build_class_registry;
pub use self::registry::ClassRegistry;
use self::typechecker::TypeChecker;
pub use self::util::get_builtin_classes;

mod hierarchy;
mod mapper;
mod registry;
mod typechecker;
mod util;

pub type CheckedProgram = Program<TypeMeta>;

/// everything the analysis produced: the annotated program is present only if
/// the class hierarchy was valid, diagnostics contain errors of both phases
#[derive(Debug)]
pub struct Analysis {
    pub program: Option<CheckedProgram>,
    pub diagnostics: Diagnostics,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.count()
    }

    /// the annotated program, if no error was found at all
    pub fn into_result(self) -> SemanticResult<CheckedProgram> {
        let Analysis { program, diagnostics } = self;
        match program {
            Some(program) if diagnostics.is_empty() => Ok(program),
            _ => Err(diagnostics.into_vec()),
        }
    }
}

/// main semantic analysis function: validates the class hierarchy and,
/// if it is well-formed, type-checks all user-defined classes
pub fn analyze(program: &Program<LocationMeta>, interner: &mut Interner, config: &SemantConfig) -> Analysis {
    let names = WellKnownNames::new(interner);
    let builtins = get_builtin_classes(&names, interner, &config.basic_class_filename);
    let interner: &Interner = interner;

    let (registry, mut diagnostics) = build_class_registry(&builtins, program, &names, interner);
    if !diagnostics.is_empty() {
        debug!("class hierarchy is malformed, skipping type checking");
        return Analysis { program: None, diagnostics };
    }
    if config.debug {
        for cls in registry.declared_classes() {
            let chain = registry.ancestors(cls.get_key()).iter()
                .map(|&ancestor| interner.resolve(ancestor))
                .join(" -> ");
            info!("inheritance: {}", chain);
        }
    }

    let mut typechecker = TypeChecker::new(&registry, config.debug);
    let checked = typechecker.map_program(program);
    diagnostics.append(typechecker.into_diagnostics());
    debug!("type checking finished with {} errors", diagnostics.count());

    Analysis { program: Some(checked), diagnostics }
}

/// analysis with default configuration, all errors are returned if any was found
pub fn check_types(program: &Program<LocationMeta>, interner: &mut Interner) -> SemanticResult<CheckedProgram> {
    analyze(program, interner, &SemantConfig::default()).into_result()
}
