use crate::parse_env;

/// filename reported for the synthesized built-in classes
pub const BASIC_CLASS_FILENAME: &str = "<basic class>";

/// runtime options of the semantic analyzer
#[derive(Debug, PartialEq, Clone)]
pub struct SemantConfig {
    /// log the validated inheritance graph and every class scope at info level
    pub debug: bool,

    /// filename attached to built-in classes (visible in their diagnostics locations)
    pub basic_class_filename: String,
}

impl Default for SemantConfig {
    fn default() -> Self {
        Self {
            debug: false,
            basic_class_filename: String::from(BASIC_CLASS_FILENAME),
        }
    }
}

impl SemantConfig {
    /// read configuration from SEMANT_DEBUG and SEMANT_BASIC_CLASS_FILE
    pub fn from_env() -> Self {
        let debug = parse_env("SEMANT_DEBUG", "0");
        Self {
            debug: is_enabled(&debug),
            basic_class_filename: parse_env("SEMANT_BASIC_CLASS_FILE", BASIC_CLASS_FILENAME),
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

fn is_enabled(flag: &str) -> bool {
    match flag.trim().to_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => false,
        _ => true,
    }
}
