use std::collections::HashMap;
use std::fmt;

/// interned identifier, two symbols are equal iff they were interned from the same text
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct Symbol(u32);

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// interns strings to unique symbols, used for every identifier and type name in the program
#[derive(Debug, Default, Clone)]
pub struct Interner {
    symbols: HashMap<String, Symbol>,
    names: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&symbol) = self.symbols.get(name) {
            return symbol;
        }
        let symbol = Symbol(self.names.len() as u32);
        self.names.push(String::from(name));
        self.symbols.insert(String::from(name), symbol);
        symbol
    }

    /// get symbol of already interned name, without interning it
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.symbols.get(name).copied()
    }

    /// symbols can only be created by an interner, so every symbol of this interner resolves
    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.names
            .get(symbol.0 as usize)
            .map(String::as_str)
            .unwrap_or("<unknown symbol>")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// names with fixed meaning for the analyzer and the runtime, interned once at startup
#[derive(Debug, Clone)]
pub struct WellKnownNames {
    pub object: Symbol,
    pub io: Symbol,
    pub int: Symbol,
    pub bool: Symbol,
    pub string: Symbol,
    pub self_type: Symbol,
    pub self_: Symbol,
    pub main_class: Symbol,
    pub main_method: Symbol,
    /// parent of Object, can't be the name of any user-defined class
    pub no_class: Symbol,
    /// type of the no-op expression (missing initializer)
    pub no_type: Symbol,
    pub prim_slot: Symbol,
    pub val: Symbol,
    pub str_field: Symbol,
    pub abort: Symbol,
    pub type_name: Symbol,
    pub copy: Symbol,
    pub out_string: Symbol,
    pub out_int: Symbol,
    pub in_string: Symbol,
    pub in_int: Symbol,
    pub length: Symbol,
    pub concat: Symbol,
    pub substr: Symbol,
    pub arg: Symbol,
    pub arg2: Symbol,
}

impl WellKnownNames {
    pub fn new(interner: &mut Interner) -> Self {
        Self {
            object: interner.intern("Object"),
            io: interner.intern("IO"),
            int: interner.intern("Int"),
            bool: interner.intern("Bool"),
            string: interner.intern("String"),
            self_type: interner.intern("SELF_TYPE"),
            self_: interner.intern("self"),
            main_class: interner.intern("Main"),
            main_method: interner.intern("main"),
            no_class: interner.intern("_no_class"),
            no_type: interner.intern("_no_type"),
            prim_slot: interner.intern("_prim_slot"),
            val: interner.intern("_val"),
            str_field: interner.intern("_str_field"),
            abort: interner.intern("abort"),
            type_name: interner.intern("type_name"),
            copy: interner.intern("copy"),
            out_string: interner.intern("out_string"),
            out_int: interner.intern("out_int"),
            in_string: interner.intern("in_string"),
            in_int: interner.intern("in_int"),
            length: interner.intern("length"),
            concat: interner.intern("concat"),
            substr: interner.intern("substr"),
            arg: interner.intern("arg"),
            arg2: interner.intern("arg2"),
        }
    }

    /// Int, Bool and String: compared by value, can't be inherited from
    pub fn is_primitive(&self, t: Symbol) -> bool {
        t == self.int || t == self.bool || t == self.string
    }
}
