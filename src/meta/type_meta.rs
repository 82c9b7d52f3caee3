use crate::frontend::symbol::Symbol;
use crate::meta::{GetLocation, LocationMeta, Meta};

/// metadata used to store type information (and the location it was computed for)
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TypeMeta {
    pub t: Symbol,
    pub line: usize,
}

impl TypeMeta {
    pub fn new(t: Symbol, loc: LocationMeta) -> Self {
        Self { t, line: loc.line }
    }
}

pub trait GetType {
    fn get_type(&self) -> Symbol;
}

impl<ItemT> GetType for Meta<ItemT, TypeMeta> {
    fn get_type(&self) -> Symbol {
        self.get_meta().t
    }
}

impl<ItemT> GetLocation for Meta<ItemT, TypeMeta> {
    fn get_location(&self) -> LocationMeta {
        LocationMeta::from(self.get_meta().line)
    }
}
