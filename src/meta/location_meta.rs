use crate::meta::Meta;

/// metadata type for location data (attached by the parser)
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct LocationMeta {
    /// line number in the source file of the enclosing class
    pub line: usize,
}

impl From<usize> for LocationMeta {
    fn from(line: usize) -> Self {
        Self { line }
    }
}

pub trait GetLocation {
    fn get_location(&self) -> LocationMeta;
}

impl<ItemT> GetLocation for Meta<ItemT, LocationMeta> {
    fn get_location(&self) -> LocationMeta {
        *self.get_meta()
    }
}
