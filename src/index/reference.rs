use super::Location;
use serde::{Deserialize, Serialize};

/// What a reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// A constant read (`Foo`, `Foo::Bar`)
    Constant,

    /// A method call, including operators and attribute writes
    Method,
}

/// A use of a name somewhere in the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub name: String,
    pub location: Location,
}

impl Reference {
    pub fn new(kind: ReferenceKind, name: String, location: Location) -> Self {
        Self {
            kind,
            name,
            location,
        }
    }

    pub fn constant(name: impl Into<String>, location: Location) -> Self {
        Self::new(ReferenceKind::Constant, name.into(), location)
    }

    pub fn method(name: impl Into<String>, location: Location) -> Self {
        Self::new(ReferenceKind::Method, name.into(), location)
    }
}
