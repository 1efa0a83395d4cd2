use super::Location;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Index of a definition inside an [`Index`](super::Index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefinitionId(pub usize);

/// Kind of definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionKind {
    AttrReader,
    AttrWriter,
    Class,
    Constant,
    Method,
    Module,
}

impl DefinitionKind {
    pub const ALL: [DefinitionKind; 6] = [
        DefinitionKind::AttrReader,
        DefinitionKind::AttrWriter,
        DefinitionKind::Class,
        DefinitionKind::Constant,
        DefinitionKind::Method,
        DefinitionKind::Module,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            DefinitionKind::AttrReader => "attr_reader",
            DefinitionKind::AttrWriter => "attr_writer",
            DefinitionKind::Class => "class",
            DefinitionKind::Constant => "constant",
            DefinitionKind::Method => "method",
            DefinitionKind::Module => "module",
        }
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self, DefinitionKind::Class | DefinitionKind::Module)
    }

    pub fn is_accessor(&self) -> bool {
        matches!(self, DefinitionKind::AttrReader | DefinitionKind::AttrWriter)
    }

    /// Whether this kind is referenced through method calls
    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            DefinitionKind::Method | DefinitionKind::AttrReader | DefinitionKind::AttrWriter
        )
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for DefinitionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "attrreader" => Ok(DefinitionKind::AttrReader),
            "attrwriter" => Ok(DefinitionKind::AttrWriter),
            "class" => Ok(DefinitionKind::Class),
            "constant" => Ok(DefinitionKind::Constant),
            "method" => Ok(DefinitionKind::Method),
            "module" => Ok(DefinitionKind::Module),
            _ => Err(format!(
                "unknown definition kind `{}` (expected one of: {})",
                s,
                DefinitionKind::ALL
                    .iter()
                    .map(|k| k.display_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// Liveness of a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionStatus {
    #[default]
    Dead,
    Alive,
    Ignored,
}

/// A named program entity declared somewhere in the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub kind: DefinitionKind,

    /// Short name (e.g., "foo", "foo=", "Bar")
    pub name: String,

    /// Fully qualified name (e.g., "A::B#foo", "A::B::bar", "A::B")
    pub full_name: String,

    pub location: Location,

    pub status: DefinitionStatus,
}

impl Definition {
    pub fn new(kind: DefinitionKind, name: String, full_name: String, location: Location) -> Self {
        Self {
            kind,
            name,
            full_name,
            location,
            status: DefinitionStatus::Dead,
        }
    }

    /// Mark as used. An ignored definition stays ignored.
    pub fn alive(&mut self) {
        if self.status == DefinitionStatus::Dead {
            self.status = DefinitionStatus::Alive;
        }
    }

    /// Exempt from dead-code reporting
    pub fn ignore(&mut self) {
        self.status = DefinitionStatus::Ignored;
    }

    pub fn is_dead(&self) -> bool {
        self.status == DefinitionStatus::Dead
    }

    pub fn is_alive(&self) -> bool {
        self.status == DefinitionStatus::Alive
    }

    pub fn is_ignored(&self) -> bool {
        self.status == DefinitionStatus::Ignored
    }

    /// Get a display string for this definition
    pub fn display(&self) -> String {
        format!(
            "{} {} ({})",
            self.kind.display_name(),
            self.full_name,
            self.location
        )
    }
}
