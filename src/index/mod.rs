mod ancestors;
mod builder;
mod definition;
mod location;
mod parallel_builder;
mod reference;

pub use ancestors::AncestorTable;
pub use builder::{IndexBuilder, ScanResult};
pub use definition::{Definition, DefinitionId, DefinitionKind, DefinitionStatus};
pub use location::Location;
pub use parallel_builder::ParallelIndexBuilder;
pub use reference::{Reference, ReferenceKind};

use std::collections::HashMap;
use tracing::debug;

/// A class or module as seen by the ancestor resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceRecord {
    pub definition: DefinitionId,

    /// Fully qualified name, e.g. "A::B"
    pub full_name: String,

    /// Superclass expression as written in the source, if any
    pub superclass: Option<String>,

    /// Full names of the enclosing namespaces, outermost first
    pub nesting: Vec<String>,
}

/// Project-wide symbol table of definitions and references.
///
/// Definitions and references are only ever appended; `finalize` marks every
/// referenced name alive and is the only pass that changes statuses after
/// indexing apart from plugin ignores.
#[derive(Debug, Default)]
pub struct Index {
    definitions: Vec<Definition>,

    /// Map from short name to definitions (in insertion order)
    definitions_by_name: HashMap<String, Vec<DefinitionId>>,

    references: Vec<Reference>,

    /// Map from name to reference positions in `references`
    references_by_name: HashMap<String, Vec<usize>>,

    namespaces: Vec<NamespaceRecord>,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition and return its id
    pub fn define(&mut self, definition: Definition) -> DefinitionId {
        let id = DefinitionId(self.definitions.len());
        self.definitions_by_name
            .entry(definition.name.clone())
            .or_default()
            .push(id);
        self.definitions.push(definition);
        id
    }

    /// Add a class or module definition along with its ancestor record
    pub fn define_namespace(
        &mut self,
        definition: Definition,
        superclass: Option<String>,
        nesting: Vec<String>,
    ) -> DefinitionId {
        let full_name = definition.full_name.clone();
        let id = self.define(definition);
        self.namespaces.push(NamespaceRecord {
            definition: id,
            full_name,
            superclass,
            nesting,
        });
        id
    }

    /// Record a use of a name
    pub fn reference(&mut self, reference: Reference) {
        let position = self.references.len();
        self.references_by_name
            .entry(reference.name.clone())
            .or_default()
            .push(position);
        self.references.push(reference);
    }

    /// Mark every definition whose name is referenced anywhere as alive.
    ///
    /// Matching is by short name only, so any `foo` call keeps every `foo`
    /// definition alive. Running it twice changes nothing.
    pub fn finalize(&mut self) {
        let mut marked = 0;
        for name in self.references_by_name.keys() {
            if let Some(ids) = self.definitions_by_name.get(name) {
                for id in ids {
                    let definition = &mut self.definitions[id.0];
                    if definition.is_dead() {
                        marked += 1;
                    }
                    definition.alive();
                }
            }
        }
        debug!("Finalized index: {} definitions marked alive", marked);
    }

    /// Append a per-file shard, remapping its definition ids
    pub fn merge(&mut self, other: Index) {
        let offset = self.definitions.len();

        for definition in other.definitions {
            self.define(definition);
        }
        for reference in other.references {
            self.reference(reference);
        }
        self.namespaces
            .extend(other.namespaces.into_iter().map(|mut record| {
                record.definition = DefinitionId(record.definition.0 + offset);
                record
            }));
    }

    pub fn definition(&self, id: DefinitionId) -> Option<&Definition> {
        self.definitions.get(id.0)
    }

    pub fn definition_mut(&mut self, id: DefinitionId) -> Option<&mut Definition> {
        self.definitions.get_mut(id.0)
    }

    /// Find definitions by short name
    pub fn definitions_for_name(&self, name: &str) -> Vec<&Definition> {
        self.definitions_by_name
            .get(name)
            .map(|ids| ids.iter().filter_map(|id| self.definition(*id)).collect())
            .unwrap_or_default()
    }

    /// Find references by name
    pub fn references_for_name(&self, name: &str) -> Vec<&Reference> {
        self.references_by_name
            .get(name)
            .map(|positions| positions.iter().map(|p| &self.references[*p]).collect())
            .unwrap_or_default()
    }

    pub fn all_definitions(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter()
    }

    pub fn all_references(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter()
    }

    pub fn namespaces(&self) -> &[NamespaceRecord] {
        &self.namespaces
    }

    /// Dead definitions sorted by location
    pub fn dead_definitions(&self) -> Vec<&Definition> {
        let mut dead: Vec<&Definition> = self.definitions.iter().filter(|d| d.is_dead()).collect();
        dead.sort_by(|a, b| a.location.cmp(&b.location));
        dead
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    pub fn reference_count(&self) -> usize {
        self.references.len()
    }
}
