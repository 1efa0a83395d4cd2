use super::{Index, NamespaceRecord};
use std::collections::{HashMap, HashSet};

/// Secondary name → ancestor lookup built from a fully populated [`Index`].
///
/// Superclass expressions are stored as written; they are resolved lazily
/// against every namespace known to the project, innermost enclosing
/// namespace first.
pub struct AncestorTable<'a> {
    records: HashMap<&'a str, Vec<&'a NamespaceRecord>>,
}

impl<'a> AncestorTable<'a> {
    pub fn new(index: &'a Index) -> Self {
        let mut records: HashMap<&'a str, Vec<&'a NamespaceRecord>> = HashMap::new();
        for record in index.namespaces() {
            records
                .entry(record.full_name.as_str())
                .or_default()
                .push(record);
        }
        Self { records }
    }

    /// Resolve a constant path written inside `nesting` to a known namespace
    pub fn resolve(&self, name: &str, nesting: &[String]) -> Option<&'a str> {
        if let Some(absolute) = name.strip_prefix("::") {
            return self.full_name(absolute);
        }

        nesting
            .iter()
            .rev()
            .find_map(|scope| self.full_name(&format!("{}::{}", scope, name)))
            .or_else(|| self.full_name(name))
    }

    /// Superclasses of `full_name`, nearest first.
    ///
    /// Resolved ancestors are reported by full name. The first ancestor that is
    /// not defined in the project (e.g. `ActiveRecord::Base`) is reported as
    /// written, without a leading `::`, and ends the chain.
    pub fn superclasses(&self, full_name: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut current = full_name.to_string();
        visited.insert(current.clone());

        while let Some(record) = self.superclass_record(&current) {
            let Some(superclass) = record.superclass.as_deref() else {
                break;
            };

            match self.resolve(superclass, &record.nesting) {
                Some(resolved) => {
                    if !visited.insert(resolved.to_string()) {
                        break;
                    }
                    chain.push(resolved.to_string());
                    current = resolved.to_string();
                }
                None => {
                    chain.push(superclass.trim_start_matches("::").to_string());
                    break;
                }
            }
        }

        chain
    }

    fn full_name(&self, name: &str) -> Option<&'a str> {
        self.records
            .get_key_value(name)
            .map(|(full_name, _)| *full_name)
    }

    // A class may be reopened many times; only one of them names the superclass.
    fn superclass_record(&self, full_name: &str) -> Option<&'a NamespaceRecord> {
        self.records
            .get(full_name)?
            .iter()
            .copied()
            .find(|record| record.superclass.is_some())
    }
}
