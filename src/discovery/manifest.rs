use miette::{IntoDiagnostic, Result, WrapErr};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Gems a project depends on, read from `Gemfile.lock`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    gems: BTreeSet<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Specs,
    Dependencies,
    Other,
}

impl Manifest {
    pub fn from_lockfile(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read manifest: {}", path.display()))?;
        let manifest = Self::parse(&contents);
        debug!("{} gems listed in {}", manifest.gems.len(), path.display());
        Ok(manifest)
    }

    /// Collect gem names from the `specs:` blocks and the `DEPENDENCIES`
    /// section. Unknown sections are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut gems = BTreeSet::new();
        let mut section = Section::Other;

        for line in contents.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let indent = line.len() - line.trim_start().len();
            let text = line.trim();

            if indent == 0 {
                section = if text == "DEPENDENCIES" {
                    Section::Dependencies
                } else {
                    Section::Other
                };
                continue;
            }
            if indent == 2 && text == "specs:" {
                section = Section::Specs;
                continue;
            }

            let is_entry = match section {
                // Nested lines are a gem's own dependencies
                Section::Specs => indent == 4,
                Section::Dependencies => indent == 2,
                Section::Other => false,
            };
            if is_entry {
                if let Some(name) = gem_name(text) {
                    gems.insert(name.to_string());
                }
            }
        }

        Self { gems }
    }

    pub fn contains(&self, gem: &str) -> bool {
        self.gems.contains(gem)
    }

    pub fn gems(&self) -> impl Iterator<Item = &str> {
        self.gems.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.gems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gems.is_empty()
    }
}

// `rails (7.1.2)`, `sorbet-runtime!`, `rake (~> 13.0)`
fn gem_name(entry: &str) -> Option<&str> {
    let name = entry
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()?
        .trim_end_matches('!');
    (!name.is_empty()).then_some(name)
}
