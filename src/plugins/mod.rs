//! Plugin protocol and the built-in plugins.
//!
//! A plugin suppresses false positives by marking definitions ignored or by
//! adding synthetic references. Most plugins are purely declarative: they
//! return an [`IgnoreRules`] set and never override a hook.

mod action_mailer;
mod action_mailer_preview;
mod action_pack;
mod active_job;
mod active_model;
mod active_record;
mod active_support;
mod constructors;
pub mod custom;
mod event;
mod graphql;
mod minitest;
mod namespaces;
mod rails;
mod rake;
pub mod registry;
mod rspec;
mod rubocop;
mod ruby;
mod rules;
mod sorbet;
mod thor;

pub use action_mailer::ActionMailerPlugin;
pub use action_mailer_preview::ActionMailerPreviewPlugin;
pub use action_pack::ActionPackPlugin;
pub use active_job::ActiveJobPlugin;
pub use active_model::ActiveModelPlugin;
pub use active_record::ActiveRecordPlugin;
pub use active_support::ActiveSupportPlugin;
pub use constructors::ConstructorsPlugin;
pub use custom::RulePlugin;
pub use event::{DefineEvent, EventScope, SendEvent};
pub use graphql::GraphqlPlugin;
pub use minitest::MinitestPlugin;
pub use namespaces::NamespacesPlugin;
pub use rails::RailsPlugin;
pub use rake::RakePlugin;
pub use rspec::RspecPlugin;
pub use rubocop::RubocopPlugin;
pub use ruby::RubyPlugin;
pub use rules::{IgnoreRules, IgnoreRulesBuilder, NameMatcher};
pub use sorbet::SorbetPlugin;
pub use thor::ThorPlugin;

use crate::index::{AncestorTable, DefinitionKind, Index};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use tracing::debug;

static NO_RULES: Lazy<IgnoreRules> = Lazy::new(IgnoreRules::default);

/// A unit of framework knowledge consulted while indexing.
///
/// Every hook runs after the definition or reference it describes has been
/// added, so a plugin can annotate but never prevent indexing.
pub trait Plugin: Send + Sync {
    /// Stable identifier, used for selection and deduplication
    fn id(&self) -> &str;

    /// Declarative rules, checked before every `on_define_*` hook
    fn rules(&self) -> &IgnoreRules {
        &NO_RULES
    }

    fn on_define_class(&self, _event: &mut DefineEvent<'_>) {}

    fn on_define_module(&self, _event: &mut DefineEvent<'_>) {}

    fn on_define_method(&self, _event: &mut DefineEvent<'_>) {}

    fn on_define_accessor(&self, _event: &mut DefineEvent<'_>) {}

    fn on_define_constant(&self, _event: &mut DefineEvent<'_>) {}

    fn on_send(&self, _event: &mut SendEvent<'_>) {}
}

/// Ordered set of installed plugins
#[derive(Default)]
pub struct PluginSet {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The plugins every project gets
    pub fn intrinsic() -> Self {
        let mut set = Self::new();
        set.add(Box::new(ConstructorsPlugin));
        set.add(Box::new(NamespacesPlugin));
        set.add(Box::new(RubyPlugin));
        set
    }

    /// Install a plugin; returns false if one with the same id is already installed
    pub fn add(&mut self, plugin: Box<dyn Plugin>) -> bool {
        if self.contains(plugin.id()) {
            debug!("Plugin {} already installed, skipping", plugin.id());
            return false;
        }
        self.plugins.push(plugin);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.plugins.iter().any(|p| p.id() == id)
    }

    /// Drop a plugin by id
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.plugins.len();
        self.plugins.retain(|p| p.id() != id);
        self.plugins.len() != before
    }

    pub fn ids(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn on_define_class(&self, event: &mut DefineEvent<'_>) {
        for plugin in &self.plugins {
            if plugin
                .rules()
                .ignores_class(event.name(), event.full_name(), event.superclass())
            {
                event.ignore();
            }
            plugin.on_define_class(event);
        }
    }

    pub fn on_define_module(&self, event: &mut DefineEvent<'_>) {
        for plugin in &self.plugins {
            if plugin.rules().ignores_module(event.name(), event.full_name()) {
                event.ignore();
            }
            plugin.on_define_module(event);
        }
    }

    pub fn on_define_method(&self, event: &mut DefineEvent<'_>) {
        for plugin in &self.plugins {
            if plugin.rules().ignores_method(event.name()) {
                event.ignore();
            }
            plugin.on_define_method(event);
        }
    }

    pub fn on_define_accessor(&self, event: &mut DefineEvent<'_>) {
        for plugin in &self.plugins {
            if plugin.rules().ignores_method(event.name()) {
                event.ignore();
            }
            plugin.on_define_accessor(event);
        }
    }

    pub fn on_define_constant(&self, event: &mut DefineEvent<'_>) {
        for plugin in &self.plugins {
            if plugin.rules().ignores_constant(event.name(), event.full_name()) {
                event.ignore();
            }
            plugin.on_define_constant(event);
        }
    }

    pub fn on_send(&self, event: &mut SendEvent<'_>) {
        for plugin in &self.plugins {
            plugin.on_send(event);
        }
    }

    /// Apply `ignore_classes_inheriting_from` rules through the whole,
    /// project-wide superclass chain. Runs once, right before `finalize`.
    pub fn ignore_by_ancestors(&self, index: &mut Index) {
        let rules: Vec<&IgnoreRules> = self
            .plugins
            .iter()
            .map(|p| p.rules())
            .filter(|r| r.has_superclass_rules())
            .collect();
        if rules.is_empty() {
            return;
        }

        let table = AncestorTable::new(index);
        let mut checked: HashSet<&str> = HashSet::new();
        let mut ignored_names: HashSet<String> = HashSet::new();

        for record in index.namespaces() {
            if !checked.insert(record.full_name.as_str()) {
                continue;
            }
            let ancestors = table.superclasses(&record.full_name);
            if ancestors
                .iter()
                .any(|ancestor| rules.iter().any(|r| r.ignores_superclass(ancestor)))
            {
                ignored_names.insert(record.full_name.clone());
            }
        }

        let ids: Vec<_> = index
            .namespaces()
            .iter()
            .filter(|record| ignored_names.contains(&record.full_name))
            .map(|record| record.definition)
            .collect();

        for id in ids {
            if let Some(definition) = index.definition_mut(id) {
                if definition.kind == DefinitionKind::Class && !definition.is_ignored() {
                    debug!("Ignoring {} by ancestry", definition.full_name);
                    definition.ignore();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Definition, Location};
    use std::path::{Path, PathBuf};

    struct Named(&'static str);

    impl Plugin for Named {
        fn id(&self) -> &str {
            self.0
        }
    }

    struct IgnoreEverything;

    impl Plugin for IgnoreEverything {
        fn id(&self) -> &str {
            "ignore_everything"
        }

        fn on_define_method(&self, event: &mut DefineEvent<'_>) {
            event.ignore();
            let location = event.location().clone();
            event.reference_method("synthetic", location);
        }
    }

    fn method(name: &str) -> Definition {
        Definition::new(
            DefinitionKind::Method,
            name.to_string(),
            name.to_string(),
            Location::new(PathBuf::from("foo.rb"), 1, 1, 1, 10),
        )
    }

    #[test]
    fn test_duplicate_ids_are_dropped() {
        let mut set = PluginSet::new();
        assert!(set.add(Box::new(Named("a"))));
        assert!(set.add(Box::new(Named("b"))));
        assert!(!set.add(Box::new(Named("a"))));
        assert_eq!(set.ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_intrinsic_plugins() {
        let set = PluginSet::intrinsic();
        assert_eq!(set.ids(), vec!["constructors", "namespaces", "ruby"]);
    }

    #[test]
    fn test_rules_then_hooks() {
        let mut set = PluginSet::new();
        set.add(Box::new(ConstructorsPlugin));
        set.add(Box::new(IgnoreEverything));

        let mut definition = method("initialize");
        let mut references = Vec::new();
        let scope = EventScope::default();
        let mut event = DefineEvent::new(&mut definition, &mut references, Path::new("foo.rb"), &scope);
        set.on_define_method(&mut event);

        assert!(definition.is_ignored());
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].name, "synthetic");
    }

    #[test]
    fn test_ignore_by_transitive_ancestors() {
        let mut index = Index::new();
        let class = |name: &str| {
            Definition::new(
                DefinitionKind::Class,
                name.to_string(),
                name.to_string(),
                Location::new(PathBuf::from("foo.rb"), 1, 1, 2, 4),
            )
        };
        let base = index.define_namespace(
            class("ApplicationPreview"),
            Some("ActionMailer::Preview".to_string()),
            Vec::new(),
        );
        let child = index.define_namespace(
            class("UserPreview"),
            Some("ApplicationPreview".to_string()),
            Vec::new(),
        );
        let other = index.define_namespace(class("Other"), None, Vec::new());

        let mut set = PluginSet::new();
        set.add(Box::new(ActionMailerPreviewPlugin));
        set.ignore_by_ancestors(&mut index);

        assert!(index.definition(base).unwrap().is_ignored());
        assert!(index.definition(child).unwrap().is_ignored());
        assert!(index.definition(other).unwrap().is_dead());
    }
}
