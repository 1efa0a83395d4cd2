//! Plugin tests
//!
//! These tests check that framework conventions keep entry points out of the
//! dead code report, and that plugin selection follows the project setup.

use rubydeadcode::config::PluginConfig;
use rubydeadcode::plugins::{
    registry, ActionPackPlugin, ActiveRecordPlugin, IgnoreRules, RulePlugin, SorbetPlugin,
};
use rubydeadcode::{DefinitionStatus, IndexBuilder, Manifest, Plugin, PluginSet, ScanResult};
use std::path::Path;

fn scan(plugins: &PluginSet, source: &str) -> ScanResult {
    let mut builder = IndexBuilder::new(plugins);
    builder.process_source(Path::new("app/foo.rb"), source);
    builder.build()
}

fn status(result: &ScanResult, name: &str) -> DefinitionStatus {
    result.index.definitions_for_name(name)[0].status
}

fn set_of(plugins: Vec<Box<dyn Plugin>>) -> PluginSet {
    let mut set = PluginSet::new();
    for plugin in plugins {
        set.add(plugin);
    }
    set
}

#[test]
fn test_controller_is_ignored_without_references() {
    let plugins = set_of(vec![Box::new(ActionPackPlugin)]);
    let result = scan(&plugins, "class FooController\nend\n");

    assert_eq!(status(&result, "FooController"), DefinitionStatus::Ignored);
    assert!(result.index.dead_definitions().is_empty());
}

#[test]
fn test_controller_actions_and_callbacks() {
    let plugins = set_of(vec![Box::new(ActionPackPlugin)]);
    let result = scan(
        &plugins,
        "class UsersController < ApplicationController\n  before_action :load_user, if: :signed_in?\n\n  def show; end\n\n  private\n\n  def load_user; end\nend\n\nclass Helper\n  def signed_in?; end\n  def unused; end\nend\n",
    );

    assert_eq!(status(&result, "show"), DefinitionStatus::Ignored);
    assert_eq!(status(&result, "load_user"), DefinitionStatus::Ignored);
    assert_eq!(status(&result, "signed_in?"), DefinitionStatus::Alive);
    assert_eq!(status(&result, "unused"), DefinitionStatus::Dead);
}

#[test]
fn test_model_callbacks_reference_methods() {
    let plugins = set_of(vec![Box::new(ActiveRecordPlugin)]);
    let result = scan(
        &plugins,
        "class User < ApplicationRecord\n  before_save :normalize_email\n\n  private\n\n  def normalize_email; end\n  def stale; end\nend\n",
    );

    assert_eq!(status(&result, "normalize_email"), DefinitionStatus::Alive);
    assert_eq!(status(&result, "stale"), DefinitionStatus::Dead);
}

#[test]
fn test_migrations_are_ignored_through_ancestors() {
    let plugins = set_of(vec![Box::new(ActiveRecordPlugin)]);
    let mut builder = IndexBuilder::new(&plugins);
    builder.process_source(
        Path::new("db/base_migration.rb"),
        "class BaseMigration < ActiveRecord::Migration[7.1]\nend\n",
    );
    builder.process_source(
        Path::new("db/migrate/001_create_users.rb"),
        "class CreateUsers < BaseMigration\nend\n",
    );
    let result = builder.build();

    assert_eq!(status(&result, "CreateUsers"), DefinitionStatus::Ignored);
}

#[test]
fn test_sorbet_enum_values_and_overrides() {
    let plugins = set_of(vec![Box::new(SorbetPlugin)]);
    let result = scan(
        &plugins,
        "class Suit < T::Enum\n  enums do\n    Hearts = new\n  end\nend\n\nclass Card\n  extend T::Sig\n\n  sig { override.returns(String) }\n  def to_str; end\n\n  sig { returns(String) }\n  def rank; end\nend\n",
    );

    assert_eq!(status(&result, "Hearts"), DefinitionStatus::Ignored);
    assert_eq!(status(&result, "to_str"), DefinitionStatus::Ignored);
    assert_eq!(status(&result, "rank"), DefinitionStatus::Dead);
}

#[test]
fn test_later_plugin_cannot_revive_ignored_definition() {
    let rules = IgnoreRules::builder().ignore_methods_named(["legacy"]).build();
    let plugins = set_of(vec![Box::new(RulePlugin::new("keep_legacy", rules))]);
    let result = scan(&plugins, "def legacy; end\nlegacy\n");

    assert_eq!(status(&result, "legacy"), DefinitionStatus::Ignored);
}

#[test]
fn test_selection_from_manifest() {
    let manifest = Manifest::parse(
        "GEM\n  remote: https://rubygems.org/\n  specs:\n    actionpack (7.1.0)\n      rack (>= 2.2)\n    thor (1.3.0)\n\nPLATFORMS\n  ruby\n\nDEPENDENCIES\n  actionpack\n  thor\n",
    );
    let set = registry::select(&PluginConfig::default(), Some(&manifest), Vec::new());

    assert_eq!(
        set.ids(),
        vec!["constructors", "namespaces", "ruby", "action_pack", "thor"]
    );
}

#[test]
fn test_enable_disable_and_custom_plugins() {
    let config = PluginConfig {
        enable: vec!["rspec".to_string()],
        disable: vec!["ruby".to_string()],
        ..PluginConfig::default()
    };
    let custom = vec![
        RulePlugin::new("custom:billing", IgnoreRules::default()),
        // Clashes with a built-in plugin
        RulePlugin::new("rspec", IgnoreRules::default()),
    ];
    let set = registry::select(&config, None, custom);

    assert_eq!(
        set.ids(),
        vec!["constructors", "namespaces", "rspec", "custom:billing"]
    );
}

#[test]
fn test_load_reads_lockfile_and_plugin_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("Gemfile.lock"),
        "GEM\n  specs:\n    sorbet-runtime (0.5.11)\n",
    )
    .unwrap();
    let plugin_dir = dir.path().join(".deadcode/plugins");
    std::fs::create_dir_all(&plugin_dir).unwrap();
    std::fs::write(
        plugin_dir.join("handlers.yml"),
        "ignore_methods_named: [\"/^handle_/\"]\n",
    )
    .unwrap();

    let plugins = registry::load(&PluginConfig::default(), dir.path()).unwrap();
    assert!(plugins.contains("sorbet"));
    assert!(plugins.contains("custom:handlers"));

    let result = scan(&plugins, "def handle_refund; end\ndef refund; end\n");
    assert_eq!(status(&result, "handle_refund"), DefinitionStatus::Ignored);
    assert_eq!(status(&result, "refund"), DefinitionStatus::Dead);
}

#[test]
fn test_load_without_manifest() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Gemfile.lock"), "GEM\n  specs:\n    thor (1.3.0)\n").unwrap();

    let config = PluginConfig {
        use_manifest: false,
        ..PluginConfig::default()
    };
    let plugins = registry::load(&config, dir.path()).unwrap();

    assert_eq!(plugins.ids(), vec!["constructors", "namespaces", "ruby"]);
}

#[test]
fn test_invalid_rule_file_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let plugin_dir = dir.path().join(".deadcode/plugins");
    std::fs::create_dir_all(&plugin_dir).unwrap();
    std::fs::write(plugin_dir.join("bad.yml"), "ignore_everything: true\n").unwrap();

    assert!(registry::load(&PluginConfig::default(), dir.path()).is_err());
}
