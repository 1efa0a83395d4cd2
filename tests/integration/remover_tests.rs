//! Removal tests
//!
//! Every request is addressed by the location the indexer recorded, the same
//! way the CLI feeds scan results back into the remover.

use pretty_assertions::assert_eq;
use rubydeadcode::indexer::index_source;
use rubydeadcode::parser::RubyParser;
use rubydeadcode::{DefinitionKind, Location, PluginSet, RemoveError, Remover};
use std::path::Path;

fn location_of(source: &str, name: &str, kind: DefinitionKind) -> Location {
    let plugins = PluginSet::new();
    let index = index_source(&mut RubyParser::new(), &plugins, Path::new("foo.rb"), source).unwrap();
    index
        .definitions_for_name(name)
        .into_iter()
        .find(|d| d.kind == kind)
        .unwrap_or_else(|| panic!("no {} named {}", kind, name))
        .location
        .clone()
}

fn remove(source: &str, name: &str, kind: DefinitionKind) -> String {
    let location = location_of(source, name, kind);
    Remover::new().remove(kind, &location, source).unwrap()
}

/// Remove and check the rewritten source still parses
fn remove_valid(source: &str, name: &str, kind: DefinitionKind) -> String {
    let rewritten = remove(source, name, kind);
    assert!(
        RubyParser::new().parse(Path::new("foo.rb"), &rewritten).is_ok(),
        "not valid Ruby:\n{}",
        rewritten
    );
    rewritten
}

// ============================================================================
// Constants
// ============================================================================

#[test]
fn test_remove_middle_target_of_multiple_assignment() {
    assert_eq!(
        remove("FOO, BAR, BAZ = 42\n", "BAR", DefinitionKind::Constant),
        "FOO, BAZ = 42\n"
    );
}

#[test]
fn test_remove_first_and_last_targets() {
    let source = "FOO, BAR, BAZ = 42\n";
    assert_eq!(remove(source, "FOO", DefinitionKind::Constant), "BAR, BAZ = 42\n");
    assert_eq!(remove(source, "BAZ", DefinitionKind::Constant), "FOO, BAR = 42\n");
}

#[test]
fn test_remove_from_parenthesized_targets() {
    let source = "(FOO, BAR) = 42\n";
    assert_eq!(remove_valid(source, "FOO", DefinitionKind::Constant), "BAR = 42\n");
    assert_eq!(remove_valid(source, "BAR", DefinitionKind::Constant), "FOO = 42\n");

    assert_eq!(
        remove_valid("(A, B, C) = 1\n", "B", DefinitionKind::Constant),
        "(A, C) = 1\n"
    );
}

#[test]
fn test_remove_from_nested_group() {
    let source = "(A, B), C = 1\n";
    assert_eq!(remove_valid(source, "A", DefinitionKind::Constant), "B, C = 1\n");
    assert_eq!(remove_valid(source, "C", DefinitionKind::Constant), "(A, B) = 1\n");
}

#[test]
fn test_remove_constant_with_comment() {
    let source = "module Limits\n  # Max retries\n  MAX = 3\n\n  MIN = 1\nend\n";
    assert_eq!(
        remove(source, "MAX", DefinitionKind::Constant),
        "module Limits\n  MIN = 1\nend\n"
    );
}

// ============================================================================
// Accessors
// ============================================================================

#[test]
fn test_remove_writer_half_of_accessor() {
    assert_eq!(
        remove("class Foo\n  attr_accessor :x\nend\n", "x=", DefinitionKind::AttrWriter),
        "class Foo\n  attr_reader :x\nend\n"
    );
}

#[test]
fn test_remove_reader_half_rewrites_sig() {
    let source = "class Foo\n  sig { returns(Integer) }\n  attr_accessor :count\nend\n";
    assert_eq!(
        remove(source, "count", DefinitionKind::AttrReader),
        "class Foo\n  sig { params(count: Integer).returns(Integer) }\n  attr_writer :count\nend\n"
    );
}

#[test]
fn test_remove_one_of_grouped_readers() {
    let source = "class Foo\n  attr_reader :a, :b, :c\nend\n";
    assert_eq!(
        remove(source, "b", DefinitionKind::AttrReader),
        "class Foo\n  attr_reader :a, :c\nend\n"
    );
    assert_eq!(
        remove(source, "a", DefinitionKind::AttrReader),
        "class Foo\n  attr_reader :b, :c\nend\n"
    );
}

#[test]
fn test_remove_only_reader_removes_statement() {
    let source = "class Foo\n  attr_reader :a\n\n  def b; end\nend\n";
    assert_eq!(
        remove(source, "a", DefinitionKind::AttrReader),
        "class Foo\n  def b; end\nend\n"
    );
}

#[test]
fn test_split_grouped_accessor_keeps_other_half() {
    let source = "class Foo\n  sig { returns(Integer) }\n  attr_accessor :a, :b\nend\n";
    assert_eq!(
        remove(source, "b=", DefinitionKind::AttrWriter),
        "class Foo\n  sig { returns(Integer) }\n  attr_accessor :a\n  sig { returns(Integer) }\n  attr_reader :b\nend\n"
    );
}

#[test]
fn test_split_keeps_visibility_modifier() {
    let source = "class Foo\n  private attr_accessor :a, :b\nend\n";
    assert_eq!(
        remove(source, "a", DefinitionKind::AttrReader),
        "class Foo\n  private attr_accessor :b\n  private attr_writer :a\nend\n"
    );
}

// ============================================================================
// Methods and namespaces
// ============================================================================

#[test]
fn test_collapse_emptied_singleton_class() {
    let source = "class Foo\n  class << self\n    def bar; end\n  end\nend\n";
    assert_eq!(remove(source, "bar", DefinitionKind::Method), "class Foo\nend\n");
}

#[test]
fn test_collapse_singleton_class_holding_sig_extension() {
    let source = "class Foo\n  class << self\n    extend T::Sig\n\n    sig { void }\n    def bar; end\n  end\nend\n";
    assert_eq!(remove_valid(source, "bar", DefinitionKind::Method), "class Foo\nend\n");
}

#[test]
fn test_singleton_class_with_other_members_stays() {
    let source = "class Foo\n  class << self\n    def bar; end\n\n    def baz; end\n  end\nend\n";
    assert_eq!(
        remove(source, "bar", DefinitionKind::Method),
        "class Foo\n  class << self\n    def baz; end\n  end\nend\n"
    );
}

#[test]
fn test_first_member_takes_comment_and_sig() {
    let source = "class Foo\n  # Says hi\n  sig { void }\n  def hi; end\n\n  def bye; end\nend\n";
    assert_eq!(
        remove(source, "hi", DefinitionKind::Method),
        "class Foo\n  def bye; end\nend\n"
    );
}

#[test]
fn test_last_member_takes_preceding_blank_line() {
    let source = "class Foo\n  # Says hi\n  sig { void }\n  def hi; end\n\n  def bye; end\nend\n";
    assert_eq!(
        remove(source, "bye", DefinitionKind::Method),
        "class Foo\n  # Says hi\n  sig { void }\n  def hi; end\nend\n"
    );
}

#[test]
fn test_only_one_blank_line_goes_with_last_member() {
    let source = "class Foo\n  def a; end\n\n\n  def b; end\nend\n";
    assert_eq!(
        remove_valid(source, "b", DefinitionKind::Method),
        "class Foo\n  def a; end\n\nend\n"
    );
}

#[test]
fn test_only_one_blank_line_goes_with_middle_member() {
    let source = "def a; end\n\n\ndef b; end\n\n\ndef c; end\n";
    assert_eq!(
        remove_valid(source, "b", DefinitionKind::Method),
        "def a; end\n\n\n\ndef c; end\n"
    );
}

#[test]
fn test_remove_private_method() {
    let source = "class Foo\n  def a; end\n\n  private def b; end\nend\n";
    assert_eq!(
        remove(source, "b", DefinitionKind::Method),
        "class Foo\n  def a; end\nend\n"
    );
}

#[test]
fn test_remove_class() {
    let source = "class Unused\nend\n\nclass Used\nend\n";
    assert_eq!(
        remove(source, "Unused", DefinitionKind::Class),
        "class Used\nend\n"
    );
}

#[test]
fn test_remove_module_between_siblings() {
    let source = "A = 1\n\nmodule Helpers\n  def self.x; end\nend\n\nB = 2\n";
    assert_eq!(
        remove(source, "Helpers", DefinitionKind::Module),
        "A = 1\n\nB = 2\n"
    );
}

// ============================================================================
// Failed requests
// ============================================================================

#[test]
fn test_stale_location_is_not_found() {
    let source = "def a; end\ndef bb; end\n";
    let location = location_of(source, "a", DefinitionKind::Method);

    let mut remover = Remover::new();
    let rewritten = remover.remove(DefinitionKind::Method, &location, source).unwrap();
    assert_eq!(rewritten, "def bb; end\n");

    let again = remover.remove(DefinitionKind::Method, &location, &rewritten);
    assert!(matches!(again, Err(RemoveError::NotFound { .. })));
}

#[test]
fn test_wrong_kind_is_rejected() {
    let source = "def foo; end\n";
    let location = location_of(source, "foo", DefinitionKind::Method);

    let error = Remover::new()
        .remove(DefinitionKind::Class, &location, source)
        .unwrap_err();
    assert!(matches!(error, RemoveError::KindMismatch { .. }));
    assert!(error.to_string().contains("expected class"));
}
