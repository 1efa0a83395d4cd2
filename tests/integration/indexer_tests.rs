//! Indexing and liveness tests
//!
//! These tests run whole files through the index builders and check which
//! definitions end up dead.

use rubydeadcode::discovery::SourceFile;
use rubydeadcode::{
    DefinitionKind, DefinitionStatus, IndexBuilder, ParallelIndexBuilder, PluginSet, ScanResult,
};
use std::path::{Path, PathBuf};

fn scan(plugins: &PluginSet, files: &[(&str, &str)]) -> ScanResult {
    let mut builder = IndexBuilder::new(plugins);
    for (path, source) in files {
        builder.process_source(Path::new(path), source);
    }
    builder.build()
}

fn dead_names(result: &ScanResult) -> Vec<String> {
    result
        .index
        .dead_definitions()
        .iter()
        .map(|d| d.full_name.clone())
        .collect()
}

#[test]
fn test_unreferenced_method_is_dead() {
    let plugins = PluginSet::new();
    let result = scan(&plugins, &[("foo.rb", "def foo; end\ndef bar\n  foo\nend\n")]);

    assert_eq!(dead_names(&result), vec!["bar"]);
    let foo = &result.index.definitions_for_name("foo")[0];
    assert_eq!(foo.status, DefinitionStatus::Alive);
}

#[test]
fn test_references_cross_files() {
    let plugins = PluginSet::intrinsic();
    let result = scan(
        &plugins,
        &[
            (
                "app/greeter.rb",
                "class Greeter\n  def initialize(name)\n    @name = name\n  end\n\n  def greet\n    \"hi\"\n  end\n\n  def shout; end\nend\n",
            ),
            ("bin/run.rb", "Greeter.new(\"bob\").greet\n"),
        ],
    );

    assert_eq!(dead_names(&result), vec!["Greeter#shout"]);

    let greeter = &result.index.definitions_for_name("Greeter")[0];
    assert_eq!(greeter.kind, DefinitionKind::Class);
    assert!(!greeter.is_dead());
    let initialize = &result.index.definitions_for_name("initialize")[0];
    assert_eq!(initialize.status, DefinitionStatus::Ignored);
}

#[test]
fn test_accessor_halves_live_separately() {
    let plugins = PluginSet::new();
    let result = scan(
        &plugins,
        &[("foo.rb", "class Foo\n  attr_accessor :x\nend\nFoo.new.x = 1\n")],
    );

    let writer = &result.index.definitions_for_name("x=")[0];
    assert_eq!(writer.kind, DefinitionKind::AttrWriter);
    assert!(!writer.is_dead());

    let reader = &result.index.definitions_for_name("x")[0];
    assert_eq!(reader.kind, DefinitionKind::AttrReader);
    assert!(reader.is_dead());

    // Both halves share the symbol's location
    assert_eq!(reader.location, writer.location);
}

#[test]
fn test_constants() {
    let plugins = PluginSet::new();
    let result = scan(&plugins, &[("foo.rb", "FOO = 1\nBAR = 2\nputs FOO\n")]);

    assert_eq!(dead_names(&result), vec!["BAR"]);
}

#[test]
fn test_same_name_keeps_every_definition_alive() {
    let plugins = PluginSet::new();
    let result = scan(
        &plugins,
        &[
            ("a.rb", "class A\n  def run; end\nend\n"),
            ("b.rb", "class B\n  def run; end\nend\n"),
            ("c.rb", "thing.run\n"),
        ],
    );

    let runs = result.index.definitions_for_name("run");
    assert_eq!(runs.len(), 2);
    assert!(runs.iter().all(|d| !d.is_dead()));
}

#[test]
fn test_file_with_syntax_errors_is_skipped() {
    let plugins = PluginSet::new();
    let result = scan(
        &plugins,
        &[("broken.rb", "def foo(\n"), ("ok.rb", "def bar; end\n")],
    );

    assert_eq!(result.parse_errors.len(), 1);
    assert_eq!(result.parse_errors[0].path, PathBuf::from("broken.rb"));
    assert_eq!(dead_names(&result), vec!["bar"]);
}

#[test]
fn test_dead_definitions_come_out_in_location_order() {
    let plugins = PluginSet::new();
    let result = scan(
        &plugins,
        &[
            ("b.rb", "def b2; end\ndef b1; end\n"),
            ("a.rb", "def a; end\n"),
        ],
    );

    assert_eq!(dead_names(&result), vec!["a", "b2", "b1"]);
}

#[test]
fn test_parallel_builder_matches_sequential() {
    let dir = tempfile::tempdir().unwrap();
    let sources = [
        ("a.rb", "class A\n  def used; end\n  def unused; end\nend\n"),
        ("b.rb", "A.new.used\nLIMIT = 3\n"),
        ("c.rb", "module Empty\nend\n"),
    ];

    let mut files = Vec::new();
    for (name, source) in sources {
        let path = dir.path().join(name);
        std::fs::write(&path, source).unwrap();
        files.push(SourceFile::new(path));
    }

    let plugins = PluginSet::intrinsic();

    let parallel = ParallelIndexBuilder::new(&plugins).build_from_files(&files);

    let mut builder = IndexBuilder::new(&plugins);
    for file in &files {
        builder.process_file(file).unwrap();
    }
    let sequential = builder.build();

    let short = |result: &ScanResult| -> Vec<String> {
        result
            .index
            .dead_definitions()
            .iter()
            .map(|d| d.name.clone())
            .collect()
    };
    assert_eq!(short(&parallel), vec!["unused", "LIMIT", "Empty"]);
    assert_eq!(short(&parallel), short(&sequential));
    assert_eq!(
        parallel.index.definition_count(),
        sequential.index.definition_count()
    );
}
