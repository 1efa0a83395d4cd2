use super::findings;
use crate::index::{DefinitionStatus, ScanResult};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

/// JSON reporter for programmatic output
pub struct JsonReporter {
    output_path: Option<PathBuf>,
    show_ignored: bool,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>, show_ignored: bool) -> Self {
        Self {
            output_path,
            show_ignored,
        }
    }

    pub fn report(&self, result: &ScanResult) -> Result<()> {
        let json = self.render(result)?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            println!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }

    pub fn render(&self, result: &ScanResult) -> Result<String> {
        let report = JsonReport::from_scan(result, self.show_ignored);
        serde_json::to_string_pretty(&report).into_diagnostic()
    }
}

#[derive(Serialize)]
struct JsonReport {
    version: &'static str,
    total_definitions: usize,
    total_references: usize,
    dead_count: usize,
    definitions: Vec<JsonDefinition>,
    parse_errors: Vec<JsonParseError>,
}

#[derive(Serialize)]
struct JsonDefinition {
    kind: &'static str,
    name: String,
    full_name: String,
    /// Serialized location, accepted by `rubydeadcode remove`
    location: String,
    file: String,
    line: usize,
    column: usize,
    status: DefinitionStatus,
}

#[derive(Serialize)]
struct JsonParseError {
    file: String,
    diagnostics: Vec<JsonDiagnostic>,
}

#[derive(Serialize)]
struct JsonDiagnostic {
    line: usize,
    column: usize,
    message: String,
}

impl JsonReport {
    fn from_scan(result: &ScanResult, show_ignored: bool) -> Self {
        let definitions: Vec<JsonDefinition> = findings(&result.index, show_ignored)
            .into_iter()
            .map(|d| JsonDefinition {
                kind: d.kind.display_name(),
                name: d.name.clone(),
                full_name: d.full_name.clone(),
                location: d.location.to_string(),
                file: d.location.file.to_string_lossy().to_string(),
                line: d.location.start_line,
                column: d.location.start_column,
                status: d.status,
            })
            .collect();

        let parse_errors = result
            .parse_errors
            .iter()
            .map(|error| JsonParseError {
                file: error.path.to_string_lossy().to_string(),
                diagnostics: error
                    .diagnostics
                    .iter()
                    .map(|d| JsonDiagnostic {
                        line: d.line,
                        column: d.column,
                        message: d.message.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            version: "1.0",
            total_definitions: result.index.definition_count(),
            total_references: result.index.reference_count(),
            dead_count: definitions
                .iter()
                .filter(|d| d.status == DefinitionStatus::Dead)
                .count(),
            definitions,
            parse_errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexBuilder;
    use crate::plugins::PluginSet;
    use std::path::Path;

    #[test]
    fn test_render_dead_definitions() {
        let plugins = PluginSet::intrinsic();
        let mut builder = IndexBuilder::new(&plugins);
        builder.process_source(Path::new("foo.rb"), "def foo; end\ndef bar\n  foo\nend\n");
        builder.process_source(Path::new("broken.rb"), "def oops(\n");
        let result = builder.build();

        let json = JsonReporter::new(None, false).render(&result).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["dead_count"], 1);
        assert_eq!(value["definitions"][0]["name"], "bar");
        assert_eq!(value["definitions"][0]["kind"], "method");
        assert_eq!(value["definitions"][0]["status"], "dead");
        assert_eq!(value["definitions"][0]["location"], "foo.rb:2:1-4:4");
        assert_eq!(value["parse_errors"][0]["file"], "broken.rb");
    }
}
