use crate::index::{DefinitionKind, Location};
use miette::Diagnostic;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A single syntax problem reported by the parser front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDiagnostic {
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number (1-indexed)
    pub column: usize,
    pub message: String,
}

impl fmt::Display for SyntaxDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// A file that could not be parsed; it is skipped and the scan continues
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("failed to parse {}: {}", .path.display(), summarize(.diagnostics))]
#[diagnostic(code(rubydeadcode::parse), severity(Warning))]
pub struct ParseError {
    pub path: PathBuf,
    pub diagnostics: Vec<SyntaxDiagnostic>,
}

fn summarize(diagnostics: &[SyntaxDiagnostic]) -> String {
    match diagnostics {
        [] => "unknown syntax error".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}

/// Failure of a single removal request. The source buffer is left untouched.
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum RemoveError {
    #[error("can't find {} at {location}", .kind.display_name())]
    #[diagnostic(
        code(rubydeadcode::remove::not_found),
        help("the file probably changed since the location was recorded; re-run the scan")
    )]
    NotFound {
        kind: DefinitionKind,
        location: Location,
    },

    #[error("expected {} at {location}, found `{found}`", .kind.display_name())]
    #[diagnostic(code(rubydeadcode::remove::kind_mismatch))]
    KindMismatch {
        kind: DefinitionKind,
        location: Location,
        found: String,
    },
}

/// A custom plugin file that could not be loaded
#[derive(Debug, Error, Diagnostic)]
#[error("can't load plugin {}: {reason}", .path.display())]
#[diagnostic(code(rubydeadcode::plugin_load))]
pub struct PluginLoadError {
    pub path: PathBuf,
    pub reason: String,
}

/// A serialized location that does not follow `file:line:col-line:col`
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
#[error("invalid location `{input}`: {reason}")]
#[diagnostic(
    code(rubydeadcode::location),
    help("locations look like `path/to/file.rb:3:5-7:8`")
)]
pub struct LocationParseError {
    pub input: String,
    pub reason: &'static str,
}
