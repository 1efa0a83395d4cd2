use super::common::node_text;
use crate::error::{ParseError, SyntaxDiagnostic};
use std::path::Path;
use tree_sitter::{Node, Parser as TsParser, Tree};

const MAX_SNIPPET: usize = 32;

/// Ruby front end backed by tree-sitter-ruby
pub struct RubyParser {
    parser: TsParser,
}

impl RubyParser {
    pub fn new() -> Self {
        let mut parser = TsParser::new();
        parser
            .set_language(&tree_sitter_ruby::LANGUAGE.into())
            .expect("Failed to load Ruby grammar");
        Self { parser }
    }

    /// Parse a file, failing with the list of syntax problems if the tree has any
    pub fn parse(&mut self, path: &Path, source: &str) -> Result<Tree, ParseError> {
        let Some(tree) = self.parse_tree(source) else {
            return Err(ParseError {
                path: path.to_path_buf(),
                diagnostics: vec![SyntaxDiagnostic {
                    line: 1,
                    column: 1,
                    message: "parser gave up".to_string(),
                }],
            });
        };

        let root = tree.root_node();
        if root.has_error() {
            let mut diagnostics = Vec::new();
            collect_diagnostics(root, source, &mut diagnostics);
            return Err(ParseError {
                path: path.to_path_buf(),
                diagnostics,
            });
        }

        Ok(tree)
    }

    /// Parse without checking for syntax errors
    pub fn parse_tree(&mut self, source: &str) -> Option<Tree> {
        self.parser.parse(source, None)
    }
}

impl Default for RubyParser {
    fn default() -> Self {
        Self::new()
    }
}

// Only the outermost ERROR/MISSING nodes are reported; their contents are noise.
fn collect_diagnostics(node: Node, source: &str, diagnostics: &mut Vec<SyntaxDiagnostic>) {
    let position = node.start_position();

    if node.is_missing() {
        diagnostics.push(SyntaxDiagnostic {
            line: position.row + 1,
            column: position.column + 1,
            message: format!("missing `{}`", node.kind()),
        });
        return;
    }

    if node.is_error() {
        diagnostics.push(SyntaxDiagnostic {
            line: position.row + 1,
            column: position.column + 1,
            message: format!("unexpected `{}`", snippet(node_text(node, source))),
        });
        return;
    }

    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_diagnostics(child, source, diagnostics);
    }
}

fn snippet(text: &str) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() > MAX_SNIPPET {
        let truncated: String = line.chars().take(MAX_SNIPPET).collect();
        format!("{}...", truncated)
    } else {
        line.to_string()
    }
}
