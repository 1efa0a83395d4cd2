use super::Index;
use crate::discovery::SourceFile;
use crate::error::ParseError;
use crate::indexer;
use crate::parser::RubyParser;
use crate::plugins::PluginSet;
use miette::Result;
use std::path::Path;
use tracing::{debug, warn};

/// Outcome of a scan: the finalized index plus every file that was skipped
#[derive(Debug)]
pub struct ScanResult {
    pub index: Index,
    pub parse_errors: Vec<ParseError>,
}

/// Sequential index builder
pub struct IndexBuilder<'p> {
    /// The index being built
    index: Index,

    parser: RubyParser,

    plugins: &'p PluginSet,

    /// Files that failed to parse and were skipped
    parse_errors: Vec<ParseError>,
}

impl<'p> IndexBuilder<'p> {
    pub fn new(plugins: &'p PluginSet) -> Self {
        Self {
            index: Index::new(),
            parser: RubyParser::new(),
            plugins,
            parse_errors: Vec::new(),
        }
    }

    /// Read and index a discovered file. Only I/O failures are returned as errors.
    pub fn process_file(&mut self, file: &SourceFile) -> Result<()> {
        let contents = file.read_contents()?;
        self.process_source(&file.path, &contents);
        Ok(())
    }

    /// Index one file's text; a file with syntax errors is recorded and skipped
    pub fn process_source(&mut self, path: &Path, source: &str) {
        debug!("Indexing Ruby file: {}", path.display());

        match indexer::index_source(&mut self.parser, self.plugins, path, source) {
            Ok(shard) => self.index.merge(shard),
            Err(error) => {
                warn!("{}", error);
                self.parse_errors.push(error);
            }
        }
    }

    /// Apply ancestor rules, finalize and hand back the result
    pub fn build(mut self) -> ScanResult {
        self.plugins.ignore_by_ancestors(&mut self.index);
        self.index.finalize();

        ScanResult {
            index: self.index,
            parse_errors: self.parse_errors,
        }
    }
}
