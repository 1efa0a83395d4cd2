// Parallel index builder using rayon

use super::{Index, ScanResult};
use crate::discovery::SourceFile;
use crate::error::ParseError;
use crate::indexer;
use crate::parser::RubyParser;
use crate::plugins::PluginSet;
use rayon::prelude::*;
use tracing::{debug, info, warn};

enum FileOutcome {
    Indexed(Index),
    Failed(ParseError),
    Unreadable,
}

/// Index builder that gives every file its own shard and merges them once
/// all workers are done
pub struct ParallelIndexBuilder<'p> {
    plugins: &'p PluginSet,
}

impl<'p> ParallelIndexBuilder<'p> {
    pub fn new(plugins: &'p PluginSet) -> Self {
        Self { plugins }
    }

    /// Index every file in parallel and finalize the merged result
    pub fn build_from_files(&self, files: &[SourceFile]) -> ScanResult {
        info!("Indexing {} files in parallel...", files.len());

        let outcomes: Vec<FileOutcome> = files
            .par_iter()
            .map_init(RubyParser::new, |parser, file| self.index_file(parser, file))
            .collect();

        // Merge in discovery order so ids are stable across runs
        let mut index = Index::new();
        let mut parse_errors = Vec::new();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Indexed(shard) => index.merge(shard),
                FileOutcome::Failed(error) => parse_errors.push(error),
                FileOutcome::Unreadable => {}
            }
        }

        info!(
            "Indexed {} definitions, {} references",
            index.definition_count(),
            index.reference_count()
        );

        self.plugins.ignore_by_ancestors(&mut index);
        index.finalize();

        ScanResult {
            index,
            parse_errors,
        }
    }

    fn index_file(&self, parser: &mut RubyParser, file: &SourceFile) -> FileOutcome {
        let contents = match file.read_contents() {
            Ok(contents) => contents,
            Err(e) => {
                debug!("Read error (continuing): {}", e);
                return FileOutcome::Unreadable;
            }
        };

        match indexer::index_source(parser, self.plugins, &file.path, &contents) {
            Ok(shard) => FileOutcome::Indexed(shard),
            Err(error) => {
                warn!("{}", error);
                FileOutcome::Failed(error)
            }
        }
    }
}
