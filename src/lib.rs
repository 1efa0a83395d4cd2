//! rubydeadcode - dead code detection and safe removal for Ruby/Sorbet
//!
//! This library finds classes, modules, methods, attribute accessors and
//! constants that are never referenced, and rewrites source files to drop
//! them.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! 1. **File Discovery** - Find all Ruby sources under the configured targets
//! 2. **Parsing** - Parse each file with tree-sitter
//! 3. **Indexing** - Record definitions and references per file
//! 4. **Plugins** - Exempt framework entry points and add synthetic references
//! 5. **Finalization** - Resolve references by name and mark the dead definitions
//! 6. **Reporting** - Print the findings, or remove one of them

pub mod config;
pub mod discovery;
pub mod error;
pub mod index;
pub mod indexer;
pub mod parser;
pub mod plugins;
pub mod remover;
pub mod report;

pub use config::Config;
pub use discovery::{FileFinder, Manifest, SourceFile};
pub use error::{ParseError, RemoveError};
pub use index::{
    Definition, DefinitionKind, DefinitionStatus, Index, IndexBuilder, Location,
    ParallelIndexBuilder, ScanResult,
};
pub use plugins::{Plugin, PluginSet};
pub use remover::Remover;
pub use report::{ReportFormat, Reporter};
