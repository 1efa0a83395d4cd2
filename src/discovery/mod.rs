//! Locating Ruby sources and the project's dependency manifest

mod file_finder;
mod manifest;

pub use file_finder::{FileFinder, FileType, SourceFile};
pub use manifest::Manifest;
