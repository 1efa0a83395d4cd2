use crate::config::{is_excluded, Config};
use ignore::WalkBuilder;
use miette::{IntoDiagnostic, Result, WrapErr};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Type of Ruby source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    /// `*.rb`
    Ruby,
    /// `*.rake` and `Rakefile`
    Rake,
    /// `*.gemspec`, `Gemfile`
    Gem,
    /// `config.ru` and other Rack files
    Rack,
}

impl FileType {
    /// Determine file type from path
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        match file_name {
            "Rakefile" => return Some(FileType::Rake),
            "Gemfile" => return Some(FileType::Gem),
            _ => {}
        }

        match path.extension()?.to_str()? {
            "rb" => Some(FileType::Ruby),
            "rake" => Some(FileType::Rake),
            "gemspec" => Some(FileType::Gem),
            "ru" => Some(FileType::Rack),
            _ => None,
        }
    }
}

/// Represents a discovered source file
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Path to the file
    pub path: PathBuf,

    pub file_type: FileType,
}

impl SourceFile {
    /// File type is inferred from the path, defaulting to plain Ruby
    pub fn new(path: PathBuf) -> Self {
        let file_type = FileType::from_path(&path).unwrap_or(FileType::Ruby);
        Self { path, file_type }
    }

    /// Read the current contents from disk
    pub fn read_contents(&self) -> Result<String> {
        std::fs::read_to_string(&self.path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read {}", self.path.display()))
    }
}

/// File finder for discovering Ruby sources in a project
pub struct FileFinder<'a> {
    config: &'a Config,
}

impl<'a> FileFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Find all Ruby source files under the configured targets
    pub fn find_files(&self, root: &Path) -> Result<Vec<SourceFile>> {
        debug!("Scanning for files in: {}", root.display());
        let exclude = self.config.exclude_patterns()?;

        let targets = if self.config.targets.is_empty() {
            vec![root.to_path_buf()]
        } else {
            self.config.targets.iter().map(|t| root.join(t)).collect()
        };

        let mut files: Vec<SourceFile> = targets
            .par_iter()
            .flat_map(|target| self.scan_directory(root, target, &exclude))
            .collect();

        // Overlapping targets would otherwise index a file twice
        files.sort_by(|a, b| a.path.cmp(&b.path));
        files.dedup_by(|a, b| a.path == b.path);

        debug!("Found {} files", files.len());
        Ok(files)
    }

    /// Scan a single directory for source files
    fn scan_directory(&self, root: &Path, dir: &Path, exclude: &[glob::Pattern]) -> Vec<SourceFile> {
        if !dir.exists() {
            trace!("Directory does not exist: {}", dir.display());
            return Vec::new();
        }

        let walker = WalkBuilder::new(dir)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .parents(true)
            .follow_links(false)
            .build();

        walker
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let path = entry.path();
                let relative = path.strip_prefix(root).unwrap_or(path);

                if is_excluded(exclude, relative) {
                    trace!("Excluding: {}", path.display());
                    return None;
                }

                let file_type = FileType::from_path(path)?;
                trace!("Found {:?}: {}", file_type, path.display());
                Some(SourceFile {
                    path: path.to_path_buf(),
                    file_type,
                })
            })
            .collect()
    }
}
