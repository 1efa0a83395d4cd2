use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration for a dead-code scan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories to scan, relative to the project root (empty = whole project)
    pub targets: Vec<PathBuf>,

    /// Glob patterns, matched against paths relative to the project root
    pub exclude: Vec<String>,

    /// Plugin selection
    pub plugins: PluginConfig,

    /// Report configuration
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Dependency manifest used to pick framework plugins
    pub manifest: PathBuf,

    /// Activate plugins for the gems listed in the manifest
    pub use_manifest: bool,

    /// Plugin ids to activate regardless of the manifest
    pub enable: Vec<String>,

    /// Plugin ids to deactivate
    pub disable: Vec<String>,

    /// Directory holding declarative rule plugins
    pub custom_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format: terminal, json
    pub format: String,

    /// List ignored definitions as well as dead ones
    pub show_ignored: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            targets: vec![],
            exclude: vec![
                "**/vendor/**".to_string(),
                "**/node_modules/**".to_string(),
                "**/tmp/**".to_string(),
                "**/sorbet/**".to_string(),
            ],
            plugins: PluginConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("Gemfile.lock"),
            use_manifest: true,
            enable: vec![],
            disable: vec![],
            custom_dir: PathBuf::from(".deadcode/plugins"),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: "terminal".to_string(),
            show_ignored: false,
        }
    }
}

impl Config {
    /// Load configuration from a file (YAML or TOML)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match extension {
            "yml" | "yaml" => serde_yaml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse YAML config"),
            "toml" => toml::from_str(&contents)
                .into_diagnostic()
                .wrap_err("Failed to parse TOML config"),
            _ => {
                // Try YAML first, then TOML
                if let Ok(config) = serde_yaml::from_str(&contents) {
                    Ok(config)
                } else {
                    toml::from_str(&contents)
                        .into_diagnostic()
                        .wrap_err("Failed to parse config file")
                }
            }
        }
    }

    /// Try to load configuration from default locations
    pub fn from_default_locations(project_root: &Path) -> Result<Self> {
        let default_names = [
            ".deadcode.yml",
            ".deadcode.yaml",
            ".deadcode.toml",
            "deadcode.yml",
            "deadcode.yaml",
            "deadcode.toml",
        ];

        for name in &default_names {
            let path = project_root.join(name);
            if path.exists() {
                debug!("Using config file {}", path.display());
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Explicit path if given, otherwise the default locations
    pub fn load(explicit: Option<&Path>, project_root: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Self::from_default_locations(project_root),
        }
    }

    /// Compile the exclusion globs
    pub fn exclude_patterns(&self) -> Result<Vec<glob::Pattern>> {
        self.exclude
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Invalid exclude pattern: {}", pattern))
            })
            .collect()
    }

    /// Check a project-relative path against the exclusion globs
    pub fn should_exclude(&self, relative: &Path) -> bool {
        self.exclude_patterns()
            .map(|patterns| is_excluded(&patterns, relative))
            .unwrap_or(false)
    }
}

pub(crate) fn is_excluded(patterns: &[glob::Pattern], relative: &Path) -> bool {
    patterns.iter().any(|pattern| pattern.matches_path(relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.plugins.use_manifest);
        assert_eq!(config.plugins.manifest, PathBuf::from("Gemfile.lock"));
        assert_eq!(config.report.format, "terminal");
    }

    #[test]
    fn test_default_exclusions() {
        let config = Config::default();
        assert!(config.should_exclude(Path::new("vendor/bundle/gems/rack.rb")));
        assert!(config.should_exclude(Path::new("engines/x/vendor/a.rb")));
        assert!(config.should_exclude(Path::new("sorbet/rbi/gems/rails.rbi")));
        assert!(!config.should_exclude(Path::new("app/models/vendor_account.rb")));
        assert!(!config.should_exclude(Path::new("lib/tasks/tmp_cleanup.rake")));
    }

    #[test]
    fn test_yaml_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".deadcode.yml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "targets: [app, lib]\nplugins:\n  use_manifest: false\n  enable: [rails]\nreport:\n  show_ignored: true"
        )
        .unwrap();

        let config = Config::from_default_locations(dir.path()).unwrap();
        assert_eq!(config.targets, vec![PathBuf::from("app"), PathBuf::from("lib")]);
        assert!(!config.plugins.use_manifest);
        assert_eq!(config.plugins.enable, vec!["rails"]);
        assert!(config.report.show_ignored);
        // Untouched sections keep their defaults
        assert_eq!(config.exclude.len(), 4);
    }

    #[test]
    fn test_toml_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deadcode.toml");
        std::fs::write(&path, "exclude = [\"spec/fixtures/**\"]\n\n[plugins]\ndisable = [\"graphql\"]\n").unwrap();

        let config = Config::load(Some(&path), dir.path()).unwrap();
        assert_eq!(config.exclude, vec!["spec/fixtures/**"]);
        assert_eq!(config.plugins.disable, vec!["graphql"]);
        assert!(config.should_exclude(Path::new("spec/fixtures/a.rb")));
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::from_default_locations(dir.path()).unwrap();
        assert!(config.targets.is_empty());
    }
}
