//! Declarative rule plugins read from the project's plugin directory.
//!
//! ```yaml
//! id: billing
//! ignore_classes_inheriting_from: [Billing::Handler]
//! ignore_methods_named: ["/^handle_/", call]
//! ```

use super::{IgnoreRules, NameMatcher, Plugin};
use crate::error::PluginLoadError;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RuleFile {
    id: Option<String>,
    ignore_classes_named: Vec<String>,
    ignore_classes_inheriting_from: Vec<String>,
    ignore_constants_named: Vec<String>,
    ignore_methods_named: Vec<String>,
    ignore_modules_named: Vec<String>,
}

/// A plugin made only of ignore rules
pub struct RulePlugin {
    id: String,
    rules: IgnoreRules,
}

impl RulePlugin {
    pub fn new(id: impl Into<String>, rules: IgnoreRules) -> Self {
        Self {
            id: id.into(),
            rules,
        }
    }

    /// Load a `.yml`, `.yaml` or `.toml` rule file. Without an `id` key the
    /// plugin is named `custom:<file stem>`.
    pub fn from_file(path: &Path) -> Result<Self, PluginLoadError> {
        let fail = |reason: String| PluginLoadError {
            path: path.to_path_buf(),
            reason,
        };

        let contents = std::fs::read_to_string(path).map_err(|e| fail(e.to_string()))?;
        let file: RuleFile = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&contents).map_err(|e| fail(e.to_string()))?,
            _ => serde_yaml::from_str(&contents).map_err(|e| fail(e.to_string()))?,
        };

        let matchers = |names: &[String]| -> Result<Vec<NameMatcher>, PluginLoadError> {
            names
                .iter()
                .map(|name| {
                    NameMatcher::parse(name).map_err(|e| fail(format!("invalid pattern {}: {}", name, e)))
                })
                .collect()
        };

        let rules = IgnoreRules::builder()
            .ignore_classes_named(matchers(&file.ignore_classes_named)?)
            .ignore_classes_inheriting_from(matchers(&file.ignore_classes_inheriting_from)?)
            .ignore_constants_named(matchers(&file.ignore_constants_named)?)
            .ignore_methods_named(matchers(&file.ignore_methods_named)?)
            .ignore_modules_named(matchers(&file.ignore_modules_named)?)
            .build();

        let id = match file.id {
            Some(id) => id,
            None => {
                let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
                format!("custom:{}", stem)
            }
        };
        debug!("Loaded rule plugin {} from {}", id, path.display());
        Ok(Self::new(id, rules))
    }

    /// Load every rule file below `dir`, in path order. A missing directory
    /// yields no plugins.
    pub fn load_dir(dir: &Path) -> Result<Vec<RulePlugin>, PluginLoadError> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut plugins = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| PluginLoadError {
                path: dir.to_path_buf(),
                reason: e.to_string(),
            })?;
            let is_rule_file = entry.file_type().is_file()
                && matches!(
                    entry.path().extension().and_then(|e| e.to_str()),
                    Some("yml" | "yaml" | "toml")
                );
            if is_rule_file {
                plugins.push(Self::from_file(entry.path())?);
            }
        }
        Ok(plugins)
    }
}

impl Plugin for RulePlugin {
    fn id(&self) -> &str {
        &self.id
    }

    fn rules(&self) -> &IgnoreRules {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_rule_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("billing.yml");
        std::fs::write(
            &path,
            "ignore_methods_named: [\"/^handle_/\", call]\nignore_classes_inheriting_from: [Billing::Handler]\n",
        )
        .unwrap();

        let plugin = RulePlugin::from_file(&path).unwrap();
        assert_eq!(plugin.id(), "custom:billing");
        assert!(plugin.rules().ignores_method("handle_refund"));
        assert!(plugin.rules().ignores_method("call"));
        assert!(!plugin.rules().ignores_method("caller"));
        assert!(plugin.rules().ignores_superclass("::Billing::Handler"));
    }

    #[test]
    fn test_toml_rule_file_with_id() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.toml");
        std::fs::write(&path, "id = \"jobs\"\nignore_constants_named = [\"QUEUE\"]\n").unwrap();

        let plugin = RulePlugin::from_file(&path).unwrap();
        assert_eq!(plugin.id(), "jobs");
        assert!(plugin.rules().ignores_constant("QUEUE", "Job::QUEUE"));
    }

    #[test]
    fn test_malformed_files() {
        let dir = TempDir::new().unwrap();

        let unknown_key = dir.path().join("a.yml");
        std::fs::write(&unknown_key, "ignore_everything: true\n").unwrap();
        let error = RulePlugin::from_file(&unknown_key).err().unwrap();
        assert_eq!(error.path, unknown_key);

        let bad_pattern = dir.path().join("b.yml");
        std::fs::write(&bad_pattern, "ignore_methods_named: [\"/(/\"]\n").unwrap();
        let error = RulePlugin::from_file(&bad_pattern).err().unwrap();
        assert!(error.reason.contains("invalid pattern"));
    }

    #[test]
    fn test_load_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("b.yml"), "ignore_methods_named: [b]\n").unwrap();
        std::fs::write(dir.path().join("a.toml"), "ignore_methods_named = [\"a\"]\n").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a plugin").unwrap();

        let plugins = RulePlugin::load_dir(dir.path()).unwrap();
        let ids: Vec<&str> = plugins.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["custom:a", "custom:b"]);

        assert!(RulePlugin::load_dir(&dir.path().join("missing")).unwrap().is_empty());
    }
}
