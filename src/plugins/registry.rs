//! Maps project dependencies to built-in plugins and assembles the active
//! [`PluginSet`].

use super::*;
use crate::config::PluginConfig;
use crate::discovery::Manifest;
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::Path;
use tracing::{debug, info, warn};

/// Gem name → plugin id. A gem may activate several plugins.
const GEM_PLUGINS: [(&str, &str); 19] = [
    ("actionmailer", "action_mailer"),
    ("actionmailer", "action_mailer_preview"),
    ("actionpack", "action_pack"),
    ("activejob", "active_job"),
    ("activemodel", "active_model"),
    ("activerecord", "active_record"),
    ("activesupport", "active_support"),
    ("graphql", "graphql"),
    ("minitest", "minitest"),
    ("rails", "rails"),
    ("railties", "rails"),
    ("rake", "rake"),
    ("rspec", "rspec"),
    ("rspec-core", "rspec"),
    ("rubocop", "rubocop"),
    ("sorbet", "sorbet"),
    ("sorbet-runtime", "sorbet"),
    ("sorbet-static", "sorbet"),
    ("thor", "thor"),
];

/// Every built-in plugin id, intrinsic ones first
pub const BUILTIN_IDS: [&str; 18] = [
    "constructors",
    "namespaces",
    "ruby",
    "action_mailer",
    "action_mailer_preview",
    "action_pack",
    "active_job",
    "active_model",
    "active_record",
    "active_support",
    "graphql",
    "minitest",
    "rails",
    "rake",
    "rspec",
    "rubocop",
    "sorbet",
    "thor",
];

/// Instantiate a built-in plugin by id
pub fn builtin(id: &str) -> Option<Box<dyn Plugin>> {
    let plugin: Box<dyn Plugin> = match id {
        "constructors" => Box::new(ConstructorsPlugin),
        "namespaces" => Box::new(NamespacesPlugin),
        "ruby" => Box::new(RubyPlugin),
        "action_mailer" => Box::new(ActionMailerPlugin),
        "action_mailer_preview" => Box::new(ActionMailerPreviewPlugin),
        "action_pack" => Box::new(ActionPackPlugin),
        "active_job" => Box::new(ActiveJobPlugin),
        "active_model" => Box::new(ActiveModelPlugin),
        "active_record" => Box::new(ActiveRecordPlugin),
        "active_support" => Box::new(ActiveSupportPlugin),
        "graphql" => Box::new(GraphqlPlugin),
        "minitest" => Box::new(MinitestPlugin),
        "rails" => Box::new(RailsPlugin),
        "rake" => Box::new(RakePlugin),
        "rspec" => Box::new(RspecPlugin),
        "rubocop" => Box::new(RubocopPlugin),
        "sorbet" => Box::new(SorbetPlugin),
        "thor" => Box::new(ThorPlugin),
        _ => return None,
    };
    Some(plugin)
}

/// Plugin ids activated by the gems of a manifest, in table order
pub fn plugins_for_manifest(manifest: &Manifest) -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = Vec::new();
    for (gem, id) in GEM_PLUGINS {
        if manifest.contains(gem) && !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

/// Assemble the plugin set: intrinsic plugins, manifest-selected plugins,
/// `enable`d plugins, then custom rule plugins; `disable` wins over all of them.
pub fn select(
    config: &PluginConfig,
    manifest: Option<&Manifest>,
    custom: Vec<RulePlugin>,
) -> PluginSet {
    let mut set = PluginSet::intrinsic();

    let from_manifest = manifest.map(plugins_for_manifest).unwrap_or_default();
    for id in from_manifest.iter().copied().chain(config.enable.iter().map(String::as_str)) {
        match builtin(id) {
            Some(plugin) => {
                set.add(plugin);
            }
            None => warn!("Unknown plugin `{}`, skipping", id),
        }
    }

    for plugin in custom {
        if !set.add(Box::new(plugin)) {
            warn!("Custom plugin id clashes with an installed plugin, skipping");
        }
    }

    for id in &config.disable {
        if !set.remove(id) {
            debug!("Plugin {} was not active", id);
        }
    }

    info!("Active plugins: {}", set.ids().join(", "));
    set
}

/// Read the manifest and the custom plugin directory below `root`, then
/// [`select`] the plugins.
pub fn load(config: &PluginConfig, root: &Path) -> Result<PluginSet> {
    let manifest = if config.use_manifest {
        let path = root.join(&config.manifest);
        if path.is_file() {
            Some(Manifest::from_lockfile(&path)?)
        } else {
            debug!("No manifest at {}", path.display());
            None
        }
    } else {
        None
    };

    let custom = RulePlugin::load_dir(&root.join(&config.custom_dir))
        .into_diagnostic()
        .wrap_err("Failed to load custom plugins")?;

    Ok(select(config, manifest.as_ref(), custom))
}
