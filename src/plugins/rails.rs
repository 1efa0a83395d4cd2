use super::{DefineEvent, IgnoreRules, Plugin};
use once_cell::sync::Lazy;
use std::path::{Component, Path};

static RULES: Lazy<IgnoreRules> = Lazy::new(|| {
    IgnoreRules::builder()
        .ignore_constants_named(["APP_PATH", "ENGINE_PATH", "ENGINE_ROOT"])
        .build()
});

/// Everything under `app/helpers` is reachable from views
pub struct RailsPlugin;

impl RailsPlugin {
    fn ignore_helpers(event: &mut DefineEvent<'_>) {
        if is_helper_path(event.path()) {
            event.ignore();
        }
    }
}

impl Plugin for RailsPlugin {
    fn id(&self) -> &str {
        "rails"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }

    fn on_define_class(&self, event: &mut DefineEvent<'_>) {
        Self::ignore_helpers(event);
    }

    fn on_define_module(&self, event: &mut DefineEvent<'_>) {
        Self::ignore_helpers(event);
    }

    fn on_define_method(&self, event: &mut DefineEvent<'_>) {
        Self::ignore_helpers(event);
    }
}

fn is_helper_path(path: &Path) -> bool {
    let components: Vec<&std::ffi::OsStr> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();
    components
        .windows(2)
        .any(|pair| pair[0] == "app" && pair[1] == "helpers")
}
