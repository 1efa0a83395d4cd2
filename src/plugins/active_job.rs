use super::{IgnoreRules, Plugin};
use once_cell::sync::Lazy;

static RULES: Lazy<IgnoreRules> = Lazy::new(|| {
    IgnoreRules::builder()
        .ignore_classes_named(["ApplicationJob"])
        .ignore_methods_named(["perform", "build_enumerator", "each_iteration"])
        .build()
});

/// Jobs are enqueued by class name and run through `perform`
pub struct ActiveJobPlugin;

impl Plugin for ActiveJobPlugin {
    fn id(&self) -> &str {
        "active_job"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }
}
