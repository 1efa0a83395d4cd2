use super::rules::pattern;
use super::{IgnoreRules, Plugin};
use once_cell::sync::Lazy;

static RULES: Lazy<IgnoreRules> = Lazy::new(|| {
    IgnoreRules::builder()
        .ignore_classes_named([pattern("Spec$")])
        .ignore_methods_named([
            "after_setup",
            "after_teardown",
            "before_setup",
            "before_teardown",
        ])
        .build()
});

pub struct RspecPlugin;

impl Plugin for RspecPlugin {
    fn id(&self) -> &str {
        "rspec"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }
}
