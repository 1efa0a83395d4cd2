use super::rules::pattern;
use super::{DefineEvent, IgnoreRules, Plugin};
use once_cell::sync::Lazy;
use regex::Regex;

static RULES: Lazy<IgnoreRules> = Lazy::new(|| {
    IgnoreRules::builder()
        .ignore_classes_named([pattern("Test$")])
        .ignore_methods_named([
            "after_all",
            "around",
            "around_all",
            "before_all",
            "setup",
            "teardown",
        ])
        .build()
});

static TEST_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|/)test/(.*/)?[^/]*test\.rb$").expect("valid regex"));

/// Test classes and `test_*` methods are run by the test runner
pub struct MinitestPlugin;

impl Plugin for MinitestPlugin {
    fn id(&self) -> &str {
        "minitest"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }

    fn on_define_method(&self, event: &mut DefineEvent<'_>) {
        if event.name().starts_with("test_")
            && TEST_FILE.is_match(&event.path().to_string_lossy().replace('\\', "/"))
        {
            event.ignore();
        }
    }
}
