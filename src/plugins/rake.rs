use super::{IgnoreRules, Plugin};
use once_cell::sync::Lazy;

static RULES: Lazy<IgnoreRules> =
    Lazy::new(|| IgnoreRules::builder().ignore_constants_named(["APP_RAKEFILE"]).build());

pub struct RakePlugin;

impl Plugin for RakePlugin {
    fn id(&self) -> &str {
        "rake"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }
}
