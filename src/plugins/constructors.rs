use super::{IgnoreRules, Plugin};
use once_cell::sync::Lazy;

static RULES: Lazy<IgnoreRules> =
    Lazy::new(|| IgnoreRules::builder().ignore_methods_named(["initialize"]).build());

/// Constructors are only ever called through `new`
pub struct ConstructorsPlugin;

impl Plugin for ConstructorsPlugin {
    fn id(&self) -> &str {
        "constructors"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }
}
