use super::{DefineEvent, IgnoreRules, Plugin};
use once_cell::sync::Lazy;

const COP_BASES: [&str; 2] = ["RuboCop::Cop::Base", "RuboCop::Cop::Cop"];

static RULES: Lazy<IgnoreRules> =
    Lazy::new(|| IgnoreRules::builder().ignore_classes_inheriting_from(COP_BASES).build());

/// Cops are loaded by name and driven through `on_*` callbacks
pub struct RubocopPlugin;

fn in_cop(event: &DefineEvent<'_>) -> bool {
    event
        .superclass()
        .map(|superclass| superclass.trim_start_matches("::"))
        .is_some_and(|superclass| COP_BASES.contains(&superclass))
}

impl Plugin for RubocopPlugin {
    fn id(&self) -> &str {
        "rubocop"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }

    fn on_define_constant(&self, event: &mut DefineEvent<'_>) {
        if in_cop(event) && matches!(event.name(), "MSG" | "RESTRICT_ON_SEND") {
            event.ignore();
        }
    }

    fn on_define_method(&self, event: &mut DefineEvent<'_>) {
        if in_cop(event) && (event.name().starts_with("on_") || event.name().starts_with("after_")) {
            event.ignore();
        }
    }
}
