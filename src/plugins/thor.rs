use super::{DefineEvent, IgnoreRules, Plugin};
use once_cell::sync::Lazy;

static RULES: Lazy<IgnoreRules> =
    Lazy::new(|| IgnoreRules::builder().ignore_methods_named(["exit_on_failure?"]).build());

/// Public methods of a Thor subclass are commands
pub struct ThorPlugin;

impl Plugin for ThorPlugin {
    fn id(&self) -> &str {
        "thor"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }

    fn on_define_method(&self, event: &mut DefineEvent<'_>) {
        let is_command_class = event
            .superclass()
            .is_some_and(|superclass| superclass.trim_start_matches("::") == "Thor");
        // `no_commands do ... end` hides helpers
        if is_command_class && event.enclosing_block().is_none() {
            event.ignore();
        }
    }
}
