use super::{IgnoreRules, Plugin, SendEvent};
use once_cell::sync::Lazy;

static RULES: Lazy<IgnoreRules> = Lazy::new(|| {
    IgnoreRules::builder()
        .ignore_methods_named(["after_all", "around_all", "before_all"])
        .build()
});

pub struct ActiveSupportPlugin;

impl Plugin for ActiveSupportPlugin {
    fn id(&self) -> &str {
        "active_support"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }

    fn on_send(&self, event: &mut SendEvent<'_>) {
        let call = event.call();
        if call.receiver.is_some() || !matches!(call.name.as_str(), "setup" | "teardown") {
            return;
        }

        for (name, location) in call.symbols() {
            event.reference_method(name, location.clone());
        }
    }
}
