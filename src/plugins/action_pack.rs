use super::rules::pattern;
use super::{DefineEvent, IgnoreRules, Plugin, SendEvent};
use once_cell::sync::Lazy;
use regex::Regex;

static RULES: Lazy<IgnoreRules> =
    Lazy::new(|| IgnoreRules::builder().ignore_classes_named([pattern("Controller$")]).build());

static CONTROLLER: Lazy<Regex> = Lazy::new(|| Regex::new("Controller$").expect("valid regex"));

const CALLBACKS: [&str; 12] = [
    "after_action",
    "append_after_action",
    "append_around_action",
    "append_before_action",
    "around_action",
    "before_action",
    "prepend_after_action",
    "prepend_around_action",
    "prepend_before_action",
    "skip_after_action",
    "skip_around_action",
    "skip_before_action",
];

/// Controllers and their actions are reached through the router
pub struct ActionPackPlugin;

impl Plugin for ActionPackPlugin {
    fn id(&self) -> &str {
        "action_pack"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }

    fn on_define_method(&self, event: &mut DefineEvent<'_>) {
        if event.owner().is_some_and(|owner| CONTROLLER.is_match(owner)) {
            event.ignore();
        }
    }

    fn on_send(&self, event: &mut SendEvent<'_>) {
        let call = event.call();
        if call.receiver.is_some() || !CALLBACKS.contains(&call.name.as_str()) {
            return;
        }

        for (name, location) in call.symbols() {
            event.reference_method(name, location.clone());
        }
        for key in ["if", "unless"] {
            if let Some(value) = call.keyword(key) {
                event.reference_method_arg(value);
            }
        }
    }
}
