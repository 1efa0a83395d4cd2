use super::{IgnoreRules, Plugin, SendEvent};
use once_cell::sync::Lazy;

static RULES: Lazy<IgnoreRules> = Lazy::new(|| {
    IgnoreRules::builder()
        .ignore_methods_named([
            "==",
            "extended",
            "included",
            "inherited",
            "method_added",
            "method_missing",
            "prepended",
            "respond_to_missing?",
            "to_s",
        ])
        .build()
});

/// Methods the interpreter calls by itself, and reflection with literal names
pub struct RubyPlugin;

impl Plugin for RubyPlugin {
    fn id(&self) -> &str {
        "ruby"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }

    fn on_send(&self, event: &mut SendEvent<'_>) {
        let call = event.call();

        match call.name.as_str() {
            "send" | "__send__" | "public_send" | "try" | "method" | "respond_to?" => {
                if let Some(arg) = call.first_arg() {
                    event.reference_method_arg(arg);
                }
            }
            "const_get" | "const_defined?" | "const_source_location" => {
                if let Some((name, location)) = call.first_arg().and_then(|arg| arg.as_name()) {
                    for segment in name.split("::").filter(|s| !s.is_empty()) {
                        event.reference_constant(segment, location.clone());
                    }
                }
            }
            "alias_method" => {
                if let Some(arg) = call.last_arg() {
                    event.reference_method_arg(arg);
                }
            }
            _ => {}
        }
    }
}
