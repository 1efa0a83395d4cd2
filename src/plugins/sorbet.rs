use super::{DefineEvent, Plugin};
use once_cell::sync::Lazy;
use regex::Regex;

static OVERRIDE_SIG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(override|overridable)\b").expect("valid regex"));

/// Generic type members, enum values and overrides are used by the runtime
pub struct SorbetPlugin;

impl SorbetPlugin {
    fn ignore_overrides(event: &mut DefineEvent<'_>) {
        if event.sig().is_some_and(|sig| OVERRIDE_SIG.is_match(sig)) {
            event.ignore();
        }
    }
}

impl Plugin for SorbetPlugin {
    fn id(&self) -> &str {
        "sorbet"
    }

    fn on_define_constant(&self, event: &mut DefineEvent<'_>) {
        let value = event.value().map(str::trim_start).unwrap_or_default();
        if value.starts_with("type_member") || value.starts_with("type_template") {
            event.ignore();
            return;
        }

        let in_enum = event
            .superclass()
            .is_some_and(|superclass| superclass.trim_start_matches("::") == "T::Enum");
        if in_enum && event.enclosing_block() == Some("enums") {
            event.ignore();
        }
    }

    fn on_define_method(&self, event: &mut DefineEvent<'_>) {
        Self::ignore_overrides(event);
    }

    fn on_define_accessor(&self, event: &mut DefineEvent<'_>) {
        Self::ignore_overrides(event);
    }
}
