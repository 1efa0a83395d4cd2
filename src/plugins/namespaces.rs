use super::{DefineEvent, Plugin};

/// Classes and modules that hold something are kept; their contents are
/// judged on their own
pub struct NamespacesPlugin;

impl Plugin for NamespacesPlugin {
    fn id(&self) -> &str {
        "namespaces"
    }

    fn on_define_class(&self, event: &mut DefineEvent<'_>) {
        if event.has_body() {
            event.ignore();
        }
    }

    fn on_define_module(&self, event: &mut DefineEvent<'_>) {
        if event.has_body() {
            event.ignore();
        }
    }
}
