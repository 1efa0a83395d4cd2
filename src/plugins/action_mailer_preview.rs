use super::{DefineEvent, IgnoreRules, Plugin};
use once_cell::sync::Lazy;

const PREVIEW: &str = "ActionMailer::Preview";

static RULES: Lazy<IgnoreRules> = Lazy::new(|| {
    IgnoreRules::builder()
        .ignore_classes_inheriting_from([PREVIEW])
        .build()
});

/// Mailer previews are discovered and called by the framework
pub struct ActionMailerPreviewPlugin;

impl Plugin for ActionMailerPreviewPlugin {
    fn id(&self) -> &str {
        "action_mailer_preview"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }

    fn on_define_method(&self, event: &mut DefineEvent<'_>) {
        if event
            .superclass()
            .is_some_and(|superclass| superclass.trim_start_matches("::") == PREVIEW)
        {
            event.ignore();
        }
    }
}
