use super::{Plugin, SendEvent};

const CALLBACKS: [&str; 6] = [
    "after_action",
    "after_deliver",
    "around_action",
    "around_deliver",
    "before_action",
    "before_deliver",
];

/// Mailer callbacks name their methods with symbols
pub struct ActionMailerPlugin;

impl Plugin for ActionMailerPlugin {
    fn id(&self) -> &str {
        "action_mailer"
    }

    fn on_send(&self, event: &mut SendEvent<'_>) {
        let call = event.call();
        if call.receiver.is_some() || !CALLBACKS.contains(&call.name.as_str()) {
            return;
        }

        for (name, location) in call.symbols() {
            event.reference_method(name, location.clone());
        }
    }
}
