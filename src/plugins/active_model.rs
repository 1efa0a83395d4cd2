use super::{IgnoreRules, Plugin, SendEvent};
use crate::indexer::CallArg;
use once_cell::sync::Lazy;

static RULES: Lazy<IgnoreRules> = Lazy::new(|| {
    IgnoreRules::builder()
        .ignore_classes_inheriting_from(["ActiveModel::EachValidator"])
        .ignore_methods_named(["validate_each", "persisted?"])
        .build()
});

const VALIDATIONS: [&str; 4] = ["validate", "validates", "validates!", "validates_each"];

pub struct ActiveModelPlugin;

impl Plugin for ActiveModelPlugin {
    fn id(&self) -> &str {
        "active_model"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }

    fn on_send(&self, event: &mut SendEvent<'_>) {
        let call = event.call();
        if call.receiver.is_some() {
            return;
        }

        match call.name.as_str() {
            "attribute" | "attributes" => {
                for (name, location) in call.symbols() {
                    event.reference_method(name, location.clone());
                }
            }
            name if VALIDATIONS.contains(&name) => {
                for (name, location) in call.symbols() {
                    event.reference_method(name, location.clone());
                }
                for (key, value) in call.pairs() {
                    let Some((key, location)) = key.as_symbol() else {
                        continue;
                    };
                    match key {
                        "if" | "unless" => event.reference_method_arg(value),
                        // `presence: true` is checked by PresenceValidator
                        _ => event.reference_constant(
                            &format!("{}Validator", camelize(key)),
                            location.clone(),
                        ),
                    }
                }
            }
            "validates_with" => {
                for arg in &call.args {
                    if let CallArg::Constant { name, location } = arg {
                        let short = name.rsplit("::").next().unwrap_or(name);
                        event.reference_constant(short, location.clone());
                    }
                }
            }
            _ => {}
        }
    }
}

/// `email_format` → `EmailFormat`
fn camelize(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
