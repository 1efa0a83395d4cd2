use super::rules::pattern;
use super::{IgnoreRules, Plugin, SendEvent};
use crate::indexer::CallArg;
use once_cell::sync::Lazy;

static RULES: Lazy<IgnoreRules> = Lazy::new(|| {
    IgnoreRules::builder()
        .ignore_classes_inheriting_from([pattern("^(::)?ActiveRecord::Migration")])
        .ignore_methods_named(["change", "down", "up", "table_name_prefix", "to_param"])
        .build()
});

const CALLBACKS: [&str; 23] = [
    "after_commit",
    "after_create",
    "after_create_commit",
    "after_destroy",
    "after_destroy_commit",
    "after_find",
    "after_initialize",
    "after_rollback",
    "after_save",
    "after_save_commit",
    "after_touch",
    "after_update",
    "after_update_commit",
    "after_validation",
    "around_create",
    "around_destroy",
    "around_save",
    "around_update",
    "before_create",
    "before_destroy",
    "before_save",
    "before_update",
    "before_validation",
];

/// Methods that take a hash of attributes and call the writers
const CRUD_METHODS: [&str; 9] = [
    "assign_attributes",
    "create",
    "create!",
    "insert",
    "insert!",
    "new",
    "update",
    "update!",
    "upsert",
];

/// Methods that take an array of attribute hashes
const ARRAY_METHODS: [&str; 3] = ["insert_all", "insert_all!", "upsert_all"];

pub struct ActiveRecordPlugin;

impl Plugin for ActiveRecordPlugin {
    fn id(&self) -> &str {
        "active_record"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }

    fn on_send(&self, event: &mut SendEvent<'_>) {
        let call = event.call();
        let name = call.name.as_str();

        if call.receiver.is_none() {
            if CALLBACKS.contains(&name) {
                for arg in &call.args {
                    if let Some((method, location)) = arg.as_name() {
                        event.reference_method(method, location.clone());
                    }
                }
                for key in ["if", "unless"] {
                    if let Some(value) = call.keyword(key) {
                        event.reference_method_arg(value);
                    }
                }
            }
            return;
        }

        if CRUD_METHODS.contains(&name) {
            for (key, _) in call.pairs() {
                reference_writer(event, key);
            }
        } else if ARRAY_METHODS.contains(&name) {
            for arg in &call.args {
                let CallArg::Array(rows) = arg else {
                    continue;
                };
                for row in rows {
                    if let CallArg::Hash(pairs) = row {
                        for (key, _) in pairs {
                            reference_writer(event, key);
                        }
                    }
                }
            }
        }
    }
}

// `User.create(name: "x")` calls `name=`
fn reference_writer(event: &mut SendEvent<'_>, key: &CallArg) {
    if let Some((attribute, location)) = key.as_name() {
        event.reference_method(&format!("{}=", attribute), location.clone());
    }
}
