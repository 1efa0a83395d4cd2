use super::{IgnoreRules, Plugin, SendEvent};
use once_cell::sync::Lazy;

static RULES: Lazy<IgnoreRules> = Lazy::new(|| {
    IgnoreRules::builder()
        .ignore_classes_inheriting_from([
            "GraphQL::Schema::Enum",
            "GraphQL::Schema::Object",
            "GraphQL::Schema::Scalar",
            "GraphQL::Schema::Union",
        ])
        .ignore_methods_named([
            "authorized?",
            "coerce_input",
            "coerce_result",
            "graphql_name",
            "resolve",
            "resolve_type",
            "subscribed",
            "unsubscribed",
        ])
        .build()
});

/// Fields resolve to methods of the same name unless told otherwise
pub struct GraphqlPlugin;

impl Plugin for GraphqlPlugin {
    fn id(&self) -> &str {
        "graphql"
    }

    fn rules(&self) -> &IgnoreRules {
        &RULES
    }

    fn on_send(&self, event: &mut SendEvent<'_>) {
        let call = event.call();
        if call.receiver.is_some() || call.name != "field" {
            return;
        }

        if let Some((name, location)) = call.first_arg().and_then(|arg| arg.as_symbol()) {
            event.reference_method(name, location.clone());
        }
        for key in ["resolver_method", "method"] {
            if let Some(value) = call.keyword(key) {
                event.reference_method_arg(value);
            }
        }
    }
}
