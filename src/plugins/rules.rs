use regex::Regex;
use std::fmt;

/// Matches a name either literally or with a regular expression
#[derive(Debug, Clone)]
pub enum NameMatcher {
    Exact(String),
    Pattern(Regex),
}

impl NameMatcher {
    pub fn matches(&self, name: &str) -> bool {
        match self {
            NameMatcher::Exact(expected) => expected == name,
            NameMatcher::Pattern(pattern) => pattern.is_match(name),
        }
    }

    /// Parse the rule-file syntax: `/.../` is a pattern, anything else is exact
    pub fn parse(text: &str) -> Result<Self, regex::Error> {
        match text
            .strip_prefix('/')
            .and_then(|rest| rest.strip_suffix('/'))
        {
            Some(pattern) if !pattern.is_empty() => Ok(NameMatcher::Pattern(Regex::new(pattern)?)),
            _ => Ok(NameMatcher::Exact(text.to_string())),
        }
    }
}

impl From<&str> for NameMatcher {
    fn from(name: &str) -> Self {
        NameMatcher::Exact(name.to_string())
    }
}

impl From<Regex> for NameMatcher {
    fn from(pattern: Regex) -> Self {
        NameMatcher::Pattern(pattern)
    }
}

impl fmt::Display for NameMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameMatcher::Exact(name) => f.write_str(name),
            NameMatcher::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}

/// Declarative ignore rules of one plugin type.
///
/// Built once through [`IgnoreRules::builder`] and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    class_names: Vec<NameMatcher>,
    superclass_names: Vec<NameMatcher>,
    constant_names: Vec<NameMatcher>,
    method_names: Vec<NameMatcher>,
    module_names: Vec<NameMatcher>,
}

impl IgnoreRules {
    pub fn builder() -> IgnoreRulesBuilder {
        IgnoreRulesBuilder::default()
    }

    pub fn is_empty(&self) -> bool {
        self.class_names.is_empty()
            && self.superclass_names.is_empty()
            && self.constant_names.is_empty()
            && self.method_names.is_empty()
            && self.module_names.is_empty()
    }

    /// Class rules: by name (short or full) or by direct superclass
    pub fn ignores_class(&self, name: &str, full_name: &str, superclass: Option<&str>) -> bool {
        any_matches(&self.class_names, &[name, full_name])
            || superclass.is_some_and(|superclass| self.ignores_superclass(superclass))
    }

    /// Whether a class inheriting from `superclass` is ignored
    pub fn ignores_superclass(&self, superclass: &str) -> bool {
        let superclass = superclass.trim_start_matches("::");
        self.superclass_names.iter().any(|m| m.matches(superclass))
    }

    pub fn has_superclass_rules(&self) -> bool {
        !self.superclass_names.is_empty()
    }

    pub fn ignores_module(&self, name: &str, full_name: &str) -> bool {
        any_matches(&self.module_names, &[name, full_name])
    }

    pub fn ignores_constant(&self, name: &str, full_name: &str) -> bool {
        any_matches(&self.constant_names, &[name, full_name])
    }

    pub fn ignores_method(&self, name: &str) -> bool {
        self.method_names.iter().any(|m| m.matches(name))
    }
}

fn any_matches(matchers: &[NameMatcher], names: &[&str]) -> bool {
    matchers
        .iter()
        .any(|matcher| names.iter().any(|name| matcher.matches(name)))
}

/// Builder for [`IgnoreRules`]
#[derive(Debug, Default)]
pub struct IgnoreRulesBuilder {
    rules: IgnoreRules,
}

impl IgnoreRulesBuilder {
    pub fn ignore_classes_named<I, M>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<NameMatcher>,
    {
        self.rules.class_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn ignore_classes_inheriting_from<I, M>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<NameMatcher>,
    {
        self.rules
            .superclass_names
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn ignore_constants_named<I, M>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<NameMatcher>,
    {
        self.rules.constant_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn ignore_methods_named<I, M>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<NameMatcher>,
    {
        self.rules.method_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn ignore_modules_named<I, M>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<NameMatcher>,
    {
        self.rules.module_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> IgnoreRules {
        self.rules
    }
}

/// Compile a static regex literal
pub(crate) fn pattern(source: &str) -> NameMatcher {
    NameMatcher::Pattern(Regex::new(source).expect("invalid built-in pattern"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_pattern_matchers() {
        let rules = IgnoreRules::builder()
            .ignore_classes_named([pattern("Controller$")])
            .ignore_methods_named(["initialize", "to_s"])
            .build();

        assert!(rules.ignores_class("UsersController", "Admin::UsersController", None));
        assert!(!rules.ignores_class("ControllerHelper", "ControllerHelper", None));
        assert!(rules.ignores_method("initialize"));
        assert!(!rules.ignores_method("initialize_copy"));
    }

    #[test]
    fn test_superclass_rules_strip_leading_colons() {
        let rules = IgnoreRules::builder()
            .ignore_classes_inheriting_from(["ActionMailer::Preview"])
            .build();

        assert!(rules.ignores_class("UserPreview", "UserPreview", Some("::ActionMailer::Preview")));
        assert!(rules.ignores_superclass("ActionMailer::Preview"));
        assert!(!rules.ignores_class("UserPreview", "UserPreview", Some("Preview")));
    }

    #[test]
    fn test_full_names_match_class_rules() {
        let rules = IgnoreRules::builder()
            .ignore_classes_named(["Admin::Dashboard"])
            .ignore_modules_named(["Helpers"])
            .ignore_constants_named(["VERSION"])
            .build();

        assert!(rules.ignores_class("Dashboard", "Admin::Dashboard", None));
        assert!(rules.ignores_module("Helpers", "App::Helpers"));
        assert!(rules.ignores_constant("VERSION", "Gem::VERSION"));
    }

    #[test]
    fn test_name_matcher_parse() {
        assert!(matches!(NameMatcher::parse("/Job$/"), Ok(NameMatcher::Pattern(_))));
        assert!(matches!(NameMatcher::parse("perform"), Ok(NameMatcher::Exact(_))));
        assert!(matches!(NameMatcher::parse("/"), Ok(NameMatcher::Exact(_))));
        assert!(NameMatcher::parse("/(/").is_err());
    }

    #[test]
    fn test_empty_rules() {
        assert!(IgnoreRules::default().is_empty());
        assert!(!IgnoreRules::builder().ignore_methods_named(["x"]).build().is_empty());
    }
}
