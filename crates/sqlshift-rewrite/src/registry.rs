//! Ordered, immutable rule list

use crate::pipeline::Translator;
use crate::rule::RewriteRule;
use crate::rules::{self, STANDARD_ORDER};
use sqlshift_core::{Config, ConfigError};

/// The ordered set of rules a [`Translator`] runs
///
/// Built once and never mutated; share it by reference (it is `Send + Sync`)
/// to translate from several threads.
pub struct RuleRegistry {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl RuleRegistry {
    /// All built-in rules in their standard order
    pub fn standard() -> Self {
        Self::from_rules(rules::standard_rules(&[]))
    }

    /// Built-in rules minus `disabled_rules`, with configured fixups added
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        if let Some(unknown) = config
            .disabled_rules
            .iter()
            .find(|name| !STANDARD_ORDER.contains(&name.as_str()))
        {
            return Err(ConfigError::UnknownRule(unknown.clone()));
        }

        let rules = rules::standard_rules(&config.fixups)
            .into_iter()
            .filter(|rule| !config.is_rule_disabled(rule.name()))
            .collect();

        Ok(Self::from_rules(rules))
    }

    /// Custom pipeline, in the given order
    pub fn from_rules(rules: Vec<Box<dyn RewriteRule>>) -> Self {
        Self { rules }
    }

    pub fn translator(&self) -> Translator<'_> {
        Translator::new(self)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn RewriteRule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn RewriteRule> {
        self.iter().find(|rule| rule.name() == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry").field("rules", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlshift_core::{Dialect, IdentifierFixup};

    #[test]
    fn standard_registry_has_every_rule() {
        let registry = RuleRegistry::standard();
        assert_eq!(registry.names(), STANDARD_ORDER);
        assert!(registry.get("convert_timezone").is_some());
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn disabled_rules_left_out() {
        let mut config = Config::default();
        config.disabled_rules = vec!["identifier_fixups".to_string(), "analyze_statements".to_string()];

        let registry = RuleRegistry::from_config(&config).unwrap();
        assert_eq!(registry.len(), STANDARD_ORDER.len() - 2);
        assert!(registry.get("identifier_fixups").is_none());
        assert_eq!(registry.names().last(), Some(&"trailing_whitespace"));
    }

    #[test]
    fn unknown_disabled_rule_rejected() {
        let mut config = Config::default();
        config.disabled_rules = vec!["parse_tmp".to_string()];

        let err = RuleRegistry::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownRule(name) if name == "parse_tmp"));
    }

    #[test]
    fn unsupported_dialects_rejected() {
        let mut config = Config::default();
        config.target_dialect = Dialect::Redshift;
        assert!(RuleRegistry::from_config(&config).is_err());
    }

    #[test]
    fn configured_fixups_reach_the_rule() {
        let mut config = Config::default();
        config.fixups.push(IdentifierFixup::new("old_schema.t", "new_schema.t"));

        let registry = RuleRegistry::from_config(&config).unwrap();
        let rule = registry.get("identifier_fixups").unwrap();
        assert_eq!(rule.apply("from old_schema.t").unwrap(), "from new_schema.t");
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleRegistry>();
    }
}
