//! Pipeline driver
//!
//! Threads one SQL text through every rule of a [`RuleRegistry`]. A rule
//! that fails is logged and skipped: the text it received is passed on to
//! the next rule unchanged, so translation as a whole never fails.

use crate::registry::RuleRegistry;
use crate::rule::{RewriteRule, RuleError};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, error, info};

/// A rule that was skipped during one translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    /// Name of the rule that failed
    pub rule: &'static str,

    /// Failure detail
    pub message: String,
}

/// Output of [`Translator::translate_detailed`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    /// Translated SQL
    pub sql: String,

    /// Rules that failed and were skipped, in pipeline order
    pub failures: Vec<RuleFailure>,

    /// Number of rules whose output was adopted
    pub rules_applied: usize,
}

impl Translation {
    fn untouched(sql: &str) -> Self {
        Self {
            sql: sql.to_string(),
            failures: Vec::new(),
            rules_applied: 0,
        }
    }

    /// True when every rule ran successfully
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies a registry's rules to SQL text
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    registry: &'a RuleRegistry,
}

impl<'a> Translator<'a> {
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a RuleRegistry {
        self.registry
    }

    /// Translate `sql`, returning only the text
    pub fn translate(&self, sql: &str) -> String {
        self.translate_detailed(sql).sql
    }

    /// Absent input stays absent
    pub fn translate_opt(&self, sql: Option<&str>) -> Option<String> {
        sql.map(|sql| self.translate(sql))
    }

    /// Translate `sql`, also reporting which rules failed
    pub fn translate_detailed(&self, sql: &str) -> Translation {
        let mut translation = Translation::untouched(sql);
        if sql.is_empty() {
            return translation;
        }

        for rule in self.registry.iter() {
            if translation.sql.is_empty() {
                debug!(rule = rule.name(), "SQL emptied by an earlier rule, stopping");
                break;
            }

            match run_rule(rule, &translation.sql) {
                Ok(rewritten) => {
                    debug!(rule = rule.name(), sql = %rewritten, "Partial translated sql");
                    translation.sql = rewritten;
                    translation.rules_applied += 1;
                }
                Err(err) => {
                    error!(
                        rule = rule.name(),
                        sql = %translation.sql,
                        error = %err,
                        "Rewrite rule failed, keeping previous sql"
                    );
                    translation.failures.push(RuleFailure {
                        rule: rule.name(),
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(sql = %translation.sql, "Translated sql");
        translation
    }
}

/// Run one rule, turning a panic into a [`RuleError`] like any other failure
fn run_rule(rule: &dyn RewriteRule, sql: &str) -> Result<String, RuleError> {
    catch_unwind(AssertUnwindSafe(|| rule.apply(sql))).unwrap_or_else(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(RuleError::Panicked(message))
    })
}

/// Translate Redshift SQL to Snowflake SQL with the standard rules.
///
/// Builds a fresh [`RuleRegistry`] on every call; translate many statements
/// through one `RuleRegistry::translator()` instead.
pub fn translate(sql: &str) -> String {
    RuleRegistry::standard().translator().translate(sql)
}
