//! Rewrite rule abstraction
//!
//! A rule is a named, pure `&str -> String` transformation targeting one
//! dialect difference. Most rules are tables of regex substitutions; rules
//! that need to inspect captures implement [`RewriteRule`] directly.

use regex::{NoExpand, Regex, RegexBuilder};
use std::sync::OnceLock;

/// Failure of a single rule on a single input
///
/// The pipeline recovers from every variant by keeping the text it had
/// before the rule ran.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RuleError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("rewrite would unbalance parentheses ({opened} opened, {closed} closed)")]
    UnbalancedParens { opened: usize, closed: usize },

    #[error("unsupported input: {0}")]
    Unsupported(String),

    #[error("rule panicked: {0}")]
    Panicked(String),
}

/// A named text-to-text transformation
pub trait RewriteRule: Send + Sync {
    /// Stable identifier used in logs, config and tests
    fn name(&self) -> &'static str;

    /// One-line human description
    fn description(&self) -> &'static str {
        ""
    }

    /// Rewrite `sql`; a rule that matches nothing returns the input unchanged
    fn apply(&self, sql: &str) -> Result<String, RuleError>;
}

/// A regex compiled on first use
///
/// All rule patterns are case-insensitive and multi-line (`^`/`$` match at
/// line boundaries). A compile error is reported every time the pattern is
/// used rather than when the rule is built.
#[derive(Debug)]
pub struct Pattern {
    source: String,
    compiled: OnceLock<Result<Regex, regex::Error>>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            compiled: OnceLock::new(),
        }
    }

    /// Pattern that matches `literal` verbatim, on word boundaries where the
    /// literal starts or ends with a word character
    pub fn literal(literal: &str) -> Self {
        let is_word = |c: char| c.is_alphanumeric() || c == '_';
        let mut source = String::new();
        if literal.chars().next().is_some_and(is_word) {
            source.push_str(r"\b");
        }
        source.push_str(&regex::escape(literal));
        if literal.chars().last().is_some_and(is_word) {
            source.push_str(r"\b");
        }
        Self::new(source)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> Result<&Regex, RuleError> {
        self.compiled
            .get_or_init(|| {
                RegexBuilder::new(&self.source)
                    .case_insensitive(true)
                    .multi_line(true)
                    .build()
            })
            .as_ref()
            .map_err(|e| RuleError::Pattern(e.clone()))
    }
}

/// How a substitution's replacement text is interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// `${n}` references expand to capture groups
    Template(String),

    /// Inserted verbatim
    Literal(String),
}

/// One pattern → replacement step of a [`PatternRule`]
#[derive(Debug)]
pub struct Substitution {
    pattern: Pattern,
    replacement: Replacement,
}

impl Substitution {
    pub fn new(pattern: &str, replacement: &str) -> Self {
        Self {
            pattern: Pattern::new(pattern),
            replacement: Replacement::Template(replacement.to_string()),
        }
    }

    /// Case-insensitive literal rename
    pub fn literal(from: &str, to: &str) -> Self {
        Self {
            pattern: Pattern::literal(from),
            replacement: Replacement::Literal(to.to_string()),
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn apply(&self, sql: &str) -> Result<String, RuleError> {
        let regex = self.pattern.regex()?;
        let rewritten = match &self.replacement {
            Replacement::Template(template) => regex.replace_all(sql, template.as_str()),
            Replacement::Literal(text) => regex.replace_all(sql, NoExpand(text)),
        };
        Ok(rewritten.into_owned())
    }
}

/// A rule made of an ordered list of substitutions
#[derive(Debug)]
pub struct PatternRule {
    name: &'static str,
    description: &'static str,
    substitutions: Vec<Substitution>,
}

impl PatternRule {
    pub fn new(name: &'static str, description: &'static str, substitutions: Vec<Substitution>) -> Self {
        Self {
            name,
            description,
            substitutions,
        }
    }

    pub fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }
}

impl RewriteRule for PatternRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn apply(&self, sql: &str) -> Result<String, RuleError> {
        let mut rewritten = sql.to_string();
        for substitution in &self.substitutions {
            rewritten = substitution.apply(&rewritten)?;
        }
        Ok(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_is_case_insensitive_and_multiline() {
        let pattern = Pattern::new(r"^select");
        let regex = pattern.regex().unwrap();
        assert!(regex.is_match("-- header\nSELECT 1"));
    }

    #[test]
    fn invalid_pattern_reported_on_use() {
        let pattern = Pattern::new(r"(unclosed");
        assert!(matches!(pattern.regex(), Err(RuleError::Pattern(_))));
        // Still an error the second time round
        assert!(pattern.regex().is_err());
    }

    #[test]
    fn literal_pattern_respects_word_boundaries() {
        let pattern = Pattern::literal("rating__bigint");
        let regex = pattern.regex().unwrap();
        assert!(regex.is_match("select rating__bigint from t"));
        assert!(!regex.is_match("select rating__bigint_v2 from t"));

        let dotted = Pattern::literal("etl.");
        assert_eq!(dotted.as_str(), r"\betl\.");
    }

    #[test]
    fn literal_replacement_is_not_expanded() {
        let substitution = Substitution::literal("price", "$1price");
        assert_eq!(substitution.apply("select price").unwrap(), "select $1price");
    }

    #[test]
    fn template_replacement_expands_groups() {
        let substitution = Substitution::new(r"(\w+)\s+as\s+(\w+)", "${2} = ${1}");
        assert_eq!(substitution.apply("a as b").unwrap(), "b = a");
    }

    #[test]
    fn pattern_rule_applies_in_order() {
        let rule = PatternRule::new(
            "chain",
            "",
            vec![Substitution::new("a", "b"), Substitution::new("b", "c")],
        );
        assert_eq!(rule.apply("a").unwrap(), "c");
        assert_eq!(rule.name(), "chain");
    }

    #[test]
    fn broken_substitution_fails_whole_rule() {
        let rule = PatternRule::new(
            "broken",
            "",
            vec![Substitution::new("a", "b"), Substitution::new("[", "")],
        );
        assert!(matches!(rule.apply("a"), Err(RuleError::Pattern(_))));
    }
}
