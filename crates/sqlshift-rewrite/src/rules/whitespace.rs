use crate::rule::{RewriteRule, RuleError};

pub const TRAILING_WHITESPACE: &str = "trailing_whitespace";

/// Strips trailing blank lines and whitespace. Runs last.
#[derive(Debug, Default)]
pub struct TrailingWhitespace;

impl RewriteRule for TrailingWhitespace {
    fn name(&self) -> &'static str {
        TRAILING_WHITESPACE
    }

    fn description(&self) -> &'static str {
        "Remove trailing blank lines and whitespace"
    }

    fn apply(&self, sql: &str) -> Result<String, RuleError> {
        Ok(sql.trim_end().to_string())
    }
}
