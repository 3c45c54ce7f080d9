//! Session and maintenance statements
//!
//! Statements are only recognized in statement position: at the start of the
//! text, at the start of a line, or after the `;` ending the previous
//! statement on the same line. The same words inside an expression or a
//! comment are left alone.

use crate::rule::{Pattern, PatternRule, RewriteRule, RuleError, Substitution};
use regex::Captures;

pub const SEARCH_PATH: &str = "search_path";
pub const ANALYZE_STATEMENTS: &str = "analyze_statements";
pub const SESSION_STATEMENTS: &str = "session_statements";

pub fn search_path() -> PatternRule {
    PatternRule::new(
        SEARCH_PATH,
        "set search_path to X -> use schema X",
        vec![Substitution::new(r"\bset\s+search_path\s*(?:to\s+|=\s*)", "use schema ")],
    )
}

/// Last non-blank character before `offset`
fn preceding_char(sql: &str, offset: usize) -> Option<char> {
    sql[..offset].trim_end_matches([' ', '\t']).chars().last()
}

fn at_statement_start(sql: &str, offset: usize) -> bool {
    matches!(preceding_char(sql, offset), None | Some('\n' | ';'))
}

/// Drops single-line `ANALYZE ...;` statements.
///
/// A statement alone on its line goes together with its line break; one
/// following another statement on the same line leaves the break in place.
pub struct AnalyzeStatements {
    pattern: Pattern,
}

pub fn analyze_statements() -> AnalyzeStatements {
    AnalyzeStatements {
        pattern: Pattern::new(r#"[ \t]*\banalyze\b[\w. \t,()"]*;[ \t]*(\r?\n)?"#),
    }
}

impl RewriteRule for AnalyzeStatements {
    fn name(&self) -> &'static str {
        ANALYZE_STATEMENTS
    }

    fn description(&self) -> &'static str {
        "Remove ANALYZE statements"
    }

    fn apply(&self, sql: &str) -> Result<String, RuleError> {
        let regex = self.pattern.regex()?;
        let rewritten = regex.replace_all(sql, |caps: &Captures| {
            let start = caps.get(0).map_or(0, |m| m.start());
            match preceding_char(sql, start) {
                None | Some('\n') => String::new(),
                Some(';') => caps.get(1).map_or("", |m| m.as_str()).to_string(),
                Some(_) => caps[0].to_string(),
            }
        });
        Ok(rewritten.into_owned())
    }
}

/// Comments out workload-management statements instead of deleting them.
///
/// Each statement, through its `;`, is wrapped in a block comment, so line
/// numbers still match the source and statements sharing its line survive.
pub struct SessionStatements {
    pattern: Pattern,
}

pub fn session_statements() -> SessionStatements {
    SessionStatements {
        pattern: Pattern::new(
            r"\b(set[ \t]+wlm_query_slot_count[ \t]*(?:to|=)[ \t]*\d+|set[ \t]+query_group[ \t]+to\b[^;\n]*|reset[ \t]+query_group\b)[ \t]*(;?)",
        ),
    }
}

impl RewriteRule for SessionStatements {
    fn name(&self) -> &'static str {
        SESSION_STATEMENTS
    }

    fn description(&self) -> &'static str {
        "Comment out wlm_query_slot_count and query_group statements"
    }

    fn apply(&self, sql: &str) -> Result<String, RuleError> {
        let regex = self.pattern.regex()?;
        let rewritten = regex.replace_all(sql, |caps: &Captures| {
            let start = caps.get(0).map_or(0, |m| m.start());
            if !at_statement_start(sql, start) {
                return caps[0].to_string();
            }
            format!("/* {}{} */", caps[1].trim_end(), &caps[2])
        });
        Ok(rewritten.into_owned())
    }
}
