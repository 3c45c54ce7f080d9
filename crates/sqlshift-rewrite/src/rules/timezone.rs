//! Time zone and date-part literals

use crate::rule::{Pattern, PatternRule, RewriteRule, RuleError, Substitution};
use regex::Captures;
use std::borrow::Cow;

pub const CONVERT_TIMEZONE: &str = "convert_timezone";
pub const DATE_TRUNC_WEEKS: &str = "date_trunc_weeks";

/// Canonical Snowflake spelling of a Redshift zone abbreviation
pub fn canonical_zone(zone: &str) -> Cow<'_, str> {
    match zone.to_ascii_lowercase().as_str() {
        "utc" => Cow::Borrowed("UTC"),
        "pst" | "pdt" => Cow::Borrowed("America/Los_Angeles"),
        _ => Cow::Borrowed(zone),
    }
}

/// Normalizes zone literals in both the two-argument
/// (`convert_timezone('pst', ts)`) and three-argument
/// (`convert_timezone('utc', 'pst', ts)`) forms.
pub struct ConvertTimezone {
    pattern: Pattern,
}

impl ConvertTimezone {
    pub fn new() -> Self {
        Self {
            pattern: Pattern::new(r"(\bconvert_timezone\s*\(\s*)'(\w+)'(?:(\s*,\s*)'(\w+)')?"),
        }
    }
}

impl Default for ConvertTimezone {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteRule for ConvertTimezone {
    fn name(&self) -> &'static str {
        CONVERT_TIMEZONE
    }

    fn description(&self) -> &'static str {
        "Normalize convert_timezone zone abbreviations (utc, pst, pdt)"
    }

    fn apply(&self, sql: &str) -> Result<String, RuleError> {
        let regex = self.pattern.regex()?;
        let rewritten = regex.replace_all(sql, |caps: &Captures| {
            let mut out = format!("{}'{}'", &caps[1], canonical_zone(&caps[2]));
            if let (Some(separator), Some(zone)) = (caps.get(3), caps.get(4)) {
                out.push_str(separator.as_str());
                out.push('\'');
                out.push_str(&canonical_zone(zone.as_str()));
                out.push('\'');
            }
            out
        });
        Ok(rewritten.into_owned())
    }
}

pub fn date_trunc_weeks() -> PatternRule {
    PatternRule::new(
        DATE_TRUNC_WEEKS,
        "date_trunc('weeks', ...) -> date_trunc('week', ...)",
        vec![Substitution::new(r"(\bdate_trunc\s*\(\s*)'weeks'", "${1}'week'")],
    )
}
