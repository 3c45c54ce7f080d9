//! Storage hints with no Snowflake equivalent

use crate::rule::{Pattern, PatternRule, RewriteRule, RuleError, Substitution};
use regex::Captures;

pub const COLUMN_ENCODING: &str = "column_encoding";
pub const DISTRIBUTION_AND_SORT_KEYS: &str = "distribution_and_sort_keys";

/// Redshift compression codecs accepted by `ENCODE`
const CODECS: &str = "raw|az64|bytedict|delta32k|delta|lzo|mostly8|mostly16|mostly32|runlength|text255|text32k|zstd";

/// Strips `ENCODE <codec>` from column definitions.
///
/// Only the hint and its leading whitespace go, so the comma of a middle
/// column and the closing paren of the last one stay where they were.
pub fn column_encoding() -> PatternRule {
    PatternRule::new(
        COLUMN_ENCODING,
        "Remove ENCODE column compression hints",
        vec![Substitution::new(&format!(r"\s+encode\s+(?:{CODECS})\b"), "")],
    )
}

/// Redshift column types a `DISTKEY`/`SORTKEY` column attribute can follow
const COLUMN_TYPES: &str = "smallint|int2|integer|int4|int8|int|bigint|decimal|numeric|real|float4|float8|float|double[ \\t]+precision|boolean|bool|character[ \\t]+varying|character|nchar|bpchar|char|nvarchar|varchar|text|date|timetz|timestamptz|timestamp_ntz|timestamp|time|super|varbyte|geometry|geography|hllsketch";

/// Attributes that may follow `DISTKEY`/`SORTKEY` in a column definition
const COLUMN_ATTRIBUTES: &[&str] = &[
    "not", "null", "default", "identity", "generated", "primary", "unique", "references", "collate",
    "encode",
];

/// Strips DISTSTYLE, DISTKEY and SORTKEY clauses and column attributes.
///
/// The column form (`id int distkey sortkey,`) is only removed right after a
/// column type and before the end of the column definition, so catalog
/// queries selecting `distkey` or `sortkey` columns keep their shape.
pub struct DistributionAndSortKeys {
    inner: PatternRule,
    column_attribute: Pattern,
}

impl DistributionAndSortKeys {
    pub fn new() -> Self {
        Self {
            inner: PatternRule::new(
                DISTRIBUTION_AND_SORT_KEYS,
                "Remove DISTSTYLE, DISTKEY and SORTKEY table clauses and column attributes",
                vec![
                    Substitution::new(r"\s*\bdiststyle\s+(?:all|even|auto|key)\b", ""),
                    Substitution::new(r#"\s*\bdistkey\s*\(\s*[\w"]+\s*\)"#, ""),
                    Substitution::new(r"\s*\b(?:(?:compound|interleaved)\s+)?sortkey\s*\([^()]*\)", ""),
                ],
            ),
            column_attribute: Pattern::new(format!(
                r"(\b(?:{COLUMN_TYPES})(?:[ \t]*\([^()]*\))?(?:[ \t]+with(?:out)?[ \t]+time[ \t]+zone)?)((?:[ \t]+(?:distkey|sortkey)\b)+)"
            )),
        }
    }

    fn strip_column_attributes(&self, sql: &str) -> Result<String, RuleError> {
        let regex = self.column_attribute.regex()?;
        let rewritten = regex.replace_all(sql, |caps: &Captures| {
            let end = caps.get(0).map_or(sql.len(), |m| m.end());
            if ends_column_attribute(&sql[end..]) {
                caps[1].to_string()
            } else {
                caps[0].to_string()
            }
        });
        Ok(rewritten.into_owned())
    }
}

/// Whether `rest` continues a column definition after a key attribute
fn ends_column_attribute(rest: &str) -> bool {
    let rest = rest.trim_start_matches([' ', '\t']);
    if rest.starts_with("--") {
        return true;
    }
    match rest.chars().next() {
        None | Some(',' | ')' | '\n' | '\r') => true,
        Some(_) => {
            let word: String = rest
                .chars()
                .take_while(|c| c.is_ascii_alphabetic())
                .collect::<String>()
                .to_ascii_lowercase();
            COLUMN_ATTRIBUTES.contains(&word.as_str())
        }
    }
}

impl Default for DistributionAndSortKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteRule for DistributionAndSortKeys {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn description(&self) -> &'static str {
        self.inner.description()
    }

    fn apply(&self, sql: &str) -> Result<String, RuleError> {
        let rewritten = self.strip_column_attributes(&self.inner.apply(sql)?)?;

        let (opened_before, closed_before) = paren_counts(sql);
        let (opened, closed) = paren_counts(&rewritten);
        if opened_before == closed_before && opened != closed {
            return Err(RuleError::UnbalancedParens { opened, closed });
        }

        Ok(rewritten)
    }
}

fn paren_counts(sql: &str) -> (usize, usize) {
    sql.chars().fold((0, 0), |(open, close), c| match c {
        '(' => (open + 1, close),
        ')' => (open, close + 1),
        _ => (open, close),
    })
}
