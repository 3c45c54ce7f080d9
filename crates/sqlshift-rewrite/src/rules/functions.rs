//! One-to-one function and operator renames
//!
//! Every entry maps a Redshift spelling onto the Snowflake function with the
//! same behavior. Entries run top to bottom, so `DATE_DIFF` is already
//! `DATEDIFF` when the week-unit entry runs. No replacement may match an
//! entry of its own (`ISNULL(` therefore goes straight to `COALESCE(`).

use crate::rule::{PatternRule, Substitution};

pub const FUNCTION_RENAMES: &str = "function_renames";

const RENAMES: &[(&str, &str)] = &[
    (r"\bbool_or\b", "BOOLOR_AGG"),
    (r"\bbool_and\b", "BOOLAND_AGG"),
    (r"[ \t]~[ \t]*'", " REGEXP '"),
    (r"\bbtrim\s*\(", "TRIM("),
    (r"\bchar_length\b", "LEN"),
    (r"\bdatepart\b", "DATE_PART"),
    (r"\bdate_diff\b", "DATEDIFF"),
    (r"\bdate_add\s*\(", "DATEADD("),
    (r"\bdatediff\s*\(\s*'weeks'\s*,\s*", "DATEDIFF('week', "),
    (r"\bfrom_unixtime\b", "TO_TIMESTAMP"),
    (r"\bjson_extract_path_text\s*\(\s*([\w.]+)\s*,\s*'(\w+)'\s*,\s*true\s*\)", "${1}:${2}"),
    (r"\bis\s+false\b", "= FALSE"),
    (r"\bis\s+true\b", "= TRUE"),
    (r"\bnvl\s*\(", "COALESCE("),
    (r"\bsysdate\b", "CURRENT_TIMESTAMP"),
    (r"\bceiling\s*\(", "CEIL("),
    (r"\bisnull\s*\(", "COALESCE("),
];

pub fn function_renames() -> PatternRule {
    PatternRule::new(
        FUNCTION_RENAMES,
        "Rename functions and operators with identical semantics",
        RENAMES
            .iter()
            .map(|(pattern, replacement)| Substitution::new(pattern, replacement))
            .collect(),
    )
}
