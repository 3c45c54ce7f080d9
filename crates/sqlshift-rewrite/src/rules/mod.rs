//! Built-in Redshift → Snowflake rewrite rules
//!
//! [`standard_rules`] is the canonical order. It matters:
//! - storage hints are stripped before type rules see the column list
//! - `bool` becomes `boolean` before `bool_or`/`bool_and` are renamed
//! - identifier fixups run after every rule that rewrites table references
//! - `trailing_whitespace` is always last, after statements were removed

pub mod ddl;
pub mod fixups;
pub mod functions;
pub mod session;
pub mod storage;
pub mod timezone;
pub mod types;
pub mod whitespace;

use crate::rule::RewriteRule;
use sqlshift_core::IdentifierFixup;

pub use ddl::{create_table_like, QualifiedRename};
pub use fixups::identifier_fixups;
pub use functions::function_renames;
pub use session::{
    analyze_statements, search_path, session_statements, AnalyzeStatements, SessionStatements,
};
pub use storage::{column_encoding, DistributionAndSortKeys};
pub use timezone::{date_trunc_weeks, ConvertTimezone};
pub use types::{boolean_type, integer_types, timestamp_ntz, varchar_length};
pub use whitespace::TrailingWhitespace;

/// Rule names in pipeline order
pub const STANDARD_ORDER: &[&str] = &[
    storage::COLUMN_ENCODING,
    types::TIMESTAMP_NTZ,
    storage::DISTRIBUTION_AND_SORT_KEYS,
    types::BOOLEAN_TYPE,
    types::INTEGER_TYPES,
    types::VARCHAR_LENGTH,
    functions::FUNCTION_RENAMES,
    session::SEARCH_PATH,
    session::ANALYZE_STATEMENTS,
    ddl::CREATE_TABLE_LIKE,
    ddl::QUALIFIED_RENAME,
    fixups::IDENTIFIER_FIXUPS,
    session::SESSION_STATEMENTS,
    timezone::CONVERT_TIMEZONE,
    timezone::DATE_TRUNC_WEEKS,
    whitespace::TRAILING_WHITESPACE,
];

/// Every built-in rule, in pipeline order
pub fn standard_rules(extra_fixups: &[IdentifierFixup]) -> Vec<Box<dyn RewriteRule>> {
    vec![
        Box::new(column_encoding()),
        Box::new(timestamp_ntz()),
        Box::new(DistributionAndSortKeys::new()),
        Box::new(boolean_type()),
        Box::new(integer_types()),
        Box::new(varchar_length()),
        Box::new(function_renames()),
        Box::new(search_path()),
        Box::new(analyze_statements()),
        Box::new(create_table_like()),
        Box::new(QualifiedRename::new()),
        Box::new(identifier_fixups(extra_fixups)),
        Box::new(session_statements()),
        Box::new(ConvertTimezone::new()),
        Box::new(date_trunc_weeks()),
        Box::new(TrailingWhitespace),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_order_matches_rules() {
        let names: Vec<&str> = standard_rules(&[]).iter().map(|rule| rule.name()).collect();
        assert_eq!(names, STANDARD_ORDER);
    }

    #[test]
    fn every_rule_has_a_description() {
        for rule in standard_rules(&[]) {
            assert!(!rule.description().is_empty(), "{} has no description", rule.name());
        }
    }

    #[test]
    fn every_pattern_compiles() {
        for rule in standard_rules(&[IdentifierFixup::new("a.b", "c.d")]) {
            assert!(rule.apply("select 1").is_ok(), "{} failed on trivial input", rule.name());
        }
    }

    #[test]
    fn trailing_whitespace_is_last() {
        assert_eq!(STANDARD_ORDER.last(), Some(&whitespace::TRAILING_WHITESPACE));
    }
}
