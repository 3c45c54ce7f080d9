//! Column and cast type spellings

use crate::rule::{PatternRule, Substitution};

pub const TIMESTAMP_NTZ: &str = "timestamp_ntz";
pub const BOOLEAN_TYPE: &str = "boolean_type";
pub const INTEGER_TYPES: &str = "integer_types";
pub const VARCHAR_LENGTH: &str = "varchar_length";

pub fn timestamp_ntz() -> PatternRule {
    PatternRule::new(
        TIMESTAMP_NTZ,
        "timestamp without time zone -> timestamp_ntz(9)",
        vec![Substitution::new(
            r"\btimestamp\s+without\s+time\s+zone\b",
            "timestamp_ntz(9)",
        )],
    )
}

/// `bool` in a column definition (followed by `,`, `)` or end of line) or
/// in a `::bool` cast.
pub fn boolean_type() -> PatternRule {
    PatternRule::new(
        BOOLEAN_TYPE,
        "bool -> boolean in column definitions and casts",
        vec![
            Substitution::new(r"(\s)bool\b([ \t]*(?:\r?$|[,)]))", "${1}boolean${2}"),
            Substitution::new(r"::\s*bool\b", "::boolean"),
        ],
    )
}

pub fn integer_types() -> PatternRule {
    PatternRule::new(
        INTEGER_TYPES,
        "integer, int2, int4, int8, bigint, smallint -> int",
        vec![Substitution::new(
            r"(\s|::)(?:integer|int2|int4|int8|bigint|smallint)\b",
            "${1}int",
        )],
    )
}

pub fn varchar_length() -> PatternRule {
    PatternRule::new(
        VARCHAR_LENGTH,
        "varchar(n) -> VARCHAR",
        vec![Substitution::new(
            r"\b(?:varchar|character\s+varying)\s*\(\s*(?:\d+|max)\s*\)",
            "VARCHAR",
        )],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RewriteRule;
    use pretty_assertions::assert_eq;

    #[test]
    fn timestamp_without_time_zone() {
        let out = timestamp_ntz().apply("created_at TIMESTAMP WITHOUT TIME ZONE,").unwrap();
        assert_eq!(out, "created_at timestamp_ntz(9),");
    }

    #[test]
    fn bool_column_definitions() {
        let sql = "create table t (\n  a bool,\n  b BOOL\n  ,c bool)";
        assert_eq!(
            boolean_type().apply(sql).unwrap(),
            "create table t (\n  a boolean,\n  b boolean\n  ,c boolean)"
        );
    }

    #[test]
    fn bool_cast() {
        let out = boolean_type().apply("select x::bool from t").unwrap();
        assert_eq!(out, "select x::boolean from t");
    }

    #[test]
    fn bool_aggregates_untouched() {
        let sql = "select bool_or(x), y::bool_type from t";
        assert_eq!(boolean_type().apply(sql).unwrap(), sql);
    }

    #[test]
    fn boolean_not_rewritten_twice() {
        let once = boolean_type().apply("a bool,").unwrap();
        assert_eq!(boolean_type().apply(&once).unwrap(), once);
    }

    #[test]
    fn integer_synonyms() {
        let sql = "a integer, b INT8, c bigint, d smallint, e int2, f int4, g::bigint";
        assert_eq!(
            integer_types().apply(sql).unwrap(),
            "a int, b int, c int, d int, e int, f int, g::int"
        );
    }

    #[test]
    fn integer_prefix_inside_identifier_untouched() {
        let sql = "select bigint_col, integer_id from t";
        assert_eq!(integer_types().apply(sql).unwrap(), sql);
    }

    #[test]
    fn varchar_length_dropped() {
        let sql = "a varchar(256), b character varying(12), c varchar(max), d::varchar(5)";
        assert_eq!(
            varchar_length().apply(sql).unwrap(),
            "a VARCHAR, b VARCHAR, c VARCHAR, d::VARCHAR"
        );
    }
}
