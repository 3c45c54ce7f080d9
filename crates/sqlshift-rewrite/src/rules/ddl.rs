//! DDL statement shapes

use crate::rule::{Pattern, PatternRule, RewriteRule, RuleError, Substitution};
use regex::Captures;

pub const CREATE_TABLE_LIKE: &str = "create_table_like";
pub const QUALIFIED_RENAME: &str = "qualified_rename";

/// `create table a (like b)` -> `create table a like b`
///
/// Snowflake has no `INCLUDING/EXCLUDING DEFAULTS` option on `LIKE`, so it
/// is dropped.
pub fn create_table_like() -> PatternRule {
    PatternRule::new(
        CREATE_TABLE_LIKE,
        "create table a (like b) -> create table a like b",
        vec![Substitution::new(
            r#"\bcreate\s+((?:temp|temporary)\s+)?table\s+([\w."]+)\s*\(\s*like\s+([\w."]+)(?:\s+(?:including|excluding)\s+defaults)?\s*\)"#,
            "create ${1}table ${2} like ${3}",
        )],
    )
}

/// Qualifies the target of `alter table schema.table rename to name` with
/// the schema of the table being renamed.
///
/// Redshift keeps a renamed table in its schema; Snowflake resolves an
/// unqualified target against the session schema. A target that is already
/// qualified is left as written.
pub struct QualifiedRename {
    pattern: Pattern,
}

impl QualifiedRename {
    pub fn new() -> Self {
        Self {
            pattern: Pattern::new(r"(\balter\s+table\s+(\w+)\.\w+\s+rename\s+to\s+)(\w+)(\.\w+)?"),
        }
    }
}

impl Default for QualifiedRename {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteRule for QualifiedRename {
    fn name(&self) -> &'static str {
        QUALIFIED_RENAME
    }

    fn description(&self) -> &'static str {
        "alter table s.t rename to n -> alter table s.t rename to s.n"
    }

    fn apply(&self, sql: &str) -> Result<String, RuleError> {
        let regex = self.pattern.regex()?;
        let rewritten = regex.replace_all(sql, |caps: &Captures| {
            if caps.get(4).is_some() {
                return caps[0].to_string();
            }
            format!("{}{}.{}", &caps[1], &caps[2], &caps[3])
        });
        Ok(rewritten.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn create_table_like_shape() {
        assert_eq!(
            create_table_like().apply("create table etl.orders_new (like etl.orders);").unwrap(),
            "create table etl.orders_new like etl.orders;"
        );
    }

    #[test]
    fn create_temp_table_like_with_defaults() {
        assert_eq!(
            create_table_like()
                .apply("CREATE TEMP TABLE stage (\n  LIKE etl.orders INCLUDING DEFAULTS\n)")
                .unwrap(),
            "create TEMP table stage like etl.orders"
        );
    }

    #[test]
    fn create_table_with_columns_untouched() {
        let sql = "create table t (likes int)";
        assert_eq!(create_table_like().apply(sql).unwrap(), sql);
    }

    #[test]
    fn rename_target_gets_schema() {
        let rule = QualifiedRename::new();
        assert_eq!(
            rule.apply("alter table myschema.mytable rename to newname").unwrap(),
            "alter table myschema.mytable rename to myschema.newname"
        );
    }

    #[test]
    fn rename_keeps_original_case_and_spacing() {
        let rule = QualifiedRename::new();
        assert_eq!(
            rule.apply("ALTER TABLE Etl.Orders_New\n  RENAME TO orders;").unwrap(),
            "ALTER TABLE Etl.Orders_New\n  RENAME TO Etl.orders;"
        );
    }

    #[test]
    fn qualified_rename_target_not_double_qualified() {
        let rule = QualifiedRename::new();
        let sql = "alter table a.t rename to b.t2";
        assert_eq!(rule.apply(sql).unwrap(), sql);
    }

    #[test]
    fn rename_column_untouched() {
        let rule = QualifiedRename::new();
        let sql = "alter table s.t rename column a to b";
        assert_eq!(rule.apply(sql).unwrap(), sql);
    }

    #[test]
    fn rename_is_stable() {
        let rule = QualifiedRename::new();
        let once = rule.apply("alter table s.t rename to n").unwrap();
        assert_eq!(rule.apply(&once).unwrap(), once);
    }
}
