//! Known identifier drift between the Redshift and Snowflake environments

use crate::rule::{PatternRule, Substitution};
use sqlshift_core::IdentifierFixup;

pub const IDENTIFIER_FIXUPS: &str = "identifier_fixups";

/// Finance ETL tables that moved from `etl` to `mode_etl` in Snowflake
pub const MODE_ETL_TABLES: &[&str] = &[
    "finance_customer_ops_and_fulfillment_costs",
    "finance_daily_gmv_lfc",
    "finance_daily_gmv_h2plan",
    "finance_daily_gmv_projection",
    "finance_interest_expense",
    "finance_reserves",
];

/// Built-in renames followed by `extra` renames from configuration.
pub fn identifier_fixups(extra: &[IdentifierFixup]) -> PatternRule {
    let mut substitutions = vec![
        Substitution::literal("production.user_sessions_view", "production.user_sessions"),
        Substitution::literal("rating__bigint", "rating"),
        Substitution::new(
            &format!(r"(\s)etl\.({})\b", MODE_ETL_TABLES.join("|")),
            "${1}mode_etl.${2}",
        ),
    ];

    substitutions.extend(
        extra
            .iter()
            .map(|fixup| Substitution::literal(&fixup.from, &fixup.to)),
    );

    PatternRule::new(
        IDENTIFIER_FIXUPS,
        "Rename schemas, views and columns that differ between environments",
        substitutions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RewriteRule;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_renames() {
        let rule = identifier_fixups(&[]);
        assert_eq!(
            rule.apply("select rating__bigint from production.USER_SESSIONS_VIEW").unwrap(),
            "select rating from production.user_sessions"
        );
    }

    #[test]
    fn mode_etl_schema_moves() {
        let rule = identifier_fixups(&[]);
        assert_eq!(
            rule.apply("select * from etl.finance_reserves r join etl.orders o on true").unwrap(),
            "select * from mode_etl.finance_reserves r join etl.orders o on true"
        );
    }

    #[test]
    fn mode_etl_rename_is_stable() {
        let rule = identifier_fixups(&[]);
        let once = rule.apply("from etl.finance_interest_expense").unwrap();
        assert_eq!(rule.apply(&once).unwrap(), once);
    }

    #[test]
    fn longer_table_names_untouched() {
        let rule = identifier_fixups(&[]);
        let sql = "from etl.finance_reserves_history";
        assert_eq!(rule.apply(sql).unwrap(), sql);
    }

    #[test]
    fn configured_fixups_applied_after_builtins() {
        let rule = identifier_fixups(&[IdentifierFixup::new("analytics.old_view", "analytics.new_view")]);
        assert_eq!(
            rule.apply("select * from Analytics.Old_View").unwrap(),
            "select * from analytics.new_view"
        );
        assert_eq!(rule.substitutions().len(), 4);
    }
}
