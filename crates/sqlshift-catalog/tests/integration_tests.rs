//! Integration tests for report migration against the in-memory collaborators

use pretty_assertions::assert_eq;
use sqlshift_catalog::{Migrator, MockExecutor, MockSource, QueryRef, SourceError};
use sqlshift_core::{DiagnosticCode, Severity};
use sqlshift_rewrite::{RewriteRule, RuleError, RuleRegistry};

async fn gmv_report() -> MockSource {
    let source = MockSource::new().with_name("Mode");
    source
        .add_query(
            "gmv",
            "weekly",
            "set query_group to 'mode';\nselect nvl(a, 0) as \"amount\" from etl.finance_reserves\n",
        )
        .await;
    source
        .add_query("gmv", "brands", "select bool_or(active) from brands")
        .await;
    source.add_query("gmv", "placeholder", "").await;
    source
}

#[tokio::test]
async fn dry_run_translates_without_executing() {
    let source = gmv_report().await;
    let registry = RuleRegistry::standard();
    let migrator = Migrator::new(&source, registry.translator());
    assert!(migrator.is_dry_run());

    let migration = migrator.migrate_report("gmv").await.unwrap();

    assert_eq!(migration.queries.len(), 2);
    assert_eq!(migration.executed, 0);
    assert!(!migration.rejected);
    assert_eq!(
        migration.queries[0].sql,
        "/* set query_group to 'mode'; */\nselect COALESCE(a, 0) as \"AMOUNT\" from mode_etl.finance_reserves"
    );
    assert_eq!(migration.queries[1].sql, "select BOOLOR_AGG(active) from brands");

    let summary = &migration.report.summary;
    assert_eq!(summary.queries_translated, 2);
    assert_eq!(summary.errors, 0);
    // two translations plus the skipped empty query
    assert_eq!(summary.info, 3);
}

#[tokio::test]
async fn executor_receives_translated_sql() {
    let source = gmv_report().await;
    let executor = MockExecutor::new().with_name("Snowflake");
    let registry = RuleRegistry::standard();

    let migration = Migrator::new(&source, registry.translator())
        .with_executor(&executor)
        .migrate_report("gmv")
        .await
        .unwrap();

    assert_eq!(migration.executed, 2);
    assert_eq!(
        executor.executed().await,
        vec![migration.queries[0].sql.clone(), migration.queries[1].sql.clone()]
    );
}

#[tokio::test]
async fn execution_failure_reported_per_query() {
    let source = gmv_report().await;
    let executor = MockExecutor::new();
    executor
        .reject_containing(
            "mode_etl.finance_reserves",
            SourceError::StatementRejected("table does not exist".to_string()),
        )
        .await;
    let registry = RuleRegistry::standard();

    let migration = Migrator::new(&source, registry.translator())
        .with_executor(&executor)
        .migrate_report("gmv")
        .await
        .unwrap();

    assert_eq!(migration.executed, 1);
    assert!(migration.report.has_errors());

    let failed: Vec<_> = migration
        .report
        .diagnostics
        .iter()
        .filter(|d| d.code == DiagnosticCode::ExecutionFailed)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].location.as_ref().unwrap().file, "gmv/weekly");
}

#[tokio::test]
async fn banned_statement_stops_migration() {
    let source = gmv_report().await;
    source
        .add_query("gmv", "backfill", "insert into etl.gmv_snapshot\nselect * from etl.gmv")
        .await;
    let executor = MockExecutor::new();
    let registry = RuleRegistry::standard();

    let migration = Migrator::new(&source, registry.translator())
        .with_executor(&executor)
        .migrate_report("gmv")
        .await
        .unwrap();

    assert!(migration.rejected);
    assert!(migration.queries.is_empty());
    assert!(executor.executed().await.is_empty());
    assert_eq!(migration.report.diagnostics.len(), 1);
    assert_eq!(migration.report.diagnostics[0].code, DiagnosticCode::QueryRejected);
}

#[tokio::test]
async fn fetch_failure_does_not_stop_other_queries() {
    let source = gmv_report().await;
    source
        .add_error_for_query(
            &QueryRef::new("gmv", "brands"),
            SourceError::PermissionDenied("private collection".to_string()),
        )
        .await;
    let registry = RuleRegistry::standard();

    let migration = Migrator::new(&source, registry.translator())
        .migrate_report("gmv")
        .await
        .unwrap();

    assert_eq!(migration.queries.len(), 1);
    let fetch_errors = migration
        .report
        .diagnostics
        .iter()
        .filter(|d| d.code == DiagnosticCode::SourceFetchFailed && d.severity == Severity::Error)
        .count();
    assert_eq!(fetch_errors, 1);
}

#[tokio::test]
async fn unknown_report_is_an_error() {
    let source = MockSource::new();
    let registry = RuleRegistry::standard();
    let result = Migrator::new(&source, registry.translator())
        .migrate_report("missing")
        .await;
    assert!(matches!(result, Err(SourceError::NotFound(_))));
}

struct RejectBoolAggregates;

impl RewriteRule for RejectBoolAggregates {
    fn name(&self) -> &'static str {
        "reject_bool_aggregates"
    }

    fn apply(&self, sql: &str) -> Result<String, RuleError> {
        if sql.contains("bool_or") {
            return Err(RuleError::Unsupported("boolean aggregate".to_string()));
        }
        Ok(sql.to_string())
    }
}

#[tokio::test]
async fn rule_failures_become_warnings() {
    let source = gmv_report().await;
    let registry = RuleRegistry::from_rules(vec![Box::new(RejectBoolAggregates)]);

    let migration = Migrator::new(&source, registry.translator())
        .migrate_report("gmv")
        .await
        .unwrap();

    assert_eq!(migration.report.summary.rule_failures, 1);
    assert_eq!(migration.report.summary.warnings, 1);
    let warning = migration
        .report
        .diagnostics
        .iter()
        .find(|d| d.code == DiagnosticCode::RuleApplicationFailed)
        .unwrap();
    assert_eq!(warning.rule.as_deref(), Some("reject_bool_aggregates"));
    assert_eq!(warning.location.as_ref().unwrap().file, "gmv/brands");
}

#[tokio::test]
async fn report_serializes_with_stable_codes() {
    let source = gmv_report().await;
    let registry = RuleRegistry::standard();
    let migration = Migrator::new(&source, registry.translator())
        .migrate_report("gmv")
        .await
        .unwrap();

    let json = migration.report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let codes: Vec<&str> = value["diagnostics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["QUERY_TRANSLATED", "QUERY_TRANSLATED", "INFO"]);
    assert_eq!(
        value["diagnostics"][0]["fingerprint"].as_str().unwrap().len(),
        64
    );
}
