//! Report migration
//!
//! Moves every query of a report from Redshift syntax to Snowflake syntax:
//! fetch the stored SQL, prepare and translate it, then hand it to the
//! destination executor (or only record it, in a dry run). Each problem
//! becomes a diagnostic; only a report that cannot be listed fails outright.

use crate::adapter::{QueryRef, QuerySource, SourceError, SqlExecutor};
use sqlshift_core::{fingerprint, Diagnostic, DiagnosticCode, Location, Report, Severity};
use sqlshift_rewrite::{ReportQueryPreparer, Translator};
use tracing::{info, warn};

/// Statements a reporting query must not contain to be migrated
pub const BANNED_STATEMENTS: &[&str] = &["create table", "insert into", "drop table"];

/// First banned statement found in `sql`, ignoring case and whitespace layout
pub fn banned_statement(sql: &str) -> Option<&'static str> {
    let normalized = sql
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    BANNED_STATEMENTS
        .iter()
        .copied()
        .find(|statement| normalized.contains(statement))
}

/// One query after translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedQuery {
    pub query: QueryRef,
    pub sql: String,
}

/// Outcome of migrating one report
#[derive(Debug)]
pub struct Migration {
    pub report: Report,

    /// Translated queries in report order
    pub queries: Vec<TranslatedQuery>,

    /// Queries accepted by the executor
    pub executed: usize,

    /// A banned statement stopped the migration before anything was executed
    pub rejected: bool,
}

/// Drives a report through translation and execution
pub struct Migrator<'a> {
    source: &'a dyn QuerySource,
    executor: Option<&'a dyn SqlExecutor>,
    preparer: ReportQueryPreparer<'a>,
}

impl<'a> Migrator<'a> {
    /// Dry-run migrator: queries are translated but never executed
    pub fn new(source: &'a dyn QuerySource, translator: Translator<'a>) -> Self {
        Self {
            source,
            executor: None,
            preparer: ReportQueryPreparer::new(translator),
        }
    }

    pub fn with_executor(mut self, executor: &'a dyn SqlExecutor) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.executor.is_none()
    }

    /// Migrate every query of `report`
    pub async fn migrate_report(&self, report: &str) -> Result<Migration, SourceError> {
        info!(report, source = self.source.name(), "Migrating report");

        let refs = self.source.list_queries(report).await?;
        let mut migration = Migration {
            report: Report::new(),
            queries: Vec::new(),
            executed: 0,
            rejected: false,
        };

        let mut fetched = Vec::with_capacity(refs.len());
        for query in refs {
            match self.source.fetch_sql(&query).await {
                Ok(sql) => fetched.push((query, sql)),
                Err(err) => {
                    warn!(query = %query, error = %err, "Could not fetch query");
                    migration.report.add_diagnostic(
                        Diagnostic::new(
                            DiagnosticCode::SourceFetchFailed,
                            Severity::Error,
                            err.to_string(),
                        )
                        .with_location(Location::new(query.path())),
                    );
                }
            }
        }

        // Validate the whole report before touching the destination
        for (query, sql) in &fetched {
            if let Some(statement) = banned_statement(sql) {
                warn!(query = %query, statement, "Query writes to the warehouse");
                migration.rejected = true;
                migration.report.add_diagnostic(
                    Diagnostic::new(
                        DiagnosticCode::QueryRejected,
                        Severity::Error,
                        format!("Query uses a banned statement '{statement}'"),
                    )
                    .with_location(Location::new(query.path())),
                );
            }
        }
        if migration.rejected {
            return Ok(migration);
        }

        for (query, sql) in fetched {
            self.migrate_query(query, &sql, &mut migration).await;
        }

        info!(
            report,
            translated = migration.queries.len(),
            executed = migration.executed,
            errors = migration.report.summary.errors,
            "Report migrated"
        );
        Ok(migration)
    }

    async fn migrate_query(&self, query: QueryRef, raw: &str, migration: &mut Migration) {
        let location = Location::new(query.path());

        if raw.trim().is_empty() {
            migration.report.add_diagnostic(
                Diagnostic::new(DiagnosticCode::Info, Severity::Info, "Empty query, nothing to run")
                    .with_location(location),
            );
            return;
        }

        let translation = self.preparer.prepare(raw);
        for failure in &translation.failures {
            migration.report.add_diagnostic(
                Diagnostic::rule_failure(failure.rule, failure.message.clone())
                    .with_location(location.clone()),
            );
        }
        migration.report.add_diagnostic(
            Diagnostic::new(
                DiagnosticCode::QueryTranslated,
                Severity::Info,
                format!("Translated with {} rules", translation.rules_applied),
            )
            .with_location(location.clone())
            .with_fingerprint(fingerprint(&translation.sql)),
        );

        if let Some(executor) = self.executor {
            match executor.execute(&translation.sql).await {
                Ok(()) => migration.executed += 1,
                Err(err) => {
                    warn!(query = %query, executor = executor.name(), error = %err, "Execution failed");
                    migration.report.add_diagnostic(
                        Diagnostic::new(
                            DiagnosticCode::ExecutionFailed,
                            Severity::Error,
                            err.to_string(),
                        )
                        .with_location(location),
                    );
                }
            }
        }

        migration.queries.push(TranslatedQuery {
            query,
            sql: translation.sql,
        });
    }
}
