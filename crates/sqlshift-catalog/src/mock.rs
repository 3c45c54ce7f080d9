//! In-memory collaborators for tests and dry runs
//!
//! `MockSource` serves predefined SQL per query and `MockExecutor` records
//! every script it is handed. Both can be told to fail, so a migration can
//! be exercised end to end without credentials.
//!
//! ```rust,ignore
//! use sqlshift_catalog::{MockSource, MockExecutor, QuerySource};
//!
//! let source = MockSource::new();
//! source.add_query("report", "q1", "select nvl(a, 0) from t").await;
//!
//! let executor = MockExecutor::new().with_failure();
//! ```

use crate::adapter::{QueryRef, QuerySource, SourceError, SqlExecutor};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Mock query source
///
/// Queries are listed in insertion order. Clones share state.
#[derive(Clone)]
pub struct MockSource {
    /// Query refs per report, in insertion order
    reports: Arc<RwLock<HashMap<String, Vec<QueryRef>>>>,

    /// Raw SQL by query path
    sql: Arc<RwLock<HashMap<String, String>>>,

    /// Errors to return for specific queries
    errors: Arc<RwLock<HashMap<String, SourceError>>>,

    /// Simulate API latency (milliseconds)
    latency_ms: u64,

    source_name: &'static str,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            reports: Arc::new(RwLock::new(HashMap::new())),
            sql: Arc::new(RwLock::new(HashMap::new())),
            errors: Arc::new(RwLock::new(HashMap::new())),
            latency_ms: 0,
            source_name: "Mock",
        }
    }

    /// Add a query to a report; re-adding a query replaces its SQL
    pub async fn add_query(&self, report: &str, query: &str, sql: &str) -> QueryRef {
        let query_ref = QueryRef::new(report, query);

        let mut reports = self.reports.write().await;
        let queries = reports.entry(report.to_string()).or_default();
        if !queries.contains(&query_ref) {
            queries.push(query_ref.clone());
        }

        self.sql.write().await.insert(query_ref.path(), sql.to_string());
        query_ref
    }

    /// Configure an error to be returned when fetching `query`
    pub async fn add_error_for_query(&self, query: &QueryRef, error: SourceError) {
        self.errors.write().await.insert(query.path(), error);
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.source_name = name;
        self
    }

    /// Number of queries across all reports
    pub async fn query_count(&self) -> usize {
        self.sql.read().await.len()
    }

    async fn simulate_latency(&self) {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl QuerySource for MockSource {
    fn name(&self) -> &'static str {
        self.source_name
    }

    async fn list_queries(&self, report: &str) -> Result<Vec<QueryRef>, SourceError> {
        self.simulate_latency().await;

        self.reports
            .read()
            .await
            .get(report)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("report {report}")))
    }

    async fn fetch_sql(&self, query: &QueryRef) -> Result<String, SourceError> {
        self.simulate_latency().await;

        if let Some(error) = self.errors.read().await.get(&query.path()) {
            return Err(error.clone());
        }

        self.sql
            .read()
            .await
            .get(&query.path())
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("query {query}")))
    }
}

/// Mock SQL executor that records what it runs
#[derive(Clone)]
pub struct MockExecutor {
    /// Scripts executed successfully, in order
    executed: Arc<RwLock<Vec<String>>>,

    /// Scripts containing the fragment (case-insensitive) fail with the error
    rejections: Arc<RwLock<Vec<(String, SourceError)>>>,

    /// Fail every execution
    fail_all: bool,

    executor_name: &'static str,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self {
            executed: Arc::new(RwLock::new(Vec::new())),
            rejections: Arc::new(RwLock::new(Vec::new())),
            fail_all: false,
            executor_name: "Mock",
        }
    }

    /// Reject any script containing `fragment`
    pub async fn reject_containing(&self, fragment: &str, error: SourceError) {
        self.rejections
            .write()
            .await
            .push((fragment.to_lowercase(), error));
    }

    /// Fail every execution with a network error
    pub fn with_failure(mut self) -> Self {
        self.fail_all = true;
        self
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.executor_name = name;
        self
    }

    pub async fn executed(&self) -> Vec<String> {
        self.executed.read().await.clone()
    }
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl SqlExecutor for MockExecutor {
    fn name(&self) -> &'static str {
        self.executor_name
    }

    async fn execute(&self, sql: &str) -> Result<(), SourceError> {
        if self.fail_all {
            return Err(SourceError::NetworkError("Simulated connection failure".to_string()));
        }

        let lowered = sql.to_lowercase();
        if let Some((_, error)) = self
            .rejections
            .read()
            .await
            .iter()
            .find(|(fragment, _)| lowered.contains(fragment.as_str()))
        {
            return Err(error.clone());
        }

        self.executed.write().await.push(sql.to_string());
        Ok(())
    }
}
