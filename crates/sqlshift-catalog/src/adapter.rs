//! Collaborator traits for the systems around translation

use std::fmt;

/// Identifies a stored query inside a report
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryRef {
    /// Report token
    pub report: String,

    /// Query token within the report
    pub query: String,
}

impl QueryRef {
    pub fn new(report: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            report: report.into(),
            query: query.into(),
        }
    }

    /// `report/query`, used as the diagnostic location
    pub fn path(&self) -> String {
        format!("{}/{}", self.report, self.query)
    }
}

impl fmt::Display for QueryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Errors raised by query sources and SQL executors
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Statement rejected: {0}")]
    StatementRejected(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Read-only access to stored SQL (a reporting tool, a query repository)
#[async_trait::async_trait]
pub trait QuerySource: Send + Sync {
    /// Source name for logs (e.g., "Mode", "Mock")
    fn name(&self) -> &'static str;

    /// Queries of a report, in the order the report runs them
    async fn list_queries(&self, report: &str) -> Result<Vec<QueryRef>, SourceError>;

    /// Raw SQL of one query, exactly as stored
    async fn fetch_sql(&self, query: &QueryRef) -> Result<String, SourceError>;
}

/// Runs translated SQL against the destination engine
#[async_trait::async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Executor name for logs (e.g., "Snowflake")
    fn name(&self) -> &'static str;

    /// Execute one script; results are discarded
    async fn execute(&self, sql: &str) -> Result<(), SourceError>;
}
