//! Collaborators around the rewrite pipeline
//!
//! Traits for the systems translation talks to, in-memory implementations
//! for tests and dry runs, and the [`Migrator`] that moves a report's stored
//! queries from Redshift to Snowflake.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sqlshift_catalog::{Migrator, MockSource};
//! use sqlshift_rewrite::RuleRegistry;
//!
//! let registry = RuleRegistry::standard();
//! let source = MockSource::new();
//! source.add_query("report", "q1", "select nvl(a, 0) from t").await;
//!
//! let migration = Migrator::new(&source, registry.translator())
//!     .migrate_report("report")
//!     .await?;
//! ```

pub mod adapter;
pub mod migrate;
pub mod mock;

pub use adapter::{QueryRef, QuerySource, SourceError, SqlExecutor};
pub use migrate::{banned_statement, Migration, Migrator, TranslatedQuery, BANNED_STATEMENTS};
pub use mock::{MockExecutor, MockSource};
