//! Redshift → Snowflake SQL rewriting
//!
//! This crate handles:
//! - Rewrite rules, each targeting one dialect difference
//! - The ordered rule registry and the pipeline that applies it
//! - Report query preparation (quoted alias upper-casing)
//! - Landing-table DDL from Redshift table definitions
//!
//! Rewriting is textual. Input is never parsed, so SQL that Redshift itself
//! would reject passes through with only the matching fragments changed.

pub mod pipeline;
pub mod prepare;
pub mod registry;
pub mod rule;
pub mod rules;
pub mod table_definition;

pub use pipeline::{translate, RuleFailure, Translation, Translator};
pub use prepare::ReportQueryPreparer;
pub use registry::RuleRegistry;
pub use rule::{Pattern, PatternRule, Replacement, RewriteRule, RuleError, Substitution};
pub use table_definition::{LandingTarget, TableDefinition};
