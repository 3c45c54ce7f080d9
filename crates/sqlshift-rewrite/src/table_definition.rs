//! Landing-table DDL from a Redshift table definition
//!
//! Redshift reports a table's DDL one line per row, mixed with `ALTER TABLE`
//! ownership statements and a commented-out `DROP TABLE`. This module turns
//! those rows into a `CREATE OR REPLACE TABLE` for the Snowflake landing
//! table and runs it through the translator.

use crate::pipeline::{Translation, Translator};
use sqlshift_core::DdlOptions;
use tracing::{debug, info};

const CREATE_IF_NOT_EXISTS: &str = "CREATE TABLE IF NOT EXISTS";

/// True when `line` holds anything besides ASCII letters, digits, `_`,
/// whitespace, `,`, `"`, `(` and `)`.
///
/// Quoted identifiers on such lines keep their quotes.
pub fn contains_special_chars(line: &str) -> bool {
    line.chars().any(|c| {
        !(c.is_ascii_alphanumeric()
            || c.is_whitespace()
            || matches!(c, '_' | ',' | '"' | '(' | ')'))
    })
}

/// Strip quotes so Snowflake folds the identifiers to upper case
pub fn standardize_line(line: &str, remove_quotes_from_create_table: bool) -> String {
    let always_unquote = remove_quotes_from_create_table && line.contains(CREATE_IF_NOT_EXISTS);
    if !always_unquote && contains_special_chars(line) {
        return line.to_string();
    }
    line.replace(['"', '\''], "")
}

fn is_discarded(line: &str) -> bool {
    line.starts_with("ALTER TABLE") || line.starts_with("--DROP TABLE")
}

/// Where a Redshift table lands in Snowflake
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingTarget {
    pub source_schema: String,
    pub source_table: String,
    pub database: String,
    pub dest_schema: String,
}

impl LandingTarget {
    /// Source schema and table are lower-cased, as Redshift stores them
    pub fn new(
        source_schema: impl AsRef<str>,
        source_table: impl AsRef<str>,
        database: impl Into<String>,
        dest_schema: impl Into<String>,
    ) -> Self {
        Self {
            source_schema: source_schema.as_ref().to_lowercase(),
            source_table: source_table.as_ref().to_lowercase(),
            database: database.into(),
            dest_schema: dest_schema.into(),
        }
    }

    /// `schema.table` on the Redshift side
    pub fn source_table_name(&self) -> String {
        format!("{}.{}", self.source_schema, self.source_table)
    }

    /// `db.dest_schema.<prefix>_schema_table`
    pub fn landing_table(&self, prefix: &str) -> String {
        format!(
            "{}.{}.{}_{}_{}",
            self.database, self.dest_schema, prefix, self.source_schema, self.source_table
        )
    }
}

/// A table definition as reported by Redshift, one DDL line per entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDefinition {
    lines: Vec<String>,
}

impl TableDefinition {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a DDL dump on line breaks
    pub fn parse(ddl: &str) -> Self {
        Self::new(ddl.lines())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Redshift DDL without ownership statements, identifiers unquoted where safe
    pub fn source_ddl(&self, options: &DdlOptions) -> String {
        self.lines
            .iter()
            .filter(|line| !is_discarded(line))
            .map(|line| standardize_line(line, options.remove_quotes_from_create_table))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Source DDL retargeted at the landing table, before translation
    pub fn retargeted_ddl(&self, target: &LandingTarget, options: &DdlOptions) -> String {
        let landing = target.landing_table(&options.landing_prefix);
        info!(landing_table = %landing, "Redshift landing table");

        let ddl = self.source_ddl(options);
        debug!(ddl = %ddl, "Redshift ddl");

        ddl.replace(
            &format!("{CREATE_IF_NOT_EXISTS} {}", target.source_table_name()),
            &format!("CREATE OR REPLACE TABLE {landing}"),
        )
    }

    /// Snowflake DDL for the landing table
    pub fn prepare(
        &self,
        target: &LandingTarget,
        options: &DdlOptions,
        translator: Translator<'_>,
    ) -> Translation {
        translator.translate_detailed(&self.retargeted_ddl(target, options))
    }
}
