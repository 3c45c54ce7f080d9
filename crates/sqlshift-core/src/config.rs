//! Configuration schema (sqlshift.toml)

use serde::{Deserialize, Serialize};

/// SQL dialect of a source or destination engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Amazon Redshift
    Redshift,

    /// Snowflake
    Snowflake,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redshift => write!(f, "redshift"),
            Self::Snowflake => write!(f, "snowflake"),
        }
    }
}

fn default_source() -> Dialect {
    Dialect::Redshift
}

fn default_target() -> Dialect {
    Dialect::Snowflake
}

/// A literal identifier rename applied by the `identifier_fixups` rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierFixup {
    /// Identifier as it appears in source SQL (matched case-insensitively)
    pub from: String,

    /// Replacement identifier
    pub to: String,
}

impl IdentifierFixup {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Options for preparing landing-table DDL from a source table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DdlOptions {
    /// Always strip quotes from the `CREATE TABLE IF NOT EXISTS` line
    #[serde(default)]
    pub remove_quotes_from_create_table: bool,

    /// Prefix of landing table names (`<prefix>_<schema>_<table>`)
    #[serde(default = "default_landing_prefix")]
    pub landing_prefix: String,
}

fn default_landing_prefix() -> String {
    "redshift".to_string()
}

impl Default for DdlOptions {
    fn default() -> Self {
        Self {
            remove_quotes_from_create_table: false,
            landing_prefix: default_landing_prefix(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Dialect the input SQL is written in
    #[serde(default = "default_source")]
    pub source_dialect: Dialect,

    /// Dialect the output SQL should be written in
    #[serde(default = "default_target")]
    pub target_dialect: Dialect,

    /// Rewrite rules to leave out of the pipeline, by name
    #[serde(default)]
    pub disabled_rules: Vec<String>,

    /// Extra project-specific identifier renames, applied after the built-in list
    #[serde(default)]
    pub fixups: Vec<IdentifierFixup>,

    /// Landing-table DDL options
    #[serde(default)]
    pub ddl: DdlOptions,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: std::path::PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dialect: default_source(),
            target_dialect: default_target(),
            disabled_rules: Vec::new(),
            fixups: Vec::new(),
            ddl: DdlOptions::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Reject settings the rewriter cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        if (self.source_dialect, self.target_dialect) != (Dialect::Redshift, Dialect::Snowflake) {
            return Err(ConfigError::UnsupportedDialectPair {
                from: self.source_dialect,
                to: self.target_dialect,
            });
        }

        if let Some(fixup) = self.fixups.iter().find(|f| f.from.trim().is_empty()) {
            return Err(ConfigError::InvalidFixup(format!(
                "empty 'from' identifier (to = '{}')",
                fixup.to
            )));
        }

        Ok(())
    }

    /// Check whether a rule was disabled by name
    pub fn is_rule_disabled(&self, name: &str) -> bool {
        self.disabled_rules.iter().any(|disabled| disabled == name)
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Unsupported dialect pair: {from} -> {to}")]
    UnsupportedDialectPair { from: Dialect, to: Dialect },

    #[error("Unknown rewrite rule: {0}")]
    UnknownRule(String),

    #[error("Invalid fixup: {0}")]
    InvalidFixup(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.source_dialect, Dialect::Redshift);
        assert_eq!(config.target_dialect, Dialect::Snowflake);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_config() {
        let config = Config::from_toml(
            r#"
            source_dialect = "redshift"
            target_dialect = "snowflake"
            disabled_rules = ["identifier_fixups"]

            [[fixups]]
            from = "analytics.old_view"
            to = "analytics.new_view"

            [ddl]
            remove_quotes_from_create_table = true
            "#,
        )
        .unwrap();

        assert!(config.is_rule_disabled("identifier_fixups"));
        assert!(!config.is_rule_disabled("boolean_type"));
        assert_eq!(config.fixups, vec![IdentifierFixup::new("analytics.old_view", "analytics.new_view")]);
        assert!(config.ddl.remove_quotes_from_create_table);
        assert_eq!(config.ddl.landing_prefix, "redshift");
    }

    #[test]
    fn reversed_dialects_rejected() {
        let err = Config::from_toml(
            r#"
            source_dialect = "snowflake"
            target_dialect = "redshift"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::UnsupportedDialectPair { .. }));
    }

    #[test]
    fn empty_fixup_rejected() {
        let err = Config::from_toml(
            r#"
            [[fixups]]
            from = " "
            to = "x"
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidFixup(_)));
    }

    #[test]
    fn config_toml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sqlshift.toml");

        let mut config = Config::default();
        config.disabled_rules.push("date_trunc_weeks".to_string());
        config.save_to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded.disabled_rules, config.disabled_rules);
        assert_eq!(loaded.project_root, dir.path().to_path_buf());
    }
}
